// src/services/document.rs

use chrono::Utc;
use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::report::{DashboardOverview, MonthlyAmount, MonthlyCount, ReportData},
    services::report::ReportService,
};

#[derive(Clone)]
pub struct DocumentService {
    reports: ReportService,
}

impl DocumentService {
    pub fn new(reports: ReportService) -> Self {
        Self { reports }
    }

    // Exportação CSV: mesmas colunas e blocos do relatório da tela antiga.
    pub async fn performance_csv(&self) -> Result<(String, Vec<u8>), AppError> {
        let data = self.reports.report_data().await;
        let bytes = build_csv(&data)?;
        let filename = format!("hotel_report_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        Ok((filename, bytes))
    }

    // Relatório PDF de layout fixo ("Hotel Performance Report").
    pub async fn performance_pdf(&self) -> Result<(String, Vec<u8>), AppError> {
        let data = self.reports.report_data().await;
        let overview = self.reports.overview().await;
        let bytes = build_pdf(&data, &overview)?;
        let filename = format!("hotel_report_{}.pdf", Utc::now().format("%Y%m%d_%H%M%S"));
        Ok((filename, bytes))
    }
}

fn count_for(series: &[MonthlyCount], month: &str) -> i64 {
    series
        .iter()
        .find(|p| p.month == month)
        .map(|p| p.total)
        .unwrap_or(0)
}

fn amount_for(series: &[MonthlyAmount], month: &str) -> Decimal {
    series
        .iter()
        .find(|p| p.month == month)
        .map(|p| p.total)
        .unwrap_or(Decimal::ZERO)
}

// Monta o CSV em memória. A ordem dos meses é a da série de novos
// clientes; as demais séries são consultadas por rótulo, com 0 quando o
// balde não existir nelas.
pub fn build_csv(data: &ReportData) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let export = |e: csv::Error| AppError::ReportExport(e.to_string());

    writer
        .write_record([
            "Month",
            "New Customers",
            "Total Customers",
            "Revenue ($)",
            "Bookings",
        ])
        .map_err(export)?;

    for point in &data.new_customers {
        writer
            .write_record([
                point.month.clone(),
                point.total.to_string(),
                count_for(&data.total_customers, &point.month).to_string(),
                amount_for(&data.revenue, &point.month).to_string(),
                count_for(&data.bookings, &point.month).to_string(),
            ])
            .map_err(export)?;
    }

    let total_new = data.new_customers.iter().map(|p| p.total).sum::<i64>().to_string();
    let total_revenue: Decimal = data.revenue.iter().map(|p| p.total).sum();
    let total_bookings = data.bookings.iter().map(|p| p.total).sum::<i64>().to_string();

    writer.write_record([""; 5]).map_err(export)?;
    writer
        .write_record(["SUMMARY STATISTICS", "", "", "", ""])
        .map_err(export)?;
    writer
        .write_record(["Total Customers", total_new.as_str(), "", "", ""])
        .map_err(export)?;
    let revenue_cell = format!("${:.2}", total_revenue);
    writer
        .write_record(["Total Revenue", revenue_cell.as_str(), "", "", ""])
        .map_err(export)?;
    writer
        .write_record(["Total Bookings", total_bookings.as_str(), "", "", ""])
        .map_err(export)?;

    writer.write_record([""; 5]).map_err(export)?;
    writer
        .write_record(["RECENT CUSTOMERS", "", "", "", ""])
        .map_err(export)?;
    writer
        .write_record(["Name", "Email", "Phone", "Sign-up Date", ""])
        .map_err(export)?;
    for customer in &data.recent_customers {
        writer
            .write_record([
                customer.name.clone(),
                customer.email.clone(),
                customer.phone.clone(),
                customer.signup_date.clone(),
                String::new(),
            ])
            .map_err(export)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::ReportExport(e.to_string()))
}

fn build_pdf(data: &ReportData, overview: &DashboardOverview) -> Result<Vec<u8>, AppError> {
    // Carrega a fonte da pasta 'fonts/'
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
        .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Hotel Performance Report");
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new("Hotel Performance Report")
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Generated on: {}",
        Utc::now().format("%Y-%m-%d %H:%M")
    )));
    doc.push(elements::Break::new(1.5));

    // --- ESTATÍSTICAS GERAIS ---
    doc.push(
        elements::Paragraph::new("Summary Statistics")
            .styled(style::Style::new().bold().with_font_size(12)),
    );

    let latest_new_customers = data.new_customers.last().map(|p| p.total).unwrap_or(0);
    let total_revenue: Decimal = data.revenue.iter().map(|p| p.total).sum();
    let total_bookings: i64 = data.bookings.iter().map(|p| p.total).sum();

    let stats = [
        ("Total Customers", overview.total_customers.to_string()),
        ("Total Revenue", format!("${:.2}", total_revenue)),
        ("Total Bookings", total_bookings.to_string()),
        (
            "New Customers (Last Month)",
            latest_new_customers.to_string(),
        ),
    ];
    for (label, value) in stats {
        doc.push(elements::Paragraph::new(format!("{}: {}", label, value)));
    }

    doc.push(elements::Break::new(2));

    // --- TABELA MENSAL ---
    doc.push(
        elements::Paragraph::new("Monthly Performance Data")
            .styled(style::Style::new().bold().with_font_size(12)),
    );

    let style_bold = style::Style::new().bold();
    let mut table = elements::TableLayout::new(vec![2, 2, 2, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    table
        .row()
        .element(elements::Paragraph::new("Month").styled(style_bold))
        .element(elements::Paragraph::new("New Customers").styled(style_bold))
        .element(elements::Paragraph::new("Total Customers").styled(style_bold))
        .element(elements::Paragraph::new("Revenue").styled(style_bold))
        .element(elements::Paragraph::new("Bookings").styled(style_bold))
        .push()
        .expect("Table error");

    for point in &data.new_customers {
        table
            .row()
            .element(elements::Paragraph::new(point.month.clone()))
            .element(elements::Paragraph::new(point.total.to_string()))
            .element(elements::Paragraph::new(
                count_for(&data.total_customers, &point.month).to_string(),
            ))
            .element(elements::Paragraph::new(format!(
                "${:.2}",
                amount_for(&data.revenue, &point.month)
            )))
            .element(elements::Paragraph::new(
                count_for(&data.bookings, &point.month).to_string(),
            ))
            .push()
            .expect("Table row error");
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- CLIENTES RECENTES ---
    doc.push(
        elements::Paragraph::new("Recent Customers")
            .styled(style::Style::new().bold().with_font_size(12)),
    );

    let mut customers_table = elements::TableLayout::new(vec![3, 4, 2, 2]);
    customers_table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    customers_table
        .row()
        .element(elements::Paragraph::new("Name").styled(style_bold))
        .element(elements::Paragraph::new("Email").styled(style_bold))
        .element(elements::Paragraph::new("Phone").styled(style_bold))
        .element(elements::Paragraph::new("Sign-up Date").styled(style_bold))
        .push()
        .expect("Table error");

    for customer in &data.recent_customers {
        customers_table
            .row()
            .element(elements::Paragraph::new(customer.name.clone()))
            .element(elements::Paragraph::new(customer.email.clone()))
            .element(elements::Paragraph::new(customer.phone.clone()))
            .element(elements::Paragraph::new(customer.signup_date.clone()))
            .push()
            .expect("Table row error");
    }

    doc.push(customers_table);

    let mut footer = elements::Paragraph::new(format!(
        "TOTAL REVENUE: ${:.2}",
        total_revenue
    ));
    footer.set_alignment(Alignment::Right);
    doc.push(elements::Break::new(2));
    doc.push(footer.styled(style::Style::new().bold().with_font_size(12)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::ReportExport(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::AccountStatus;
    use crate::models::report::{MonthlyRate, RecentCustomer};
    use std::str::FromStr;

    fn sample_data() -> ReportData {
        ReportData {
            new_customers: vec![
                MonthlyCount { month: "May".into(), total: 2 },
                MonthlyCount { month: "Jun".into(), total: 0 },
            ],
            total_customers: vec![
                MonthlyCount { month: "May".into(), total: 2 },
                MonthlyCount { month: "Jun".into(), total: 2 },
            ],
            revenue: vec![
                MonthlyAmount {
                    month: "May".into(),
                    total: Decimal::from_str("350.50").unwrap(),
                },
                MonthlyAmount { month: "Jun".into(), total: Decimal::ZERO },
            ],
            bookings: vec![
                MonthlyCount { month: "May".into(), total: 3 },
                MonthlyCount { month: "Jun".into(), total: 0 },
            ],
            occupancy: vec![MonthlyRate { month: "May".into(), rate: 81.5 }],
            recent_customers: vec![RecentCustomer {
                customer_id: "CUST0001".into(),
                name: "Maria Silva".into(),
                email: "maria@example.com".into(),
                phone: "555-0100".into(),
                status: AccountStatus::Active,
                signup_date: "2025-05-02".into(),
            }],
        }
    }

    #[test]
    fn csv_tem_cabecalho_e_baldes_zerados() {
        let bytes = build_csv(&sample_data()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month,New Customers,Total Customers,Revenue ($),Bookings");
        assert_eq!(lines[1], "May,2,2,350.50,3");
        // Mês sem movimento sai com zeros, nunca é omitido.
        assert_eq!(lines[2], "Jun,0,2,0,0");
    }

    #[test]
    fn csv_inclui_resumo_e_clientes_recentes() {
        let bytes = build_csv(&sample_data()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("SUMMARY STATISTICS"));
        assert!(text.contains("Total Customers,2"));
        assert!(text.contains("Total Revenue,$350.50"));
        assert!(text.contains("Total Bookings,3"));
        assert!(text.contains("RECENT CUSTOMERS"));
        assert!(text.contains("Maria Silva,maria@example.com,555-0100,2025-05-02"));
    }
}
