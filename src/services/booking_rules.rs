// src/services/booking_rules.rs
//
// Regras de negócio de reserva consolidadas em um único lugar: cada tela do
// sistema antigo carregava a própria cópia de parsing de data, parsing de
// valor e tabela de preços. Aqui existe UMA versão, usada por todos os
// chamadores.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::common::error::AppError;
use crate::models::reservation::{FulfillmentStatus, RoomTypeInfo};

// Formatos aceitos para datas digitadas, na ordem de tentativa.
// O primeiro que fizer parse vence.
pub const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",  // formato do banco
    "%b %d, %Y", // formato de exibição
    "%m/%d/%y",  // formato do calendário
    "%m/%d/%Y",  // formato americano
    "%d/%m/%Y",  // formato europeu
    "%B %d, %Y", // mês por extenso
    "%Y/%m/%d",  // quase-ISO
];

// Origem da operação. O fluxo do cliente bloqueia check-in no passado;
// o balcão da recepção não. Essa assimetria é comportamento herdado e
// mantido de propósito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOrigin {
    CustomerPortal,
    FrontDesk,
}

pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, AppError> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    Err(AppError::InvalidDate(raw.to_string()))
}

// Aceita "$200.00", "1,250.50", "200" etc.: remove tudo que não for
// dígito ou ponto e interpreta o resto como decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if cleaned.is_empty() {
        return Err(AppError::InvalidAmount(raw.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| AppError::InvalidAmount(raw.to_string()))
}

// Tabela estática de diárias sugeridas. O valor gravado é sempre o que o
// chamador mandar; isto só pré-preenche o formulário.
pub fn suggested_rate(room_type: &str) -> Decimal {
    match room_type {
        "Single" => Decimal::from(100),
        "Double" => Decimal::from(150),
        "Suite" => Decimal::from(200),
        "Deluxe" => Decimal::from(250),
        _ => Decimal::ZERO,
    }
}

// Catálogo usado quando o banco ainda não tem nenhuma reserva da qual
// extrair tipos de quarto.
pub fn fallback_room_catalog() -> Vec<RoomTypeInfo> {
    vec![
        RoomTypeInfo {
            room_type: "Single".into(),
            rate: Decimal::from(99),
            description: "Standard single room".into(),
        },
        RoomTypeInfo {
            room_type: "Double".into(),
            rate: Decimal::from(129),
            description: "Standard double room".into(),
        },
        RoomTypeInfo {
            room_type: "Suite".into(),
            rate: Decimal::from(199),
            description: "Luxury suite with extra space".into(),
        },
        RoomTypeInfo {
            room_type: "Deluxe".into(),
            rate: Decimal::from(249),
            description: "Premium deluxe room with amenities".into(),
        },
    ]
}

// Invariante central: check-out estritamente depois do check-in.
// Check-in no passado só é barrado no portal do cliente.
pub fn validate_stay(
    origin: BookingOrigin,
    checkin: NaiveDate,
    checkout: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if checkout <= checkin {
        return Err(AppError::StayRange);
    }
    if origin == BookingOrigin::CustomerPortal && checkin < today {
        return Err(AppError::PastCheckin);
    }
    Ok(())
}

// O portal do cliente exige valor positivo; o balcão aceita o que vier.
pub fn validate_amount(origin: BookingOrigin, amount: Decimal) -> Result<(), AppError> {
    if origin == BookingOrigin::CustomerPortal && amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}

// Cancelada é estado terminal: nada mais pode ser editado.
pub fn can_edit(status: FulfillmentStatus) -> bool {
    status != FulfillmentStatus::Cancelled
}

pub fn format_reservation_id(seq: i64) -> String {
    format!("RES{:05}", seq)
}

// Plano B quando a sequência falha ou o ID calculado colide.
pub fn fallback_reservation_id(epoch_secs: i64) -> String {
    format!("RES{}", epoch_secs)
}

pub fn format_customer_id(user_id: i64) -> String {
    format!("CUST{:04}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, dd: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dd).unwrap()
    }

    #[test]
    fn aceita_todos_os_formatos_de_data() {
        let esperado = d(2025, 3, 1);
        for raw in [
            "2025-03-01",
            "Mar 01, 2025",
            "03/01/25",
            "03/01/2025",
            "March 01, 2025",
            "2025/03/01",
        ] {
            assert_eq!(parse_booking_date(raw).unwrap(), esperado, "formato: {raw}");
        }
        // Formato europeu: só vence quando o americano não casa
        // (dia 25 não é um mês válido).
        assert_eq!(parse_booking_date("25/12/2025").unwrap(), d(2025, 12, 25));
    }

    #[test]
    fn o_primeiro_formato_que_casa_vence() {
        // "02/03/2025" casa primeiro como %m/%d/%Y (americano), não como
        // %d/%m/%Y — comportamento da lista ordenada.
        assert_eq!(parse_booking_date("02/03/2025").unwrap(), d(2025, 2, 3));
    }

    #[test]
    fn rejeita_data_ilegivel() {
        assert!(matches!(
            parse_booking_date("amanhã"),
            Err(AppError::InvalidDate(_))
        ));
        assert!(matches!(parse_booking_date(""), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn parse_de_valor_com_cifrao_e_virgula() {
        assert_eq!(parse_amount("$200.00").unwrap(), Decimal::from(200));
        assert_eq!(
            parse_amount("1,250.50").unwrap(),
            Decimal::from_str("1250.50").unwrap()
        );
        assert_eq!(parse_amount("175").unwrap(), Decimal::from(175));
    }

    #[test]
    fn rejeita_valor_ilegivel() {
        assert!(matches!(parse_amount("abc"), Err(AppError::InvalidAmount(_))));
        assert!(matches!(parse_amount(""), Err(AppError::InvalidAmount(_))));
        assert!(matches!(parse_amount("1.2.3"), Err(AppError::InvalidAmount(_))));
    }

    #[test]
    fn tabela_de_precos_estatica() {
        assert_eq!(suggested_rate("Single"), Decimal::from(100));
        assert_eq!(suggested_rate("Double"), Decimal::from(150));
        assert_eq!(suggested_rate("Suite"), Decimal::from(200));
        assert_eq!(suggested_rate("Deluxe"), Decimal::from(250));
        // Tipo desconhecido sugere $0.00.
        assert_eq!(suggested_rate("Penthouse"), Decimal::ZERO);
    }

    #[test]
    fn checkout_deve_ser_depois_do_checkin() {
        let hoje = d(2025, 1, 1);
        let err = validate_stay(
            BookingOrigin::FrontDesk,
            d(2025, 3, 3),
            d(2025, 3, 1),
            hoje,
        );
        assert!(matches!(err, Err(AppError::StayRange)));

        // Datas iguais também são rejeitadas.
        let err = validate_stay(
            BookingOrigin::FrontDesk,
            d(2025, 3, 1),
            d(2025, 3, 1),
            hoje,
        );
        assert!(matches!(err, Err(AppError::StayRange)));

        assert!(validate_stay(
            BookingOrigin::FrontDesk,
            d(2025, 3, 1),
            d(2025, 3, 3),
            hoje,
        )
        .is_ok());
    }

    #[test]
    fn checkin_no_passado_so_bloqueia_o_portal_do_cliente() {
        let hoje = d(2025, 6, 15);
        let passado = d(2025, 6, 1);
        let futuro = d(2025, 6, 20);

        assert!(matches!(
            validate_stay(BookingOrigin::CustomerPortal, passado, futuro, hoje),
            Err(AppError::PastCheckin)
        ));
        // O balcão aceita reservas retroativas.
        assert!(validate_stay(BookingOrigin::FrontDesk, passado, futuro, hoje).is_ok());
    }

    #[test]
    fn valor_positivo_exigido_apenas_no_portal() {
        assert!(matches!(
            validate_amount(BookingOrigin::CustomerPortal, Decimal::ZERO),
            Err(AppError::InvalidAmount(_))
        ));
        assert!(validate_amount(BookingOrigin::FrontDesk, Decimal::ZERO).is_ok());
        assert!(validate_amount(BookingOrigin::CustomerPortal, Decimal::from(1)).is_ok());
    }

    #[test]
    fn reserva_cancelada_nao_pode_ser_editada() {
        assert!(!can_edit(FulfillmentStatus::Cancelled));
        assert!(can_edit(FulfillmentStatus::Pending));
        assert!(can_edit(FulfillmentStatus::Confirmed));
    }

    #[test]
    fn formato_dos_identificadores() {
        assert_eq!(format_reservation_id(1), "RES00001");
        assert_eq!(format_reservation_id(42), "RES00042");
        assert_eq!(format_reservation_id(123456), "RES123456");
        assert_eq!(fallback_reservation_id(1_700_000_000), "RES1700000000");
        assert_eq!(format_customer_id(7), "CUST0007");
        assert_eq!(format_customer_id(12345), "CUST12345");
    }
}
