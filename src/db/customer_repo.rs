// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::customer::{AccountStatus, Customer, UpdateCustomerPayload},
};

const CUSTOMER_COLUMNS: &str =
    "customer_id, user_id, full_name, email, address, phone, status, created_at, updated_at";

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem com filtro opcional de status ("all" vira None no handler).
    pub async fn get_customers(
        &self,
        status: Option<AccountStatus>,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = match status {
            Some(status) => {
                sqlx::query_as::<_, Customer>(&format!(
                    "SELECT {CUSTOMER_COLUMNS} FROM customers \
                     WHERE status = $1 ORDER BY full_name ASC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Customer>(&format!(
                    "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY full_name ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(customers)
    }

    // Busca livre por nome, e-mail, endereço ou telefone.
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, AppError> {
        let pattern = format!("%{}%", query);
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE full_name ILIKE $1 OR email ILIKE $1 OR address ILIKE $1 OR phone ILIKE $1 \
             ORDER BY full_name ASC"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn find_by_id(&self, customer_id: &str) -> Result<Option<Customer>, AppError> {
        let maybe = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let maybe = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_user_id<'e, E>(
        &self,
        executor: E,
        user_id: i32,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // Próximo sufixo numérico livre de CUSTxxxx. Roda dentro da transação do
    // chamador para que a varredura e o INSERT sejam uma unidade só.
    pub async fn next_customer_suffix<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let max: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(CAST(SUBSTRING(customer_id FROM 5) AS BIGINT)) FROM customers \
             WHERE customer_id ~ '^CUST[0-9]+$'",
        )
        .fetch_one(executor)
        .await?;
        Ok(max.unwrap_or(0) + 1)
    }

    pub async fn insert_customer<'e, E>(
        &self,
        executor: E,
        customer_id: &str,
        user_id: Option<i32>,
        full_name: &str,
        email: &str,
        address: &str,
        phone: &str,
        status: AccountStatus,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (customer_id, user_id, full_name, email, address, phone, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(address)
        .bind(phone)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(customer)
    }

    // Atualização parcial: o SQL só contém as colunas presentes no payload.
    pub async fn update_customer(
        &self,
        customer_id: &str,
        changes: &UpdateCustomerPayload,
    ) -> Result<bool, AppError> {
        if changes.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        let mut builder = build_customer_update(customer_id, changes);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_customer(&self, customer_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Monta o UPDATE coluna a coluna, na mesma linha do legado: campo ausente
// fica intocado, nunca vira NULL.
fn build_customer_update<'a>(
    customer_id: &'a str,
    changes: &'a UpdateCustomerPayload,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE customers SET ");
    let mut fields = builder.separated(", ");

    if let Some(full_name) = &changes.full_name {
        fields.push("full_name = ").push_bind_unseparated(full_name);
    }
    if let Some(email) = &changes.email {
        fields.push("email = ").push_bind_unseparated(email);
    }
    if let Some(address) = &changes.address {
        fields.push("address = ").push_bind_unseparated(address);
    }
    if let Some(phone) = &changes.phone {
        fields.push("phone = ").push_bind_unseparated(phone);
    }
    if let Some(status) = changes.status {
        fields.push("status = ").push_bind_unseparated(status);
    }
    fields.push("updated_at = NOW()");

    builder.push(" WHERE customer_id = ").push_bind(customer_id);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_parcial_so_inclui_campos_presentes() {
        let changes = UpdateCustomerPayload {
            phone: Some("555-0100".into()),
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        };
        let sql = build_customer_update("CUST0001", &changes).into_sql();

        assert!(sql.contains("phone = "));
        assert!(sql.contains("status = "));
        assert!(sql.contains("updated_at = NOW()"));
        assert!(!sql.contains("full_name"));
        assert!(!sql.contains("email"));
        assert!(!sql.contains("address"));
        assert!(sql.ends_with("WHERE customer_id = $3"));
    }

    #[test]
    fn update_completo_inclui_todas_as_colunas() {
        let changes = UpdateCustomerPayload {
            full_name: Some("Maria Silva".into()),
            email: Some("maria@example.com".into()),
            address: Some("Rua A, 10".into()),
            phone: Some("555-0101".into()),
            status: Some(AccountStatus::Active),
        };
        let sql = build_customer_update("CUST0002", &changes).into_sql();

        for col in ["full_name", "email", "address", "phone", "status"] {
            assert!(sql.contains(&format!("{col} = ")), "faltou {col}");
        }
    }
}
