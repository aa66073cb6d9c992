// src/db/staff_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{
        auth::Gender,
        customer::AccountStatus,
        staff::{Staff, UpdateStaffPayload},
    },
};

const STAFF_COLUMNS: &str =
    "staff_id, user_id, full_name, email, phone, address, status, created_at, updated_at";

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_staff(&self, status: Option<AccountStatus>) -> Result<Vec<Staff>, AppError> {
        let staff = match status {
            Some(status) => {
                sqlx::query_as::<_, Staff>(&format!(
                    "SELECT {STAFF_COLUMNS} FROM staff WHERE status = $1 ORDER BY full_name ASC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Staff>(&format!(
                    "SELECT {STAFF_COLUMNS} FROM staff ORDER BY full_name ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(staff)
    }

    // Busca por nome, e-mail ou ID de funcionário.
    pub async fn search_staff(&self, query: &str) -> Result<Vec<Staff>, AppError> {
        let pattern = format!("%{}%", query);
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff \
             WHERE full_name ILIKE $1 OR email ILIKE $1 OR staff_id ILIKE $1 \
             ORDER BY full_name ASC"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(staff)
    }

    pub async fn find_by_id(&self, staff_id: &str) -> Result<Option<Staff>, AppError> {
        let maybe = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE staff_id = $1"
        ))
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, AppError> {
        let maybe = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Insere o registro de staff. O usuário correspondente é criado antes,
    // na mesma transação, pelo serviço.
    pub async fn insert_staff<'e, E>(
        &self,
        executor: E,
        staff_id: &str,
        user_id: i32,
        full_name: &str,
        email: &str,
        phone: &str,
        address: &str,
        status: AccountStatus,
    ) -> Result<Staff, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "INSERT INTO staff (staff_id, user_id, full_name, email, phone, address, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {STAFF_COLUMNS}"
        ))
        .bind(staff_id)
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "ID de funcionário ou e-mail".to_string(),
                    );
                }
            }
            e.into()
        })?;

        Ok(staff)
    }

    pub async fn update_staff_fields<'e, E>(
        &self,
        executor: E,
        staff_id: &str,
        changes: &UpdateStaffPayload,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if changes.staff_fields_empty() {
            return Ok(0);
        }
        let mut builder = build_staff_update(staff_id, changes);
        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    // Propaga nome/e-mail/gênero para a linha de 'users' ligada ao staff.
    pub async fn sync_linked_user<'e, E>(
        &self,
        executor: E,
        staff_id: &str,
        full_name: &str,
        email: &str,
        gender: Gender,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE users SET full_name = $1, email = $2, gender = $3, updated_at = NOW() \
             WHERE user_id = (SELECT user_id FROM staff WHERE staff_id = $4)",
        )
        .bind(full_name)
        .bind(email)
        .bind(gender)
        .bind(staff_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn linked_user_id<'e, E>(
        &self,
        executor: E,
        staff_id: &str,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe: Option<Option<i32>> =
            sqlx::query_scalar("SELECT user_id FROM staff WHERE staff_id = $1")
                .bind(staff_id)
                .fetch_optional(executor)
                .await?;
        Ok(maybe.flatten())
    }

    pub async fn delete_staff_row<'e, E>(&self, executor: E, staff_id: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM staff WHERE staff_id = $1")
            .bind(staff_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_user_row<'e, E>(&self, executor: E, user_id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

fn build_staff_update<'a>(
    staff_id: &'a str,
    changes: &'a UpdateStaffPayload,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE staff SET ");
    let mut fields = builder.separated(", ");

    if let Some(full_name) = &changes.full_name {
        fields.push("full_name = ").push_bind_unseparated(full_name);
    }
    if let Some(email) = &changes.email {
        fields.push("email = ").push_bind_unseparated(email);
    }
    if let Some(phone) = &changes.phone {
        fields.push("phone = ").push_bind_unseparated(phone);
    }
    if let Some(address) = &changes.address {
        fields.push("address = ").push_bind_unseparated(address);
    }
    if let Some(status) = changes.status {
        fields.push("status = ").push_bind_unseparated(status);
    }
    fields.push("updated_at = NOW()");

    builder.push(" WHERE staff_id = ").push_bind(staff_id);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_de_staff_ignora_campos_ausentes() {
        let changes = UpdateStaffPayload {
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        };
        let sql = build_staff_update("STF001", &changes).into_sql();

        assert!(sql.contains("status = "));
        assert!(!sql.contains("full_name"));
        assert!(!sql.contains("email"));
        assert!(!sql.contains("phone"));
        assert!(!sql.contains("address"));
    }
}
