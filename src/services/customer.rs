// src/services/customer.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{AccountStatus, Customer, NewCustomerPayload, UpdateCustomerPayload},
    services::booking_rules,
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Customer>, AppError> {
        self.repo.get_customers(status).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, AppError> {
        self.repo.search_customers(query).await
    }

    pub async fn get(&self, customer_id: &str) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    // Cadastro manual pela recepção. A varredura do próximo CUSTxxxx e o
    // INSERT rodam na mesma transação; se o sufixo falhar, cai no plano B
    // por timestamp, como o fluxo legado fazia.
    pub async fn add(&self, payload: &NewCustomerPayload) -> Result<Customer, AppError> {
        let mut tx = self.pool.begin().await?;

        let customer_id = match self.repo.next_customer_suffix(&mut *tx).await {
            Ok(suffix) => booking_rules::format_customer_id(suffix),
            Err(err) => {
                tracing::error!("Falha ao gerar ID de cliente: {}", err);
                format!("CUST{}", Utc::now().timestamp())
            }
        };

        let customer = self
            .repo
            .insert_customer(
                &mut *tx,
                &customer_id,
                None,
                &payload.full_name,
                &payload.email,
                &payload.address,
                &payload.phone,
                payload.status.unwrap_or(AccountStatus::Active),
            )
            .await?;

        tx.commit().await?;
        Ok(customer)
    }

    pub async fn update(
        &self,
        customer_id: &str,
        changes: &UpdateCustomerPayload,
    ) -> Result<(), AppError> {
        if changes.is_empty() {
            return Err(AppError::EmptyUpdate);
        }
        let updated = self.repo.update_customer(customer_id, changes).await?;
        if !updated {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }

    pub async fn delete(&self, customer_id: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_customer(customer_id).await?;
        if !deleted {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }
}
