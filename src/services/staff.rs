// src/services/staff.rs

use bcrypt::hash;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{StaffRepository, UserRepository},
    models::{
        auth::{Gender, Role},
        customer::AccountStatus,
        staff::{NewStaffPayload, Staff, UpdateStaffPayload},
    },
};

#[derive(Clone)]
pub struct StaffService {
    repo: StaffRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl StaffService {
    pub fn new(repo: StaffRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self {
            repo,
            user_repo,
            pool,
        }
    }

    pub async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Staff>, AppError> {
        self.repo.get_staff(status).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Staff>, AppError> {
        self.repo.search_staff(query).await
    }

    // Criação de funcionário: usuário (role=staff) e registro de staff na
    // mesma transação — um não existe sem o outro.
    pub async fn add(&self, payload: &NewStaffPayload) -> Result<Staff, AppError> {
        let email = payload.email.trim().to_lowercase();

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.full_name,
                &email,
                &hashed_password,
                payload.gender.unwrap_or(Gender::Other),
                Role::Staff,
            )
            .await?;

        let staff = self
            .repo
            .insert_staff(
                &mut *tx,
                &payload.staff_id,
                user.user_id,
                &payload.full_name,
                &email,
                &payload.phone,
                &payload.address,
                payload.status.unwrap_or(AccountStatus::Active),
            )
            .await?;

        tx.commit().await?;
        tracing::info!("Funcionário {} criado para {}", staff.staff_id, email);
        Ok(staff)
    }

    pub async fn update(
        &self,
        staff_id: &str,
        changes: &UpdateStaffPayload,
    ) -> Result<(), AppError> {
        let Some(_current) = self.repo.find_by_id(staff_id).await? else {
            return Err(AppError::NotFound("Funcionário"));
        };

        let mut tx = self.pool.begin().await?;

        // Troca de senha opcional, re-hasheada aqui.
        if let Some(password) = &changes.password {
            let password = password.clone();
            let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

            if let Some(user_id) = self.repo.linked_user_id(&mut *tx, staff_id).await? {
                self.user_repo
                    .update_password(&mut *tx, user_id, &hashed)
                    .await?;
            }
        }

        self.repo
            .update_staff_fields(&mut *tx, staff_id, changes)
            .await?;

        // Nome/e-mail/gênero são espelhados na linha de 'users' vinculada.
        if let (Some(full_name), Some(email)) = (&changes.full_name, &changes.email) {
            self.repo
                .sync_linked_user(
                    &mut *tx,
                    staff_id,
                    full_name,
                    email,
                    changes.gender.unwrap_or(Gender::Other),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // Exclusão em cascata: remove o staff e o usuário vinculado.
    pub async fn delete(&self, staff_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id = self.repo.linked_user_id(&mut *tx, staff_id).await?;

        let removed = self.repo.delete_staff_row(&mut *tx, staff_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Funcionário"));
        }

        if let Some(user_id) = user_id {
            self.repo.delete_user_row(&mut *tx, user_id).await?;
        }

        tx.commit().await?;
        tracing::info!("Funcionário {} removido (cascata no usuário)", staff_id);
        Ok(())
    }
}
