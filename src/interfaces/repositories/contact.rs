use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactSubmission, SubmissionMetadata},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores the submission and its metadata together, returning the submission id.
    async fn insert_submission(
        &self,
        submission: &ContactSubmission,
        metadata: &SubmissionMetadata,
    ) -> Result<Uuid, AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;

    fn kind(&self) -> &'static str;
}

#[async_trait]
impl<T> ContactRepository for Arc<T>
where
    T: ContactRepository + ?Sized,
{
    async fn insert_submission(
        &self,
        submission: &ContactSubmission,
        metadata: &SubmissionMetadata,
    ) -> Result<Uuid, AppError> {
        (**self).insert_submission(submission, metadata).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn insert_submission(
        &self,
        submission: &ContactSubmission,
        metadata: &SubmissionMetadata,
    ) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let meta_id = Uuid::new_v4();
        sqlx::query!(
            "INSERT INTO form_submission_meta (id, ip, user_agent, time, host) VALUES ($1, $2, $3, $4, $5)",
            meta_id,
            metadata.ip.as_deref(),
            metadata.user_agent.as_deref(),
            metadata.time.as_deref(),
            metadata.host.as_deref(),
        )
        .execute(&mut *tx)
        .await?;

        let id = Uuid::new_v4();
        sqlx::query!(
            "INSERT INTO form_contact (id, meta_id, name, email_address, phone, consent, message, copy, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            id,
            meta_id,
            submission.name,
            submission.email,
            submission.phone.as_deref(),
            submission.consent,
            submission.message,
            submission.copy,
            submission.created_at,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(id)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
