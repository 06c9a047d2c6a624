use chrono::Utc;
use sqlx::SqlitePool;
use std::time::Instant;
use thiserror::Error;

use crate::models::application::{JobApplication, NewApplication, StatusPatch};
use crate::utils::{errors::AppError, logger::LOGGER};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("application {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => AppError::application_not_found(id),
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}

/// CRUD over the `job_applications` table.
///
/// Every write runs in its own transaction. Returning early with an error
/// drops the transaction, which rolls it back.
#[derive(Debug, Clone)]
pub struct ApplicationService {
    pool: SqlitePool,
}

impl ApplicationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewApplication) -> Result<JobApplication, StoreError> {
        let start_time = Instant::now();
        let now = Utc::now();
        let query = r#"
            INSERT INTO job_applications (company, position, status, progress, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        "#;

        let mut tx = self.pool.begin().await?;
        let application = sqlx::query_as::<_, JobApplication>(query)
            .bind(&new.company)
            .bind(&new.position)
            .bind(new.status)
            .bind(new.progress)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        LOGGER.log_database_query(query, start_time.elapsed().as_millis(), Some(1));
        Ok(application)
    }

    pub async fn get_all(&self) -> Result<Vec<JobApplication>, StoreError> {
        let start_time = Instant::now();
        let query = "SELECT * FROM job_applications ORDER BY id";

        let applications = sqlx::query_as::<_, JobApplication>(query)
            .fetch_all(&self.pool)
            .await?;

        LOGGER.log_database_query(query, start_time.elapsed().as_millis(), Some(applications.len()));
        Ok(applications)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<JobApplication, StoreError> {
        let start_time = Instant::now();
        let query = "SELECT * FROM job_applications WHERE id = $1";

        let application = sqlx::query_as::<_, JobApplication>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        LOGGER.log_database_query(
            query,
            start_time.elapsed().as_millis(),
            Some(usize::from(application.is_some())),
        );
        application.ok_or(StoreError::NotFound(id))
    }

    pub async fn replace(&self, id: i64, new: &NewApplication) -> Result<JobApplication, StoreError> {
        let start_time = Instant::now();
        let query = r#"
            UPDATE job_applications
            SET company = $1,
                position = $2,
                status = $3,
                progress = $4,
                updated_at = $5
            WHERE id = $6
            RETURNING *
        "#;

        let mut tx = self.pool.begin().await?;
        let application = sqlx::query_as::<_, JobApplication>(query)
            .bind(&new.company)
            .bind(&new.position)
            .bind(new.status)
            .bind(new.progress)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        tx.commit().await?;

        LOGGER.log_database_query(query, start_time.elapsed().as_millis(), Some(1));
        Ok(application)
    }

    pub async fn patch_status(&self, id: i64, patch: &StatusPatch) -> Result<JobApplication, StoreError> {
        let start_time = Instant::now();
        let query = r#"
            UPDATE job_applications
            SET status = $1,
                progress = COALESCE($2, progress),
                updated_at = $3
            WHERE id = $4
            RETURNING *
        "#;

        let mut tx = self.pool.begin().await?;
        let application = sqlx::query_as::<_, JobApplication>(query)
            .bind(patch.status)
            .bind(patch.progress)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        tx.commit().await?;

        LOGGER.log_database_query(query, start_time.elapsed().as_millis(), Some(1));
        Ok(application)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let start_time = Instant::now();
        let query = "DELETE FROM job_applications WHERE id = $1";

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(query).bind(id).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;

        LOGGER.log_database_query(
            query,
            start_time.elapsed().as_millis(),
            Some(result.rows_affected() as usize),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::utils::database::test_support::temp_pool;

    fn acme() -> NewApplication {
        NewApplication {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            status: ApplicationStatus::Applied,
            progress: 10,
        }
    }

    #[tokio::test]
    async fn create_then_fetch_returns_same_record() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);

        let created = service.create(&acme()).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.status, ApplicationStatus::Applied);
    }

    #[tokio::test]
    async fn get_all_keeps_insertion_order() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);

        let first = service.create(&acme()).await.unwrap();
        let second = service
            .create(&NewApplication { company: "Globex".into(), ..acme() })
            .await
            .unwrap();

        let ids: Vec<i64> = service.get_all().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn replace_overwrites_fields_and_refreshes_updated_at() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);
        let created = service.create(&acme()).await.unwrap();

        let replaced = service
            .replace(
                created.id,
                &NewApplication {
                    company: "Initech".into(),
                    position: "Staff Engineer".into(),
                    status: ApplicationStatus::Offered,
                    progress: 90,
                },
            )
            .await
            .unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.company, "Initech");
        assert_eq!(replaced.status, ApplicationStatus::Offered);
        assert_eq!(replaced.progress, 90);
        assert_eq!(replaced.created_at, created.created_at);
        assert!(replaced.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn patch_keeps_progress_when_not_supplied() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);
        let created = service.create(&acme()).await.unwrap();

        let patched = service
            .patch_status(created.id, &StatusPatch { status: ApplicationStatus::Interviewed, progress: None })
            .await
            .unwrap();
        assert_eq!(patched.status, ApplicationStatus::Interviewed);
        assert_eq!(patched.progress, 10);

        let patched = service
            .patch_status(created.id, &StatusPatch { status: ApplicationStatus::Offered, progress: Some(80) })
            .await
            .unwrap();
        assert_eq!(patched.progress, 80);
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);

        assert!(matches!(service.get_by_id(42).await, Err(StoreError::NotFound(42))));
        assert!(matches!(service.replace(42, &acme()).await, Err(StoreError::NotFound(42))));
        assert!(matches!(
            service
                .patch_status(42, &StatusPatch { status: ApplicationStatus::Rejected, progress: None })
                .await,
            Err(StoreError::NotFound(42))
        ));
        assert!(matches!(service.delete(42).await, Err(StoreError::NotFound(42))));
    }

    #[tokio::test]
    async fn delete_is_permanent_and_ids_are_not_reused() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool);
        let created = service.create(&acme()).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(service.get_by_id(created.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(StoreError::NotFound(_))));

        let next = service.create(&acme()).await.unwrap();
        assert!(next.id > created.id);
    }

    #[tokio::test]
    async fn failed_write_leaves_store_unchanged() {
        let (pool, _dir) = temp_pool().await;
        let service = ApplicationService::new(pool.clone());
        let created = service.create(&acme()).await.unwrap();

        // The table CHECK constraint rejects this inside the transaction.
        let result = service
            .replace(created.id, &NewApplication { progress: 250, ..acme() })
            .await;
        assert!(matches!(result, Err(StoreError::Database(_))));

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }
}
