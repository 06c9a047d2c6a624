use sqlx::{Row, SqlitePool};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::models::application::{ApplicationStats, JobApplication};
use crate::services::applications::StoreError;
use crate::utils::logger::LOGGER;

#[derive(Debug)]
pub struct AnalyticsService {
    pool: SqlitePool,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Counts, per-status breakdown and the newest application. All three
    /// reads share one transaction so they see the same snapshot.
    pub async fn get_stats(&self) -> Result<ApplicationStats, StoreError> {
        let start_time = Instant::now();
        let mut tx = self.pool.begin().await?;

        let total_applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count
             FROM job_applications
             GROUP BY status",
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut status_breakdown = BTreeMap::new();
        for row in rows {
            let status: String = row.try_get("status")?;
            let count: i64 = row.try_get("count")?;
            status_breakdown.insert(status, count);
        }

        let latest_application = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        LOGGER.log_database_query(
            "job_applications stats",
            start_time.elapsed().as_millis(),
            Some(status_breakdown.len()),
        );
        LOGGER.log_business_event(
            "stats_request_completed",
            None,
            HashMap::from([(
                "total_applications".to_string(),
                serde_json::Value::from(total_applications),
            )]),
        );

        Ok(ApplicationStats {
            total_applications,
            status_breakdown,
            latest_application,
        })
    }
}
