use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

/// Opens the SQLite store, creating the file if missing, and applies the
/// embedded migrations.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database ready at {}", database_url);

    Ok(pool)
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_pool;

    #[tokio::test]
    async fn creates_schema_on_first_start() {
        let (pool, dir) = temp_pool().await;

        assert!(dir.path().join("test.db").exists());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn reopening_an_existing_store_keeps_data() {
        let (pool, dir) = temp_pool().await;
        sqlx::query(
            "INSERT INTO job_applications (company, position, status, progress, created_at, updated_at)
             VALUES ('Acme', 'Engineer', 'applied', 10, '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;

        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let reopened = super::create_pool(&url, 1).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&reopened)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
