pub mod models;
pub mod store;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Pool tuning knobs, overridable through the environment.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_connections: std::env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_POOL_MIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}

/// Open a connection pool and verify it with a round-trip query.
pub async fn connect(database_url: &str, config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to the database...");
    tracing::debug!(
        "Database URL: {}",
        database_url.replace(
            |c: char| !c.is_ascii_alphanumeric() && c != ':' && c != '/' && c != '@' && c != '.',
            "*"
        )
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool ready");

    Ok(pool)
}

/// Measure a round-trip to the store; used by the health endpoint.
pub async fn health_check(pool: &PgPool) -> Result<std::time::Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(start.elapsed())
}

/// Create the two collections if they don't exist yet. Comments are
/// embedded in the post row as a JSONB array; they have no table of
/// their own.
pub async fn setup_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Setting up database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            user_name TEXT NOT NULL UNIQUE
        )
    "#,
    )
    .execute(pool)
    .await?;

    // author_id carries no FK: the relation is a weak reference and the
    // cascade is handled explicitly by the store.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            author_id UUID NOT NULL,
            title TEXT NOT NULL,
            content TEXT,
            created TIMESTAMPTZ NOT NULL DEFAULT now(),
            comments JSONB NOT NULL DEFAULT '[]'
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_posts_author_id ON blog_posts(author_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_posts_created ON blog_posts(created)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_default_uses_env_or_fallback() {
        let config = DbConfig::default();
        assert!(config.max_connections >= 1);
        assert!(config.acquire_timeout_secs >= 1);
        assert!(config.idle_timeout_secs >= 1);
    }
}
