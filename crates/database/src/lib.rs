//! PostgreSQL persistence layer for the object-scanner backend.
//!
//! This crate provides async database operations for users and scan
//! history using SQLx with PostgreSQL. All tables live in a configurable
//! schema (default `public`), selected via `search_path` on every pooled
//! connection.
//!
//! # Example
//!
//! ```no_run
//! use database::{users, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("postgres://localhost/scanner", "public").await?;
//!     db.migrate().await?;
//!
//!     // Register a user
//!     let user = users::create_user(db.pool(), "+15551234567", Some("Ada"), None).await?;
//!     println!("registered user {}", user.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod scans;
pub mod users;

pub use error::{DatabaseError, Result};
pub use models::{NewScan, ScanRecord, ScanStats, User};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    schema: String,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a PostgreSQL database, scoping every connection to the
    /// given schema.
    pub async fn connect(url: &str, schema: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, schema, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, schema: &str, pool_size: u32) -> Result<Self> {
        let search_path = schema.to_string();

        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    sqlx::query(&format!(r#"SET search_path TO "{search_path}""#))
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(url)
            .await?;

        tracing::info!(schema, pool_size, "Connected to database");

        Ok(Self {
            pool,
            schema: schema.to_string(),
        })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is
    /// up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        // The default schema always exists; custom ones may not yet.
        if self.schema != "public" {
            sqlx::query(&format!(r#"CREATE SCHEMA IF NOT EXISTS "{}""#, self.schema))
                .execute(&self.pool)
                .await?;
        }

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewScan;
    use std::time::{SystemTime, UNIX_EPOCH};

    // These tests need a live PostgreSQL server; point TEST_DATABASE_URL
    // at one and run with `cargo test -- --ignored`.
    async fn test_db() -> Database {
        let url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set for database tests");
        let db = Database::connect(&url, "public").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn unique_suffix() -> u128 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server (set TEST_DATABASE_URL)"]
    async fn register_twice_returns_single_row() {
        let db = test_db().await;
        let phone = format!("+7999{}", unique_suffix());

        let first = users::create_user(db.pool(), &phone, Some("Ada"), None)
            .await
            .unwrap();

        let second = users::create_user(db.pool(), &phone, Some("Ada"), None).await;
        assert!(matches!(
            second,
            Err(DatabaseError::AlreadyExists { entity: "User", .. })
        ));

        let found = users::find_by_phone(db.pool(), &phone).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server (set TEST_DATABASE_URL)"]
    async fn settings_update_sets_exact_value() {
        let db = test_db().await;
        let phone = format!("+7998{}", unique_suffix());

        let user = users::create_user(db.pool(), &phone, None, None).await.unwrap();
        assert!(!user.ai_responses_enabled);

        users::update_ai_responses(db.pool(), user.id, true).await.unwrap();
        let user = users::get_user(db.pool(), user.id).await.unwrap();
        assert!(user.ai_responses_enabled);

        users::update_ai_responses(db.pool(), user.id, false).await.unwrap();
        let user = users::get_user(db.pool(), user.id).await.unwrap();
        assert!(!user.ai_responses_enabled);
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server (set TEST_DATABASE_URL)"]
    async fn linking_mutates_existing_row_only() {
        let db = test_db().await;
        let suffix = unique_suffix();
        let phone = format!("+7997{suffix}");
        let yandex_id = format!("ya-{suffix}");

        let user = users::create_user(db.pool(), &phone, Some("Ada"), None).await.unwrap();
        assert!(!user.yandex_connected());

        let linked = users::link_yandex(db.pool(), user.id, &yandex_id, Some("ada@example.com"))
            .await
            .unwrap();
        assert_eq!(linked.id, user.id);
        assert_eq!(linked.phone, phone);
        assert!(linked.yandex_connected());

        let by_yandex = users::find_by_yandex_id(db.pool(), &yandex_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_yandex.id, user.id);

        let missing = users::link_yandex(db.pool(), i64::MAX, &yandex_id, None).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server (set TEST_DATABASE_URL)"]
    async fn history_limit_and_stats_cover_full_set() {
        let db = test_db().await;
        let phone = format!("+7996{}", unique_suffix());
        let user = users::create_user(db.pool(), &phone, None, None).await.unwrap();

        for confidence in [90, 80, 70, 60, 50] {
            let scan = NewScan {
                user_id: user.id,
                title: "Apple".to_string(),
                category: "Fruits".to_string(),
                confidence,
                ai_response: None,
            };
            scans::create_scan(db.pool(), &scan).await.unwrap();
        }

        let page = scans::list_for_user(db.pool(), user.id, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].id > page[1].id);

        let stats = scans::stats_for_user(db.pool(), user.id).await.unwrap();
        assert_eq!(stats.total_scans, 5);
        assert_eq!(stats.average_confidence.map(f64::round), Some(70.0));
    }
}
