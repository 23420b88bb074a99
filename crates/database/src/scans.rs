//! Scan history queries.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{NewScan, ScanRecord, ScanStats};

/// Insert a new scan record.
pub async fn create_scan(pool: &PgPool, scan: &NewScan) -> Result<ScanRecord> {
    let record = sqlx::query_as::<_, ScanRecord>(
        r#"
        INSERT INTO scan_history (user_id, title, category, confidence, ai_response)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, title, category, confidence, ai_response, created_at
        "#,
    )
    .bind(scan.user_id)
    .bind(&scan.title)
    .bind(&scan.category)
    .bind(scan.confidence)
    .bind(&scan.ai_response)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// List a user's scan records, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: i64, limit: i64) -> Result<Vec<ScanRecord>> {
    let records = sqlx::query_as::<_, ScanRecord>(
        r#"
        SELECT id, user_id, title, category, confidence, ai_response, created_at
        FROM scan_history
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Aggregate count and mean confidence over all of a user's records,
/// independent of any listing limit.
pub async fn stats_for_user(pool: &PgPool, user_id: i64) -> Result<ScanStats> {
    let stats = sqlx::query_as::<_, ScanStats>(
        r#"
        SELECT COUNT(*) AS total_scans,
               AVG(confidence)::double precision AS average_confidence
        FROM scan_history
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
