//! Scan routes: submit an image for classification, list scan history.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use database::models::{NewScan, ScanRecord};
use database::{scans, users};
use vision::Classification;

/// Methods advertised on preflight.
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Default page size for history listings.
const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Defaults applied when the classifier omits a field.
const DEFAULT_TITLE: &str = "Unknown object";
const DEFAULT_CATEGORY: &str = "Other";
const DEFAULT_CONFIDENCE: i32 = 50;

/// CORS preflight.
pub async fn preflight() -> impl IntoResponse {
    super::preflight_response(ALLOWED_METHODS)
}

/// Request to classify and store a photographed object.
#[derive(Debug, Deserialize)]
pub struct SubmitScanRequest {
    pub user_id: Option<i64>,
    /// Base64-encoded image bytes.
    pub image: Option<String>,
}

/// The stored scan, as returned to the submitter.
#[derive(Serialize)]
pub struct ScanResponse {
    pub scan_id: i64,
    pub title: String,
    pub category: String,
    pub confidence: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Classify an image and persist the result.
pub async fn submit(
    State(state): State<AppState>,
    body: Option<Json<SubmitScanRequest>>,
) -> Result<impl IntoResponse> {
    let Json(req) = body.ok_or_else(super::invalid_body)?;

    let (user_id, image) = match (req.user_id, req.image) {
        (Some(user_id), Some(image)) if !image.is_empty() => (user_id, image),
        _ => {
            return Err(ApiError::Validation(
                "user_id and image are required".to_string(),
            ))
        }
    };

    let pool = state.db.pool();
    let user = users::get_user(pool, user_id).await?;

    let classifier = state
        .vision
        .as_ref()
        .ok_or_else(|| ApiError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

    // Nothing is written unless the classifier call and parse succeed.
    let classification = classifier.classify(&image, user.ai_responses_enabled).await?;

    let scan = new_scan(user_id, classification);
    let record = scans::create_scan(pool, &scan).await?;

    info!(user_id, scan_id = record.id, title = %record.title, "Stored scan result");

    let body = scan_response(record, user.ai_responses_enabled);
    Ok((StatusCode::CREATED, Json(body)))
}

/// Query parameters for history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<i64>,
    pub limit: Option<i64>,
}

/// One stored scan in a history listing.
#[derive(Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub confidence: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// History page plus aggregates over the user's full record set.
#[derive(Serialize)]
pub struct HistoryResponse {
    pub scans: Vec<HistoryEntry>,
    pub total_scans: i64,
    pub average_confidence: i64,
}

/// List a user's scan history, newest first.
pub async fn history(
    State(state): State<AppState>,
    query: Option<Query<HistoryQuery>>,
) -> Result<Json<HistoryResponse>> {
    let HistoryQuery { user_id, limit } = query
        .map(|q| q.0)
        .ok_or_else(|| ApiError::Validation("invalid query parameters".to_string()))?;

    let user_id =
        user_id.ok_or_else(|| ApiError::Validation("user_id is required".to_string()))?;
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(0);

    let pool = state.db.pool();
    let records = scans::list_for_user(pool, user_id, limit).await?;
    let stats = scans::stats_for_user(pool, user_id).await?;

    Ok(Json(HistoryResponse {
        scans: records.into_iter().map(history_entry).collect(),
        total_scans: stats.total_scans,
        average_confidence: round_average(stats.average_confidence),
    }))
}

/// Apply classifier defaults and shape the row to insert.
fn new_scan(user_id: i64, classification: Classification) -> NewScan {
    NewScan {
        user_id,
        title: classification
            .title
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        category: classification
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        confidence: classification
            .confidence
            .map(|c| c.round() as i32)
            .unwrap_or(DEFAULT_CONFIDENCE),
        ai_response: classification.description,
    }
}

/// Shape the submit response. The description is withheld whenever the
/// user has AI responses disabled, even if the classifier sent one.
fn scan_response(record: ScanRecord, ai_responses_enabled: bool) -> ScanResponse {
    ScanResponse {
        scan_id: record.id,
        title: record.title,
        category: record.category,
        confidence: record.confidence,
        description: if ai_responses_enabled {
            record.ai_response
        } else {
            None
        },
        created_at: record.created_at,
    }
}

fn history_entry(record: ScanRecord) -> HistoryEntry {
    HistoryEntry {
        id: record.id,
        title: record.title,
        category: record.category,
        confidence: record.confidence,
        description: record.ai_response,
        created_at: record.created_at,
    }
}

/// Mean confidence rounded to the nearest integer, 0 with no records.
fn round_average(average: Option<f64>) -> i64 {
    average.map(|a| a.round() as i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(description: Option<&str>) -> Classification {
        Classification {
            title: Some("Apple".to_string()),
            category: Some("Fruits".to_string()),
            confidence: Some(92.0),
            description: description.map(str::to_string),
        }
    }

    fn record(description: Option<&str>) -> ScanRecord {
        ScanRecord {
            id: 1,
            user_id: 7,
            title: "Apple".to_string(),
            category: "Fruits".to_string(),
            confidence: 92,
            ai_response: description.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_scan_applies_defaults() {
        let empty = Classification {
            title: None,
            category: None,
            confidence: None,
            description: None,
        };

        let scan = new_scan(7, empty);
        assert_eq!(scan.title, "Unknown object");
        assert_eq!(scan.category, "Other");
        assert_eq!(scan.confidence, 50);
        assert_eq!(scan.ai_response, None);
    }

    #[test]
    fn test_new_scan_keeps_classifier_fields() {
        let scan = new_scan(7, classification(Some("A red apple.")));
        assert_eq!(scan.user_id, 7);
        assert_eq!(scan.title, "Apple");
        assert_eq!(scan.category, "Fruits");
        assert_eq!(scan.confidence, 92);
        assert_eq!(scan.ai_response.as_deref(), Some("A red apple."));
    }

    #[test]
    fn test_new_scan_rounds_fractional_confidence() {
        let mut c = classification(None);
        c.confidence = Some(87.5);
        assert_eq!(new_scan(7, c).confidence, 88);
    }

    #[test]
    fn test_description_included_only_when_enabled() {
        let shown = scan_response(record(Some("A red apple.")), true);
        assert_eq!(shown.description.as_deref(), Some("A red apple."));

        let withheld = scan_response(record(Some("A red apple.")), false);
        assert_eq!(withheld.description, None);

        let absent = scan_response(record(None), true);
        assert_eq!(absent.description, None);
    }

    #[test]
    fn test_round_average() {
        assert_eq!(round_average(None), 0);
        assert_eq!(round_average(Some(70.0)), 70);
        assert_eq!(round_average(Some(69.5)), 70);
        assert_eq!(round_average(Some(69.4)), 69);
    }
}
