//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user, created by phone registration or Yandex sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Generated identifier.
    pub id: i64,
    /// Login key. Synthetic `yandex_<id>` placeholder for users who
    /// registered through Yandex without a phone.
    pub phone: String,
    /// First name, if provided.
    pub first_name: Option<String>,
    /// Last name, if provided.
    pub last_name: Option<String>,
    /// Yandex account id, set once linked.
    pub yandex_id: Option<String>,
    /// Yandex account email, set once linked.
    pub yandex_email: Option<String>,
    /// Whether scan responses may include an AI description.
    pub ai_responses_enabled: bool,
}

impl User {
    /// Whether a Yandex account is linked to this user.
    pub fn yandex_connected(&self) -> bool {
        self.yandex_id.is_some()
    }
}

/// A stored scan result. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScanRecord {
    /// Generated identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Object label from the classifier.
    pub title: String,
    /// Object category from the classifier.
    pub category: String,
    /// Classifier confidence, 0-100.
    pub confidence: i32,
    /// Optional AI-generated description.
    pub ai_response: Option<String>,
    /// Creation timestamp. Immutable.
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new scan record.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_id: i64,
    pub title: String,
    pub category: String,
    pub confidence: i32,
    pub ai_response: Option<String>,
}

/// Aggregate statistics over all of a user's scan records.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct ScanStats {
    /// Total number of records.
    pub total_scans: i64,
    /// Mean confidence, `None` when the user has no records.
    pub average_confidence: Option<f64>,
}
