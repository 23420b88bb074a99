//! Application state shared across handlers.

use database::Database;
use vision::VisionClient;
use yandex_oauth::YandexClient;

/// Shared application state.
///
/// The outbound clients are `None` when their credentials are not
/// configured; handlers that need one report a configuration error.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Vision classifier client.
    pub vision: Option<VisionClient>,
    /// Yandex OAuth client.
    pub yandex: Option<YandexClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, vision: Option<VisionClient>, yandex: Option<YandexClient>) -> Self {
        Self { db, vision, yandex }
    }
}
