//! # ヘルスチェック

use serde::Serialize;

/// 稼働状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// `GET /health` のレスポンス
///
/// ```
/// use apartments_shared::{HealthResponse, health::HealthStatus};
///
/// let response = HealthResponse::healthy("0.1.0");
/// assert_eq!(response.status, HealthStatus::Healthy);
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status:  HealthStatus,
    /// `CARGO_PKG_VERSION`
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status:  HealthStatus::Healthy,
            version: version.into(),
        }
    }
}
