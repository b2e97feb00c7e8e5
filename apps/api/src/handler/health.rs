//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! {"status":"healthy","version":"0.1.0"}
//! ```
//!
//! データベースや外部 API への接続は確認せず、プロセスの稼働のみを返す。

use apartments_shared::HealthResponse;
use axum::Json;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

#[cfg(test)]
mod tests {
    use apartments_shared::health::HealthStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_health_checkはhealthyを返す() {
        let Json(response) = health_check().await;

        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
