//! # Apartments API サーバー
//!
//! ## 起動手順
//!
//! 1. `.env` の読み込み（存在すれば）
//! 2. トレーシング初期化
//! 3. 設定読み込み
//! 4. データベース接続・マイグレーション（失敗時はポートをバインドせず終了）
//! 5. `0.0.0.0:4000` で待ち受け
//!
//! ```bash
//! cargo run -p apartments-api
//! ```

use anyhow::Context as _;
use apartments_api::{app_builder::build_app, config::ApiConfig};
use apartments_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("apartments-api");
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "apartments-api").entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    let addr = config
        .socket_addr()
        .context("バインドアドレスが不正です")?;

    tracing::info!("API サーバーを起動します: {}", addr);

    let app = build_app(&config).await.inspect_err(|e| {
        tracing::error!(error = %e, "起動処理に失敗しました");
    })?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
