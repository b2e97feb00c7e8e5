//! # アプリケーション構築
//!
//! DI（データベース・外部サービスクライアント・State）の初期化とルーター構築を担当する。
//! `main.rs` はトレーシング初期化とサーバー起動に集中する。
//!
//! ## ルーティング
//!
//! ```text
//! GET  /health
//! /api/location
//!   GET  /autocomplete
//!   GET  /search
//! /api/user
//!   POST /register | /login | /facebook | /google | /apple | /forgotpassword
//! ```
//!
//! 未定義のパスと、定義済みパスへの未対応メソッドはどちらも 404 を返す。

use std::sync::Arc;

use anyhow::Context as _;
use apartments_infra::{
    db,
    geocoding::RadarLocationProvider,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    password::Argon2PasswordService,
    repository::PostgresUserRepository,
    social::{AppleTokenVerifier, FacebookTokenVerifier, GoogleTokenVerifier, SocialTokenVerifier},
    token::JwtTokenIssuer,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::{ApiConfig, NotificationConfig},
    handler::{
        LocationState,
        UserState,
        apple,
        autocomplete,
        facebook,
        forgot_password,
        google,
        health_check,
        login,
        not_found,
        register,
        search,
    },
    usecase::{
        LocationUseCase,
        LocationUseCaseImpl,
        PasswordResetMailer,
        TemplateRenderer,
        UserUseCase,
        UserUseCaseImpl,
    },
};

/// ルーターを構築する
///
/// ユースケースを受け取り、2 つのルートグループとフォールバックを組み立てる。
pub fn build_router(
    location_usecase: Arc<dyn LocationUseCase>,
    user_usecase: Arc<dyn UserUseCase>,
) -> Router {
    let location_state = Arc::new(LocationState {
        usecase: location_usecase,
    });
    let user_state = Arc::new(UserState {
        usecase: user_usecase,
    });

    let location_routes = Router::new()
        .route("/autocomplete", get(autocomplete))
        .route("/search", get(search))
        .method_not_allowed_fallback(not_found)
        .with_state(location_state);

    let user_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/facebook", post(facebook))
        .route("/google", post(google))
        .route("/apple", post(apple))
        .route("/forgotpassword", post(forgot_password))
        .method_not_allowed_fallback(not_found)
        .with_state(user_state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/location", location_routes)
        .nest("/api/user", user_routes)
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

/// 依存コンポーネントを初期化し、ルーターを構築する
///
/// データベースに接続できない場合はエラーを返す。
/// 呼び出し側はポートをバインドする前にこの関数を実行する。
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let location_usecase = LocationUseCaseImpl::new(Arc::new(
        RadarLocationProvider::new(&config.location.api_url, &config.location.token)
            .context("位置情報クライアントの初期化に失敗しました")?,
    ));

    let password_service = Arc::new(Argon2PasswordService::new());
    let social_verifiers: Vec<Arc<dyn SocialTokenVerifier>> = vec![
        Arc::new(FacebookTokenVerifier::new(&config.social.facebook_api_url)?),
        Arc::new(GoogleTokenVerifier::new(&config.social.google_api_url)?),
        Arc::new(AppleTokenVerifier::new(
            &config.social.apple_api_url,
            &config.social.apple_client_id,
        )?),
    ];
    let reset_mailer = PasswordResetMailer::new(
        build_notification_sender(&config.notification)?,
        TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?,
        &config.notification.app_url,
    );
    let user_usecase = UserUseCaseImpl::new(
        Arc::new(PostgresUserRepository::new(pool)),
        password_service.clone(),
        password_service,
        Arc::new(JwtTokenIssuer::new(&config.jwt_secret)),
        social_verifiers,
        reset_mailer,
    );

    Ok(build_router(
        Arc::new(location_usecase),
        Arc::new(user_usecase),
    ))
}

/// `NOTIFICATION_BACKEND` に応じて送信実装を選択する
fn build_notification_sender(
    config: &NotificationConfig,
) -> anyhow::Result<Arc<dyn NotificationSender>> {
    match config.backend.as_str() {
        "smtp" => {
            tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "SMTP でメールを送信します"
            );
            let sender = SmtpNotificationSender::new(
                &config.smtp_host,
                config.smtp_port,
                &config.from_address,
            )
            .context("SMTP 送信の初期化に失敗しました")?;
            Ok(Arc::new(sender))
        }
        "noop" => Ok(Arc::new(NoopNotificationSender)),
        other => {
            tracing::warn!(backend = other, "未知の通知バックエンドのため noop を使用します");
            Ok(Arc::new(NoopNotificationSender))
        }
    }
}
