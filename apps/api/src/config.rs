//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | **Yes** | - | JWT 署名用シークレット |
//! | `LOCATION_TOKEN` | **Yes** | - | Radar API キー |
//! | `LOCATION_API_URL` | No | `https://api.radar.io` | Radar API のベース URL |
//! | `FACEBOOK_API_URL` | No | `https://graph.facebook.com` | Graph API のベース URL |
//! | `GOOGLE_API_URL` | No | `https://www.googleapis.com` | Google API のベース URL |
//! | `APPLE_API_URL` | No | `https://appleid.apple.com` | Apple JWKS のベース URL |
//! | `APPLE_CLIENT_ID` | No | 空文字列 | Apple ID トークンの `aud`（未設定なら警告し、Apple ログインはすべて失敗する） |
//! | `NOTIFICATION_BACKEND` | No | `noop` | `smtp` / `noop` |
//! | `SMTP_HOST` | No | `localhost` | SMTP ホスト |
//! | `SMTP_PORT` | No | `1025` | SMTP ポート（数値でなければ警告してデフォルトを使う） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | `noreply@apartments.example.com` | 送信元アドレス |
//! | `APP_URL` | No | `http://localhost:19006` | メール内リンクのベース URL |
//!
//! ポート番号は設定できない（[`LISTEN_PORT`] 固定）。

use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

use apartments_infra::social::{
    APPLE_DEFAULT_BASE_URL,
    FACEBOOK_DEFAULT_BASE_URL,
    GOOGLE_DEFAULT_BASE_URL,
};

/// 待ち受けポート
pub const LISTEN_PORT: u16 = 4000;

const DEFAULT_LOCATION_API_URL: &str = "https://api.radar.io";
const DEFAULT_SMTP_PORT: u16 = 1025;

/// 位置情報 API の設定
#[derive(Debug, Clone)]
pub struct LocationConfig {
    pub api_url: String,
    pub token:   String,
}

/// ソーシャルログインの設定
#[derive(Debug, Clone)]
pub struct SocialConfig {
    pub facebook_api_url: String,
    pub google_api_url:   String,
    pub apple_api_url:    String,
    /// Apple ID トークンの `aud` と照合する値
    pub apple_client_id:  String,
}

impl SocialConfig {
    /// Apple ID トークンを検証できる設定か
    pub fn is_apple_configured(&self) -> bool {
        !self.apple_client_id.trim().is_empty()
    }
}

/// 通知設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: SMTP サーバー経由で送信
/// - `noop`: 送信せずログ出力のみ
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:      String,
    pub smtp_host:    String,
    pub smtp_port:    u16,
    pub from_address: String,
    /// フロントエンド URL（メール内リンク用）
    pub app_url:      String,
}

/// API サーバーの設定
///
/// 起動時に一度だけ構築し、各コンポーネントに渡す。
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:         String,
    /// データベース接続 URL
    pub database_url: String,
    /// JWT 署名用シークレット
    pub jwt_secret:   String,
    pub location:     LocationConfig,
    pub social:       SocialConfig,
    pub notification: NotificationConfig,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 必須の環境変数が設定されていない場合はエラーを返す。
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// 任意の取得関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|_| default.to_string());

        let config = Self {
            host:         or_default("API_HOST", "0.0.0.0"),
            database_url: lookup("DATABASE_URL")?,
            jwt_secret:   lookup("JWT_SECRET")?,
            location:     LocationConfig {
                api_url: or_default("LOCATION_API_URL", DEFAULT_LOCATION_API_URL),
                token:   lookup("LOCATION_TOKEN")?,
            },
            social:       SocialConfig {
                facebook_api_url: or_default("FACEBOOK_API_URL", FACEBOOK_DEFAULT_BASE_URL),
                google_api_url:   or_default("GOOGLE_API_URL", GOOGLE_DEFAULT_BASE_URL),
                apple_api_url:    or_default("APPLE_API_URL", APPLE_DEFAULT_BASE_URL),
                apple_client_id:  or_default("APPLE_CLIENT_ID", ""),
            },
            notification: NotificationConfig {
                backend:      or_default("NOTIFICATION_BACKEND", "noop"),
                smtp_host:    or_default("SMTP_HOST", "localhost"),
                smtp_port:    parse_smtp_port(lookup("SMTP_PORT").ok()),
                from_address: or_default(
                    "NOTIFICATION_FROM_ADDRESS",
                    "noreply@apartments.example.com",
                ),
                app_url:      or_default("APP_URL", "http://localhost:19006"),
            },
        };

        if !config.social.is_apple_configured() {
            tracing::warn!("APPLE_CLIENT_ID が未設定のため Apple ログインはすべて失敗します");
        }

        Ok(config)
    }

    /// バインドするソケットアドレス（ポートは常に [`LISTEN_PORT`]）
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, LISTEN_PORT).parse()
    }
}

/// `SMTP_PORT` を解釈する
///
/// 未設定ならデフォルト。数値として読めない値は警告してデフォルトに戻す。
fn parse_smtp_port(raw: Option<String>) -> u16 {
    let Some(raw) = raw else {
        return DEFAULT_SMTP_PORT;
    };
    match raw.trim().parse() {
        Ok(port) => port,
        Err(e) => {
            tracing::warn!(
                value = %raw,
                error = %e,
                "SMTP_PORT が不正なため {} を使用します",
                DEFAULT_SMTP_PORT
            );
            DEFAULT_SMTP_PORT
        }
    }
}
