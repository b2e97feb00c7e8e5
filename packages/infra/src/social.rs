//! # ソーシャルログイン
//!
//! クライアントから受け取ったプロバイダーのトークンを検証し、
//! 本人情報（[`SocialIdentity`]）を取得する。
//!
//! | プロバイダー | トークン | 検証方法 |
//! |------------|---------|---------|
//! | Facebook | アクセストークン | Graph API `/me` を呼び出す |
//! | Google | アクセストークン | `oauth2/v3/userinfo` を呼び出す |
//! | Apple | ID トークン（JWT） | Apple の公開鍵（JWKS）で RS256 署名を検証 |

mod apple;
mod facebook;
mod google;

use async_trait::async_trait;
use apartments_domain::social::{SocialIdentity, SocialProvider};
use thiserror::Error;

pub use apple::{APPLE_ISSUER, AppleTokenVerifier, DEFAULT_BASE_URL as APPLE_DEFAULT_BASE_URL};
pub use facebook::{DEFAULT_BASE_URL as FACEBOOK_DEFAULT_BASE_URL, FacebookTokenVerifier};
pub use google::{DEFAULT_BASE_URL as GOOGLE_DEFAULT_BASE_URL, GoogleTokenVerifier};

use crate::InfraError;

/// トークン検証エラー
#[derive(Debug, Error)]
pub enum VerifyError {
    /// トークンが無効（期限切れ・改ざん・取り消し済み）
    #[error("トークンが無効です")]
    InvalidToken,

    /// プロバイダーがメールアドレスを提供しなかった
    #[error("メールアドレスを取得できません")]
    EmailUnavailable,

    /// プロバイダーとの通信に失敗
    #[error(transparent)]
    Upstream(#[from] InfraError),
}

/// ソーシャルトークン検証トレイト
#[async_trait]
pub trait SocialTokenVerifier: Send + Sync {
    /// 検証対象のプロバイダー
    fn provider(&self) -> SocialProvider;

    /// トークンを検証し、本人情報を返す
    async fn verify(&self, token: &str) -> Result<SocialIdentity, VerifyError>;
}

/// 空文字列を `None` として扱う
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
