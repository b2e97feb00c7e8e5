//! Sign in with Apple の ID トークン検証
//!
//! ID トークンは Apple の秘密鍵で RS256 署名された JWT。
//! ヘッダーの `kid` に対応する公開鍵を JWKS（`/auth/keys`）から取得して検証する。
//!
//! 氏名は ID トークンに含まれず、初回認可時にクライアントへ直接渡されるため、
//! ここでは常に `None` を返す（リクエストボディの値をユースケース層で補う）。

use async_trait::async_trait;
use apartments_domain::{
    social::{SocialIdentity, SocialProvider},
    user::Email,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, jwk::JwkSet};
use serde::Deserialize;

use super::{SocialTokenVerifier, VerifyError, non_empty};
use crate::{InfraError, http};

/// JWKS を取得するデフォルト URL
pub const DEFAULT_BASE_URL: &str = "https://appleid.apple.com";

/// ID トークンの発行者
pub const APPLE_ISSUER: &str = "https://appleid.apple.com";

#[derive(Debug, Deserialize)]
struct AppleClaims {
    sub:   String,
    email: Option<String>,
}

pub struct AppleTokenVerifier {
    client:    reqwest::Client,
    base_url:  String,
    client_id: String,
}

impl AppleTokenVerifier {
    /// `client_id` は ID トークンの `aud` と照合する（アプリの Bundle ID / Services ID）
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Result<Self, InfraError> {
        Ok(Self {
            client:    http::client()?,
            base_url:  base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
        })
    }

    async fn fetch_keys(&self) -> Result<JwkSet, InfraError> {
        let response = self
            .client
            .get(format!("{}/auth/keys", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfraError::upstream("apple", status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SocialTokenVerifier for AppleTokenVerifier {
    fn provider(&self) -> SocialProvider {
        SocialProvider::Apple
    }

    #[tracing::instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<SocialIdentity, VerifyError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "ID トークンのヘッダーを解析できません");
            VerifyError::InvalidToken
        })?;
        let kid = header.kid.ok_or(VerifyError::InvalidToken)?;

        let keys = self.fetch_keys().await?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            tracing::debug!(%kid, "未知の kid です");
            VerifyError::InvalidToken
        })?;
        let key = DecodingKey::from_jwk(jwk).map_err(InfraError::from)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[APPLE_ISSUER]);
        validation.set_audience(&[&self.client_id]);

        let data = jsonwebtoken::decode::<AppleClaims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "ID トークンの検証に失敗しました");
            VerifyError::InvalidToken
        })?;

        let email = non_empty(data.claims.email)
            .and_then(|e| Email::new(e).ok())
            .ok_or(VerifyError::EmailUnavailable)?;

        Ok(SocialIdentity {
            provider: SocialProvider::Apple,
            subject: data.claims.sub,
            email,
            first_name: None,
            last_name: None,
        })
    }
}
