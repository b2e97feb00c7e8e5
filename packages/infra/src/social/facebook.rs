//! Facebook Graph API によるアクセストークン検証

use async_trait::async_trait;
use apartments_domain::{
    social::{SocialIdentity, SocialProvider},
    user::Email,
};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{SocialTokenVerifier, VerifyError, non_empty};
use crate::{InfraError, http};

/// Graph API のデフォルト URL
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

#[derive(Debug, Deserialize)]
struct MeResponse {
    id:         String,
    first_name: Option<String>,
    last_name:  Option<String>,
    email:      Option<String>,
}

pub struct FacebookTokenVerifier {
    client:   reqwest::Client,
    base_url: String,
}

impl FacebookTokenVerifier {
    pub fn new(base_url: impl Into<String>) -> Result<Self, InfraError> {
        Ok(Self {
            client:   http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SocialTokenVerifier for FacebookTokenVerifier {
    fn provider(&self) -> SocialProvider {
        SocialProvider::Facebook
    }

    #[tracing::instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<SocialIdentity, VerifyError> {
        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .query(&[
                ("fields", "id,first_name,last_name,email"),
                ("access_token", token),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(VerifyError::InvalidToken);
            }
            s => return Err(InfraError::upstream("facebook", s.as_u16()).into()),
        }

        let me: MeResponse = response.json().await.map_err(InfraError::from)?;
        let email = non_empty(me.email)
            .and_then(|e| Email::new(e).ok())
            .ok_or(VerifyError::EmailUnavailable)?;

        Ok(SocialIdentity {
            provider: SocialProvider::Facebook,
            subject: me.id,
            email,
            first_name: non_empty(me.first_name),
            last_name: non_empty(me.last_name),
        })
    }
}
