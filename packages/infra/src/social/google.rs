//! Google userinfo エンドポイントによるアクセストークン検証

use async_trait::async_trait;
use apartments_domain::{
    social::{SocialIdentity, SocialProvider},
    user::Email,
};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{SocialTokenVerifier, VerifyError, non_empty};
use crate::{InfraError, http};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub:            String,
    given_name:     Option<String>,
    family_name:    Option<String>,
    email:          Option<String>,
    /// 欠落時は未検証として扱う
    #[serde(default)]
    email_verified: bool,
}

pub struct GoogleTokenVerifier {
    client:   reqwest::Client,
    base_url: String,
}

impl GoogleTokenVerifier {
    pub fn new(base_url: impl Into<String>) -> Result<Self, InfraError> {
        Ok(Self {
            client:   http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SocialTokenVerifier for GoogleTokenVerifier {
    fn provider(&self) -> SocialProvider {
        SocialProvider::Google
    }

    #[tracing::instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<SocialIdentity, VerifyError> {
        let response = self
            .client
            .get(format!("{}/oauth2/v3/userinfo", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(InfraError::from)?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(VerifyError::InvalidToken);
            }
            s => return Err(InfraError::upstream("google", s.as_u16()).into()),
        }

        let info: UserInfo = response.json().await.map_err(InfraError::from)?;
        // 未検証のメールアドレスでは既存アカウントに紐付けない
        if !info.email_verified {
            return Err(VerifyError::EmailUnavailable);
        }
        let email = non_empty(info.email)
            .and_then(|e| Email::new(e).ok())
            .ok_or(VerifyError::EmailUnavailable)?;

        Ok(SocialIdentity {
            provider: SocialProvider::Google,
            subject: info.sub,
            email,
            first_name: non_empty(info.given_name),
            last_name: non_empty(info.family_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_有効なトークンで本人情報を取得できる() {
        // Given
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/oauth2/v3/userinfo")
            .match_header("authorization", "Bearer g-token")
            .with_status(200)
            .with_body(
                r#"{"sub":"1098","given_name":"Jane","family_name":"Doe","email":"jane@gmail.com","email_verified":true}"#,
            )
            .create_async()
            .await;
        let sut = GoogleTokenVerifier::new(server.url()).unwrap();

        // When
        let identity = sut.verify("g-token").await.unwrap();

        // Then
        mock.assert_async().await;
        assert_eq!(identity.provider, SocialProvider::Google);
        assert_eq!(identity.subject, "1098");
        assert_eq!(identity.email.as_str(), "jane@gmail.com");
        assert_eq!(identity.last_name.as_deref(), Some("Doe"));
    }

    #[tokio::test]
    async fn test_無効なトークンはinvalid_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(401)
            .with_body(r#"{"error":"invalid_request"}"#)
            .create_async()
            .await;
        let sut = GoogleTokenVerifier::new(server.url()).unwrap();

        let result = sut.verify("expired").await;

        assert!(matches!(result, Err(VerifyError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_未検証のメールアドレスはemail_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(200)
            .with_body(r#"{"sub":"1098","email":"jane@gmail.com","email_verified":false}"#)
            .create_async()
            .await;
        let sut = GoogleTokenVerifier::new(server.url()).unwrap();

        let result = sut.verify("g-token").await;

        assert!(matches!(result, Err(VerifyError::EmailUnavailable)));
    }

    #[tokio::test]
    async fn test_email_verifiedが欠落していればemail_unavailable() {
        // Given
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(200)
            .with_body(r#"{"sub":"1098","email":"victim@example.com"}"#)
            .create_async()
            .await;
        let sut = GoogleTokenVerifier::new(server.url()).unwrap();

        // When
        let result = sut.verify("g-token").await;

        // Then
        assert!(matches!(result, Err(VerifyError::EmailUnavailable)));
    }
}
