//! # JWT トークン
//!
//! 認証成功時に返すアクセストークン・リフレッシュトークンと、
//! パスワード再設定メールに埋め込むリセットトークンを発行する。
//!
//! 署名は HS256（共有シークレット）。クレームは `{ sub, iat, exp, kind }` で、
//! `kind` によって用途の取り違え（リセットトークンでの API アクセス等）を防ぐ。
//! 検証用の [`JwtTokenIssuer::decode`] は `test-utils` feature でのみ公開する。

use chrono::{DateTime, Duration, Utc};
use apartments_domain::user::UserId;
#[cfg(any(test, feature = "test-utils"))]
use jsonwebtoken::{DecodingKey, Validation};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::InfraError;

/// トークンの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    PasswordReset,
}

impl TokenKind {
    /// 有効期間
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Access => Duration::hours(1),
            Self::Refresh => Duration::days(30),
            Self::PasswordReset => Duration::minutes(10),
        }
    }
}

/// JWT クレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザー ID
    pub sub:  String,
    pub iat:  i64,
    pub exp:  i64,
    pub kind: TokenKind,
}

/// 認証成功時に返すトークンの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token:  String,
    pub refresh_token: String,
}

/// トークンの発行を担当するトレイト
pub trait TokenIssuer: Send + Sync {
    /// アクセストークンとリフレッシュトークンを発行する
    fn issue_pair(&self, user_id: &UserId) -> Result<TokenPair, InfraError>;

    /// パスワード再設定用トークンを発行する
    fn issue_password_reset(&self, user_id: &UserId) -> Result<String, InfraError>;
}

/// HS256 による JWT 実装
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    #[cfg(any(test, feature = "test-utils"))]
    decoding_key: DecodingKey,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            #[cfg(any(test, feature = "test-utils"))]
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    fn issue_at(
        &self,
        user_id: &UserId,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, InfraError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + kind.ttl()).timestamp(),
            kind,
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_pair(&self, user_id: &UserId) -> Result<TokenPair, InfraError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token:  self.issue_at(user_id, TokenKind::Access, now)?,
            refresh_token: self.issue_at(user_id, TokenKind::Refresh, now)?,
        })
    }

    fn issue_password_reset(&self, user_id: &UserId) -> Result<String, InfraError> {
        self.issue_at(user_id, TokenKind::PasswordReset, Utc::now())
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl JwtTokenIssuer {
    /// トークンを検証し、期待する用途であればクレームを返す
    ///
    /// 署名不正・期限切れ・用途違いはいずれもエラー。
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, InfraError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)?;

        if data.claims.kind != expected {
            return Err(InfraError::unexpected(format!(
                "トークンの用途が一致しません: {:?}",
                data.claims.kind
            )));
        }

        Ok(data.claims)
    }
}
