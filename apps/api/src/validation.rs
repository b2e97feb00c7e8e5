//! # リクエストバリデーション
//!
//! `validator` の derive ルールを axum のエクストラクタに組み込む。
//! ハンドラは検証済みの値だけを受け取り、失敗時は 400 を返す。
//!
//! ```rust,ignore
//! #[derive(Deserialize, Validate)]
//! struct LoginRequest {
//!     #[validate(email)]
//!     email: String,
//! }
//!
//! async fn login(ValidatedJson(req): ValidatedJson<LoginRequest>) { /* ... */ }
//! ```

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON ボディを検証付きで取り出すエクストラクタ
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// クエリ文字列を検証付きで取り出すエクストラクタ
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate().map_err(into_api_error)?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate().map_err(into_api_error)?;
        Ok(Self(value))
    }
}

/// フィールドごとのエラーを `field: message` 形式で連結する
fn into_api_error(errors: ValidationErrors) -> ApiError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    messages.sort();
    ApiError::Validation(messages.join(", "))
}
