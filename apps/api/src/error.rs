//! # API エラーハンドリング
//!
//! API のエラー定義と、RFC 9457 Problem Details 形式のレスポンスへの変換を行う。
//!
//! ## エラーの階層
//!
//! ```text
//! DomainError / InfraError / VerifyError
//!        ↓ From
//! ApiError
//!        ↓ IntoResponse
//! HTTP レスポンス (StatusCode + ErrorResponse)
//! ```
//!
//! 内部エラーの詳細はログにのみ出力し、レスポンスには含めない。

use apartments_domain::DomainError;
use apartments_infra::{InfraError, InfraErrorKind, social::VerifyError};
use apartments_shared::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証失敗（400）
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 処理できないリクエスト（400）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 認証失敗（401）
    ///
    /// 理由（ユーザー不在 / パスワード不一致など）を区別しない。
    #[error("認証に失敗しました")]
    AuthenticationFailed,

    /// 外部トークンが無効（401）
    #[error("トークンが無効です")]
    InvalidToken,

    /// ルートが存在しない（404）
    #[error("リソースが見つかりません")]
    NotFound,

    /// 一意制約違反（409）
    #[error("競合: {0}")]
    Conflict(String),

    /// 外部サービスの障害（502）
    #[error("外部サービスエラー: {0}")]
    BadGateway(#[source] InfraError),

    /// 内部エラー（500）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let DomainError::Validation(msg) = e;
        ApiError::Validation(msg)
    }
}

impl From<InfraError> for ApiError {
    fn from(e: InfraError) -> Self {
        match e.kind() {
            InfraErrorKind::Conflict { .. } => {
                ApiError::Conflict("このメールアドレスは既に登録されています".to_string())
            }
            InfraErrorKind::Http(_) | InfraErrorKind::Upstream { .. } => ApiError::BadGateway(e),
            _ => {
                tracing::error!(error = %e, span_trace = %e.span_trace(), "インフラエラー");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidToken => ApiError::InvalidToken,
            VerifyError::EmailUnavailable => ApiError::BadRequest(
                "プロバイダーからメールアドレスを取得できませんでした".to_string(),
            ),
            VerifyError::Upstream(e) => ApiError::BadGateway(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Validation(msg) => ErrorResponse::validation_error(msg),
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg),
            ApiError::AuthenticationFailed => {
                ErrorResponse::unauthorized("メールアドレスまたはパスワードが正しくありません")
            }
            ApiError::InvalidToken => ErrorResponse::unauthorized("トークンが無効です"),
            ApiError::NotFound => ErrorResponse::not_found("リソースが見つかりません"),
            ApiError::Conflict(msg) => ErrorResponse::conflict(msg),
            ApiError::BadGateway(e) => {
                tracing::error!(error = %e, "外部サービスエラー");
                ErrorResponse::bad_gateway("外部サービスとの通信に失敗しました")
            }
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
