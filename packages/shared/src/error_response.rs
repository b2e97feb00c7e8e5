//! # エラーレスポンス
//!
//! 全エンドポイント共通のエラー本文。RFC 9457 Problem Details の
//! `type` / `title` / `status` / `detail` の 4 フィールドだけを使う。
//!
//! ```json
//! {
//!   "type": "https://apartments.example.com/errors/conflict",
//!   "title": "Conflict",
//!   "status": 409,
//!   "detail": "このメールアドレスは既に登録されています"
//! }
//! ```
//!
//! HTTP レスポンスへの変換（`IntoResponse`）は API クレートで行う。

use serde::{Deserialize, Serialize};

const ERROR_TYPE_BASE: &str = "https://apartments.example.com/errors";

/// エラーの分類
///
/// `type` URI の末尾・`title`・`status` の組を一箇所で決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    BadRequest,
    Validation,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
    BadGateway,
}

impl ProblemKind {
    fn slug(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Validation => "validation-error",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not-found",
            Self::Conflict => "conflict",
            Self::Internal => "internal-error",
            Self::BadGateway => "bad-gateway",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Validation => "Validation Error",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::Internal => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest | Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
            Self::BadGateway => 502,
        }
    }
}

/// Problem Details 形式のエラー本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    pub fn of(kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{}", kind.slug()),
            title:      kind.title().to_string(),
            status:     kind.status(),
            detail:     detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::BadRequest, detail)
    }

    pub fn validation_error(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Validation, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Unauthorized, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::NotFound, detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Conflict, detail)
    }

    /// 500 Internal Server Error（detail は固定文言）
    pub fn internal_error() -> Self {
        Self::of(ProblemKind::Internal, "内部エラーが発生しました")
    }

    /// 502 Bad Gateway（位置情報 API・SNS プロバイダーの障害）
    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::BadGateway, detail)
    }
}
