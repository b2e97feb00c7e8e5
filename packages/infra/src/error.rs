//! # インフラ層エラー
//!
//! PostgreSQL・外部 HTTP API・JWT の失敗を [`InfraError`] にまとめる。
//! 種別は [`InfraErrorKind`] で判定し、生成時点のスパン経路を [`SpanTrace`] に残す。
//!
//! API 層での扱い:
//!
//! | 種別 | HTTP |
//! |------|------|
//! | `Conflict` | 409 |
//! | `Http` / `Upstream` | 502 |
//! | その他 | 500（詳細はログのみ） |

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, Error)]
pub enum InfraErrorKind {
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 接続失敗・タイムアウト・レスポンス本文の不整合
    #[error("HTTP 通信エラー: {0}")]
    Http(#[source] reqwest::Error),

    /// 外部 API が成功以外のステータスを返した
    #[error("外部サービスエラー: {service} が {status} を返しました")]
    Upstream { service: &'static str, status: u16 },

    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("トークンエラー: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    /// 一意制約違反（`key` は重複した値）
    #[error("{entity} は既に存在します: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, InfraErrorKind::Conflict { .. })
    }

    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        InfraErrorKind::Conflict {
            entity,
            key: key.into(),
        }
        .into()
    }

    pub fn upstream(service: &'static str, status: u16) -> Self {
        InfraErrorKind::Upstream { service, status }.into()
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        InfraErrorKind::Unexpected(msg.into()).into()
    }
}

impl From<InfraErrorKind> for InfraError {
    fn from(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

macro_rules! impl_from_source {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for InfraError {
                fn from(source: $source) -> Self {
                    InfraErrorKind::$variant(source).into()
                }
            }
        )*
    };
}

impl_from_source! {
    sqlx::Error => Database,
    reqwest::Error => Http,
    serde_json::Error => Serialization,
    jsonwebtoken::errors::Error => Token,
}
