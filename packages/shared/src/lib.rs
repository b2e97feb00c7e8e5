//! # Apartments 共有型
//!
//! レスポンス本文の型（エラー・ヘルスチェック）とトレーシング初期化。
//! axum には依存せず、HTTP への変換は API クレートで行う。

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{ErrorResponse, ProblemKind};
pub use health::HealthResponse;
