//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs   # GET /health
//!     ├── location.rs # /api/location/*
//!     └── user.rs     # /api/user/*
//! ```
//!
//! ハンドラはリクエストの検証と変換のみ行い、ロジックはユースケースに委譲する。

pub mod health;
pub mod location;
pub mod user;

pub use health::health_check;
pub use location::{LocationState, autocomplete, search};
pub use user::{UserState, apple, facebook, forgot_password, google, login, register};

use crate::error::ApiError;

/// 未定義のルート・メソッドに対するフォールバック
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
