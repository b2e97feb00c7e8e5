//! # Apartments ドメイン層
//!
//! ユーザーアカウントと位置情報のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部 API）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ユーザーエンティティと値オブジェクト
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`social`] - ソーシャルログインで検証済みの外部 ID
//! - [`location`] - 位置情報検索のクエリと結果
//! - [`notification`] - メール通知

pub mod error;
pub mod location;
pub mod notification;
pub mod password;
pub mod social;
pub mod user;

pub use error::DomainError;
