//! # Apartments Infrastructure Layer
//!
//! 外部システムとの接続を担当するインフラストラクチャ層。
//!
//! ## モジュール構成
//!
//! - [`db`]: PostgreSQL 接続プールとマイグレーション
//! - [`repository`]: ユーザーの永続化
//! - [`password`]: Argon2id によるパスワードハッシュ化・検証
//! - [`token`]: JWT の発行・検証
//! - [`geocoding`]: 住所候補検索（Radar API）
//! - [`http`]: 外部 API 用 HTTP クライアント（タイムアウト付き）
//! - [`social`]: Facebook / Google / Apple のトークン検証
//! - [`notification`]: メール送信（SMTP / Noop）
//!
//! 各外部システムはトレイトで抽象化し、アプリケーション層には
//! `Arc<dyn Trait>` として注入する。

pub mod db;
pub mod error;
pub mod geocoding;
pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod password;
pub mod repository;
pub mod social;
pub mod token;

pub use error::{InfraError, InfraErrorKind};
