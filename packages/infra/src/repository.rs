//! # リポジトリ
//!
//! 集約の永続化を担当する。現在はユーザーのみ。

pub mod user_repository;

pub use user_repository::{PostgresUserRepository, UserRepository};
