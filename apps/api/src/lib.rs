//! # Apartments API サーバー
//!
//! 物件検索アプリ向けのバックエンド API。
//! 住所の検索（位置情報 API のプロキシ）とユーザー認証を提供する。
//!
//! ## レイヤー構成
//!
//! ```text
//! handler     リクエストの検証・レスポンス変換
//!    ↓
//! usecase     認証フロー・検索の組み立て
//!    ↓
//! infra       PostgreSQL / Radar / SNS プロバイダー / SMTP
//! ```
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - 依存コンポーネントの初期化とルーター構築
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`usecase`] - ユースケース
//! - [`validation`] - 検証付きエクストラクタ

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
pub mod validation;
