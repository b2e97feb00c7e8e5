//! # ユースケース層
//!
//! API のビジネスロジックを実装する。
//!
//! - **トレイトベースの設計**: ハンドラのテストではスタブに差し替える
//! - **依存性注入**: リポジトリ・外部サービスクライアントは `Arc<dyn Trait>` で受け取る
//! - **薄いハンドラ**: ハンドラはリクエストの変換のみ行い、ロジックはここに集約

pub mod location;
pub mod template_renderer;
pub mod user;

use apartments_domain::{location::Address, social::SocialProvider, user::User};
use apartments_infra::token::TokenPair;
use async_trait::async_trait;
pub use location::LocationUseCaseImpl;
pub use template_renderer::TemplateRenderer;
pub use user::{PasswordResetMailer, UserUseCaseImpl};

use crate::error::ApiError;

/// 位置情報ユースケース
#[async_trait]
pub trait LocationUseCase: Send + Sync {
    /// 入力途中の文字列から住所候補を返す
    async fn autocomplete(&self, text: &str, limit: Option<u8>) -> Result<Vec<Address>, ApiError>;

    /// 住所・地名を検索する
    async fn search(&self, text: &str) -> Result<Vec<Address>, ApiError>;
}

/// 新規登録の入力
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name:  String,
    pub email:      String,
    pub password:   String,
}

/// ソーシャルログインの入力
#[derive(Debug, Clone)]
pub struct SocialLoginInput {
    pub provider:   SocialProvider,
    pub token:      String,
    /// クライアントが別途受け取った氏名（Apple の初回認可時のみ）
    pub first_name: Option<String>,
    pub last_name:  Option<String>,
}

/// 認証成功時の結果
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub user:    User,
    pub tokens:  TokenPair,
    /// このリクエストでアカウントを作成したか
    pub created: bool,
}

/// ユーザー認証ユースケース
#[async_trait]
pub trait UserUseCase: Send + Sync {
    /// メール + パスワードでアカウントを作成する
    async fn register(&self, input: RegisterInput) -> Result<AuthOutput, ApiError>;

    /// メール + パスワードでログインする
    ///
    /// 失敗理由にかかわらず [`ApiError::AuthenticationFailed`] を返す。
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutput, ApiError>;

    /// 外部プロバイダーのトークンでログインする（未登録なら作成する）
    async fn social_login(&self, input: SocialLoginInput) -> Result<AuthOutput, ApiError>;

    /// パスワード再設定メールを送信する
    ///
    /// アカウントの有無を呼び出し元に明かさないため、
    /// メール送信の失敗も含めて常に `Ok(())` を返す。
    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;
}
