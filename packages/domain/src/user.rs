//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`User`] | ユーザー | 物件検索アプリのアカウント |
//! | [`Email`] | メールアドレス | ログイン ID（全アカウントで一意） |
//! | [`PersonName`] | 氏名（姓 / 名） | 表示用 |
//!
//! ## アカウント種別
//!
//! - **パスワードアカウント**: `/register` で作成。`password_hash` を持つ
//! - **ソーシャルアカウント**: Facebook / Google / Apple で初回ログイン時に作成。
//!   `password_hash` を持たず、メール + パスワードではログインできない
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use apartments_domain::{
//!     password::PasswordHash,
//!     user::{Email, PersonName, User, UserId},
//! };
//!
//! let user = User::new_with_password(
//!     UserId::new(),
//!     PersonName::new("Jane")?,
//!     PersonName::new("Doe")?,
//!     Email::new("Jane@Example.com")?,
//!     PasswordHash::new("$argon2id$v=19$..."),
//!     chrono::Utc::now(),
//! );
//!
//! assert_eq!(user.email().as_str(), "jane@example.com");
//! assert!(user.can_login_with_password());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, password::PasswordHash, social::SocialProvider};

/// 氏名の最大文字数
const PERSON_NAME_MAX_CHARS: usize = 50;

/// メールアドレスの最大文字数
const EMAIL_MAX_CHARS: usize = 255;

/// ユーザー ID（一意識別子）
///
/// UUID v7 を使用し、生成順にソート可能。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct UserId(Uuid);

impl UserId {
    /// 新しいユーザー ID を生成する
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// 既存の UUID からユーザー ID を作成する
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 内部の UUID 参照を取得する
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時に前後の空白を除去し、小文字に正規化する。
/// 大文字小文字違いで同一人物の重複アカウントが作られることを防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.chars().count() > EMAIL_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{EMAIL_MAX_CHARS}文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `@` より前の部分を返す
    ///
    /// 氏名を提供しない ID プロバイダー（Apple の 2 回目以降のログインなど）で
    /// 表示名の代替として使用する。
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 氏名（姓または名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct PersonName(String);

impl PersonName {
    /// 氏名を作成する
    ///
    /// 前後の空白を除去した上で 1〜50 文字であることを検証する。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("氏名は必須です".to_string()));
        }

        if value.chars().count() > PERSON_NAME_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "氏名は{PERSON_NAME_MAX_CHARS}文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `email` は全アカウントで一意
/// - `password_hash` が `None` のアカウントはパスワードログイン不可
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:              UserId,
    first_name:      PersonName,
    last_name:       PersonName,
    email:           Email,
    password_hash:   Option<PasswordHash>,
    social_provider: Option<SocialProvider>,
    created_at:      DateTime<Utc>,
    updated_at:      DateTime<Utc>,
}

impl User {
    /// パスワードアカウントを作成する（`/register`）
    pub fn new_with_password(
        id: UserId,
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash: Some(password_hash),
            social_provider: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ソーシャルアカウントを作成する（初回のソーシャルログイン）
    pub fn new_social(
        id: UserId,
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        provider: SocialProvider,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash: None,
            social_provider: Some(provider),
            created_at: now,
            updated_at: now,
        }
    }

    /// データベースから復元する
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: UserId,
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        password_hash: Option<PasswordHash>,
        social_provider: Option<SocialProvider>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            social_provider,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    pub fn social_provider(&self) -> Option<SocialProvider> {
        self.social_provider
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// メール + パスワードでログインできるか
    pub fn can_login_with_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user@example.com", "user@example.com")]
    #[case("  User@Example.COM ", "user@example.com")]
    fn test_メールアドレスは正規化される(#[case] input: &str, #[case] expected: &str) {
        let email = Email::new(input).unwrap();
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-at-mark")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("a@b@c")]
    fn test_不正なメールアドレスはエラー(#[case] input: &str) {
        assert!(matches!(Email::new(input), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_長すぎるメールアドレスはエラー() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(long).is_err());
    }

    #[test]
    fn test_local_partはアットマークより前を返す() {
        let email = Email::new("jane.doe@example.com").unwrap();
        assert_eq!(email.local_part(), "jane.doe");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_空の氏名はエラー(#[case] input: &str) {
        assert!(PersonName::new(input).is_err());
    }

    #[test]
    fn test_氏名は50文字まで許可される() {
        assert!(PersonName::new("あ".repeat(50)).is_ok());
        assert!(PersonName::new("あ".repeat(51)).is_err());
    }

    #[test]
    fn test_パスワードアカウントはパスワードログインできる() {
        let user = User::new_with_password(
            UserId::new(),
            PersonName::new("Jane").unwrap(),
            PersonName::new("Doe").unwrap(),
            Email::new("jane@example.com").unwrap(),
            PasswordHash::new("hash"),
            Utc::now(),
        );

        assert!(user.can_login_with_password());
        assert_eq!(user.social_provider(), None);
    }

    #[test]
    fn test_ソーシャルアカウントはパスワードログインできない() {
        let user = User::new_social(
            UserId::new(),
            PersonName::new("Jane").unwrap(),
            PersonName::new("Doe").unwrap(),
            Email::new("jane@example.com").unwrap(),
            SocialProvider::Google,
            Utc::now(),
        );

        assert!(!user.can_login_with_password());
        assert_eq!(user.social_provider(), Some(SocialProvider::Google));
        assert_eq!(user.created_at(), user.updated_at());
    }
}
