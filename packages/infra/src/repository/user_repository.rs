//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **メールアドレスで検索**: ログイン・ソーシャルログイン・パスワード再設定の起点
//! - **一意制約は DB に任せる**: 同時登録の競合は `users_email_key` 違反として
//!   [`InfraError::conflict`] に変換する

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use apartments_domain::{
    password::PasswordHash,
    social::SocialProvider,
    user::{Email, PersonName, User, UserId},
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// メールアドレスでユーザーを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

    /// ユーザーを登録する
    ///
    /// メールアドレスが既に使われている場合は Conflict エラーを返す。
    async fn insert(&self, user: &User) -> Result<(), InfraError>;
}

/// `users` テーブルの行
#[derive(Debug, FromRow)]
struct UserRow {
    id:              Uuid,
    first_name:      String,
    last_name:       String,
    email:           String,
    password_hash:   Option<String>,
    social_provider: Option<String>,
    created_at:      DateTime<Utc>,
    updated_at:      DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let social_provider = row
            .social_provider
            .map(|p| p.parse::<SocialProvider>())
            .transpose()
            .map_err(|e| InfraError::unexpected(format!("不正な social_provider: {e}")))?;

        Ok(User::from_db(
            UserId::from_uuid(row.id),
            PersonName::new(row.first_name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            PersonName::new(row.last_name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Email::new(row.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            row.password_hash.map(PasswordHash::new),
            social_provider,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                password_hash,
                social_provider,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %user.id()))]
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id,
                first_name,
                last_name,
                email,
                password_hash,
                social_provider,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.first_name().as_str())
        .bind(user.last_name().as_str())
        .bind(user.email().as_str())
        .bind(user.password_hash().map(PasswordHash::as_str))
        .bind(user.social_provider().map(|p| p.as_str()))
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(InfraError::conflict("User", user.email().as_str()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(social_provider: Option<&str>, password_hash: Option<&str>) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::now_v7(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: password_hash.map(str::to_string),
            social_provider: social_provider.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_パスワードアカウントの行を復元できる() {
        let user = User::try_from(row(None, Some("$argon2id$..."))).unwrap();

        assert_eq!(user.email().as_str(), "jane@example.com");
        assert!(user.can_login_with_password());
        assert_eq!(user.social_provider(), None);
    }

    #[test]
    fn test_ソーシャルアカウントの行を復元できる() {
        let user = User::try_from(row(Some("apple"), None)).unwrap();

        assert!(!user.can_login_with_password());
        assert_eq!(user.social_provider(), Some(SocialProvider::Apple));
    }

    #[test]
    fn test_未知のプロバイダーはエラー() {
        assert!(User::try_from(row(Some("myspace"), None)).is_err());
    }

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresUserRepository>();
    }
}
