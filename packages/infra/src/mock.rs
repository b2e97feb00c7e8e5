//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! apartments-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use apartments_domain::{
    location::{Address, LocationQuery},
    notification::{EmailMessage, NotificationError},
    social::{SocialIdentity, SocialProvider},
    user::{Email, User},
};

use crate::{
    error::InfraError,
    geocoding::LocationProvider,
    notification::NotificationSender,
    repository::UserRepository,
    social::{SocialTokenVerifier, VerifyError},
};

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(InfraError::conflict("User", user.email().as_str()));
        }
        users.push(user.clone());
        Ok(())
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    fail_send: bool,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信に失敗するモック
    pub fn failing() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self.fail_send {
            return Err(NotificationError::SendFailed("mock failure".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== MockLocationProvider =====

/// 固定の住所候補を返すモック
#[derive(Clone, Default)]
pub struct MockLocationProvider {
    addresses: Vec<Address>,
    fail:      bool,
    queries:   Arc<Mutex<Vec<LocationQuery>>>,
}

impl MockLocationProvider {
    pub fn with_addresses(addresses: Vec<Address>) -> Self {
        Self {
            addresses,
            ..Self::default()
        }
    }

    /// 常に上流エラーを返すモック
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<LocationQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn respond(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(InfraError::upstream("radar", 503));
        }
        Ok(self
            .addresses
            .iter()
            .take(usize::from(query.limit()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LocationProvider for MockLocationProvider {
    async fn autocomplete(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError> {
        self.respond(query)
    }

    async fn search(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError> {
        self.respond(query)
    }
}

// ===== MockSocialTokenVerifier =====

/// 特定のトークンだけを有効とみなすモック
#[derive(Clone)]
pub struct MockSocialTokenVerifier {
    provider:    SocialProvider,
    valid_token: String,
    identity:    Option<SocialIdentity>,
}

impl MockSocialTokenVerifier {
    /// `valid_token` を受け取ったときに `identity` を返す
    pub fn new(provider: SocialProvider, valid_token: &str, identity: SocialIdentity) -> Self {
        Self {
            provider,
            valid_token: valid_token.to_string(),
            identity: Some(identity),
        }
    }

    /// 有効なトークンでもメールアドレスを返さないモック
    pub fn without_email(provider: SocialProvider, valid_token: &str) -> Self {
        Self {
            provider,
            valid_token: valid_token.to_string(),
            identity: None,
        }
    }
}

#[async_trait]
impl SocialTokenVerifier for MockSocialTokenVerifier {
    fn provider(&self) -> SocialProvider {
        self.provider
    }

    async fn verify(&self, token: &str) -> Result<SocialIdentity, VerifyError> {
        if token != self.valid_token {
            return Err(VerifyError::InvalidToken);
        }
        self.identity.clone().ok_or(VerifyError::EmailUnavailable)
    }
}
