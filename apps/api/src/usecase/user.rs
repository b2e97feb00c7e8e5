//! # ユーザー認証ユースケース
//!
//! 新規登録・ログイン・ソーシャルログイン・パスワード再設定を実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログインでは、ユーザーが存在しない場合やソーシャル専用アカウントの場合も
//! ダミーハッシュで検証を実行し、処理時間を均一化する。
//!
//! ## ソーシャルログイン
//!
//! プロバイダーで検証したメールアドレスでアカウントを検索し、
//! 見つかればログイン、見つからなければパスワードなしのアカウントを作成する。

use std::{collections::HashMap, sync::Arc};

use apartments_domain::{
    password::{PasswordHash, PlainPassword},
    social::{SocialIdentity, SocialProvider},
    user::{Email, PersonName, User, UserId},
};
use apartments_infra::{
    notification::NotificationSender,
    password::{PasswordChecker, PasswordHasher},
    repository::UserRepository,
    social::SocialTokenVerifier,
    token::{TokenIssuer, TokenKind},
};
use async_trait::async_trait;
use chrono::Utc;

use super::{AuthOutput, RegisterInput, SocialLoginInput, TemplateRenderer, UserUseCase};
use crate::error::ApiError;

/// タイミング攻撃対策用のダミーハッシュ
///
/// ユーザーが存在しない場合でも同じ処理時間を確保するために使用する。
/// 本番と同じパラメータの Argon2id PHC 文字列で、どの入力とも一致しない。
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// 氏名の最大文字数（[`PersonName`] の上限に合わせる）
const NAME_MAX_CHARS: usize = 50;

/// パスワード再設定メールの送信
pub struct PasswordResetMailer {
    sender:   Arc<dyn NotificationSender>,
    renderer: TemplateRenderer,
    app_url:  String,
}

impl PasswordResetMailer {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        renderer: TemplateRenderer,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            renderer,
            app_url: app_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 再設定リンクを含むメールを送信する（fire-and-forget）
    ///
    /// レンダリング・送信のいずれで失敗してもログ出力のみ行う。
    async fn send(&self, user: &User, token: &str) {
        let reset_url = format!("{}/resetpassword/{token}", self.app_url);
        let email = match self.renderer.render_password_reset(
            user.email().as_str(),
            user.first_name().as_str(),
            &reset_url,
            TokenKind::PasswordReset.ttl().num_minutes(),
        ) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(error = %e, "パスワード再設定メールのレンダリングに失敗");
                return;
            }
        };

        match self.sender.send_email(&email).await {
            Ok(()) => tracing::info!(user_id = %user.id(), "パスワード再設定メールを送信しました"),
            Err(e) => tracing::error!(
                error = %e,
                user_id = %user.id(),
                "パスワード再設定メールの送信に失敗"
            ),
        }
    }
}

/// ユーザー認証ユースケースの実装
pub struct UserUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    password_hasher:  Arc<dyn PasswordHasher>,
    password_checker: Arc<dyn PasswordChecker>,
    token_issuer:     Arc<dyn TokenIssuer>,
    social_verifiers: HashMap<SocialProvider, Arc<dyn SocialTokenVerifier>>,
    reset_mailer:     PasswordResetMailer,
}

impl UserUseCaseImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        password_checker: Arc<dyn PasswordChecker>,
        token_issuer: Arc<dyn TokenIssuer>,
        social_verifiers: Vec<Arc<dyn SocialTokenVerifier>>,
        reset_mailer: PasswordResetMailer,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            password_checker,
            token_issuer,
            social_verifiers: social_verifiers
                .into_iter()
                .map(|v| (v.provider(), v))
                .collect(),
            reset_mailer,
        }
    }

    /// ダミーのパスワード検証を実行
    ///
    /// ユーザーが存在しない場合でも同じ処理時間を確保するため、
    /// ダミーハッシュに対して検証を実行する。結果は無視する。
    fn dummy_verification(&self, password: &PlainPassword) {
        let dummy_hash = PasswordHash::new(DUMMY_HASH);
        let _ = self.password_checker.verify(password, &dummy_hash);
    }

    fn authenticated(&self, user: User, created: bool) -> Result<AuthOutput, ApiError> {
        let tokens = self.token_issuer.issue_pair(user.id())?;
        Ok(AuthOutput {
            user,
            tokens,
            created,
        })
    }

    /// ソーシャルアカウントを作成する
    ///
    /// 同じメールアドレスで同時に作成された場合は、先に作成されたアカウントでログインする。
    async fn sign_up_social(
        &self,
        identity: SocialIdentity,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<AuthOutput, ApiError> {
        let first_name = first_name
            .or(identity.first_name)
            .and_then(|n| PersonName::new(truncate(&n)).ok())
            .map_or_else(|| PersonName::new(truncate(identity.email.local_part())), Ok)?;
        let last_name = last_name
            .or(identity.last_name)
            .and_then(|n| PersonName::new(truncate(&n)).ok())
            .map_or_else(|| PersonName::new(provider_label(identity.provider)), Ok)?;

        let user = User::new_social(
            UserId::new(),
            first_name,
            last_name,
            identity.email,
            identity.provider,
            Utc::now(),
        );

        match self.user_repository.insert(&user).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user.id(),
                    provider = identity.provider.as_str(),
                    "ソーシャルアカウントを作成しました"
                );
                self.authenticated(user, true)
            }
            Err(e) if e.is_conflict() => {
                let existing = self
                    .user_repository
                    .find_by_email(user.email())
                    .await?
                    .ok_or_else(|| ApiError::Internal("競合したユーザーが見つかりません".to_string()))?;
                self.authenticated(existing, false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl UserUseCase for UserUseCaseImpl {
    #[tracing::instrument(skip_all)]
    async fn register(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
        let first_name = PersonName::new(input.first_name)?;
        let last_name = PersonName::new(input.last_name)?;
        let email = Email::new(input.email)?;
        let password = PlainPassword::new(input.password);
        password.check_policy()?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(
                "このメールアドレスは既に登録されています".to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&password)?;
        let user = User::new_with_password(
            UserId::new(),
            first_name,
            last_name,
            email,
            password_hash,
            Utc::now(),
        );
        self.user_repository.insert(&user).await?;
        tracing::info!(user_id = %user.id(), "ユーザーを登録しました");

        self.authenticated(user, true)
    }

    #[tracing::instrument(skip_all)]
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutput, ApiError> {
        let password = PlainPassword::new(password);
        let Ok(email) = Email::new(email) else {
            self.dummy_verification(&password);
            return Err(ApiError::AuthenticationFailed);
        };

        let user = self.user_repository.find_by_email(&email).await?;
        let Some((user, hash)) = user.and_then(|u| {
            let hash = u.password_hash()?.clone();
            Some((u, hash))
        }) else {
            self.dummy_verification(&password);
            return Err(ApiError::AuthenticationFailed);
        };

        match self.password_checker.verify(&password, &hash) {
            Ok(result) if result.is_match() => self.authenticated(user, false),
            Ok(_) => Err(ApiError::AuthenticationFailed),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user.id(), "パスワードハッシュの検証に失敗");
                Err(ApiError::AuthenticationFailed)
            }
        }
    }

    #[tracing::instrument(skip_all, fields(provider = input.provider.as_str()))]
    async fn social_login(&self, input: SocialLoginInput) -> Result<AuthOutput, ApiError> {
        let verifier = self.social_verifiers.get(&input.provider).ok_or_else(|| {
            ApiError::Internal(format!("{} の検証器が未設定です", input.provider))
        })?;

        let identity = verifier.verify(&input.token).await?;

        match self.user_repository.find_by_email(&identity.email).await? {
            Some(user) => self.authenticated(user, false),
            None => {
                self.sign_up_social(identity, input.first_name, input.last_name)
                    .await
            }
        }
    }

    #[tracing::instrument(skip_all)]
    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let Ok(email) = Email::new(email) else {
            return Ok(());
        };

        let user = match self.user_repository.find_by_email(&email).await {
            Ok(Some(user)) if user.can_login_with_password() => user,
            Ok(_) => {
                tracing::debug!("再設定対象のパスワードアカウントが存在しません");
                return Ok(());
            }
            Err(e) => {
                tracing::error!(error = %e, "パスワード再設定のユーザー検索に失敗");
                return Ok(());
            }
        };

        match self.token_issuer.issue_password_reset(user.id()) {
            Ok(token) => self.reset_mailer.send(&user, &token).await,
            Err(e) => tracing::error!(error = %e, "パスワード再設定トークンの発行に失敗"),
        }

        Ok(())
    }
}

/// 氏名の上限文字数で切り詰める
fn truncate(value: &str) -> String {
    value.chars().take(NAME_MAX_CHARS).collect()
}

/// プロバイダー名の表示用ラベル
fn provider_label(provider: SocialProvider) -> &'static str {
    match provider {
        SocialProvider::Facebook => "Facebook",
        SocialProvider::Google => "Google",
        SocialProvider::Apple => "Apple",
    }
}

#[cfg(test)]
mod tests {
    use apartments_domain::password::PasswordVerifyResult;
    use apartments_infra::{
        InfraError,
        mock::{MockNotificationSender, MockSocialTokenVerifier, MockUserRepository},
        token::JwtTokenIssuer,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    // テスト用スタブ: "password123" のみ一致とみなす
    struct StubPasswordService;

    impl PasswordHasher for StubPasswordService {
        fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
            Ok(PasswordHash::new(format!("hashed:{}", password.as_str())))
        }
    }

    impl PasswordChecker for StubPasswordService {
        fn verify(
            &self,
            password: &PlainPassword,
            hash: &PasswordHash,
        ) -> Result<PasswordVerifyResult, InfraError> {
            Ok(PasswordVerifyResult::from(
                hash.as_str() == format!("hashed:{}", password.as_str()),
            ))
        }
    }

    const GOOGLE_TOKEN: &str = "valid-google-token";
    const APPLE_TOKEN: &str = "valid-apple-token";

    struct Fixture {
        repo:   MockUserRepository,
        sender: MockNotificationSender,
        sut:    UserUseCaseImpl,
    }

    fn identity(provider: SocialProvider, email: &str, first_name: Option<&str>) -> SocialIdentity {
        SocialIdentity {
            provider,
            subject: "subject-1".to_string(),
            email: Email::new(email).unwrap(),
            first_name: first_name.map(str::to_string),
            last_name: None,
        }
    }

    fn fixture_with_sender(sender: MockNotificationSender) -> Fixture {
        let repo = MockUserRepository::new();
        let password = Arc::new(StubPasswordService);
        let verifiers: Vec<Arc<dyn SocialTokenVerifier>> = vec![
            Arc::new(MockSocialTokenVerifier::new(
                SocialProvider::Google,
                GOOGLE_TOKEN,
                identity(SocialProvider::Google, "jane@gmail.com", Some("Jane")),
            )),
            Arc::new(MockSocialTokenVerifier::new(
                SocialProvider::Apple,
                APPLE_TOKEN,
                identity(SocialProvider::Apple, "relay123@privaterelay.appleid.com", None),
            )),
            Arc::new(MockSocialTokenVerifier::without_email(
                SocialProvider::Facebook,
                "fb-no-email",
            )),
        ];
        let mailer = PasswordResetMailer::new(
            Arc::new(sender.clone()),
            TemplateRenderer::new().unwrap(),
            "http://localhost:19006/",
        );
        let sut = UserUseCaseImpl::new(
            Arc::new(repo.clone()),
            password.clone(),
            password,
            Arc::new(JwtTokenIssuer::new("test-secret")),
            verifiers,
            mailer,
        );
        Fixture { repo, sender, sut }
    }

    fn fixture() -> Fixture {
        fixture_with_sender(MockNotificationSender::new())
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            first_name: "Jane".to_string(),
            last_name:  "Doe".to_string(),
            email:      email.to_string(),
            password:   "password123".to_string(),
        }
    }

    fn social_input(provider: SocialProvider, token: &str) -> SocialLoginInput {
        SocialLoginInput {
            provider,
            token: token.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    // ===== register =====

    #[tokio::test]
    async fn test_register_成功() {
        // Given
        let f = fixture();

        // When
        let output = f.sut.register(register_input("Jane@Example.com")).await.unwrap();

        // Then
        assert!(output.created);
        assert_eq!(output.user.email().as_str(), "jane@example.com");
        assert!(!output.tokens.access_token.is_empty());
        let stored = f.repo.users();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0].password_hash().map(PasswordHash::as_str),
            Some("hashed:password123")
        );
    }

    #[tokio::test]
    async fn test_register_登録済みメールアドレスは409() {
        let f = fixture();
        f.sut.register(register_input("jane@example.com")).await.unwrap();

        let result = f.sut.register(register_input("JANE@example.com")).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(f.repo.users().len(), 1);
    }

    #[tokio::test]
    async fn test_register_短いパスワードは400() {
        let f = fixture();
        let mut input = register_input("jane@example.com");
        input.password = "short".to_string();

        let result = f.sut.register(input).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(f.repo.users().is_empty());
    }

    // ===== login =====

    #[tokio::test]
    async fn test_login_成功() {
        let f = fixture();
        f.sut.register(register_input("jane@example.com")).await.unwrap();

        let output = f.sut.login("jane@example.com", "password123").await.unwrap();

        assert!(!output.created);
        assert_eq!(output.user.first_name().as_str(), "Jane");
    }

    #[tokio::test]
    async fn test_login_失敗理由は区別されない() {
        // Given
        let f = fixture();
        f.sut.register(register_input("jane@example.com")).await.unwrap();
        f.sut
            .social_login(social_input(SocialProvider::Google, GOOGLE_TOKEN))
            .await
            .unwrap();

        // When
        let wrong_password = f.sut.login("jane@example.com", "wrongpassword").await;
        let unknown_user = f.sut.login("nobody@example.com", "password123").await;
        let social_only = f.sut.login("jane@gmail.com", "password123").await;
        let malformed = f.sut.login("not-an-email", "password123").await;

        // Then
        for result in [wrong_password, unknown_user, social_only, malformed] {
            assert!(matches!(result, Err(ApiError::AuthenticationFailed)));
        }
    }

    // ===== social_login =====

    #[tokio::test]
    async fn test_social_login_初回はアカウントを作成し2回目はログインする() {
        let f = fixture();

        let first = f
            .sut
            .social_login(social_input(SocialProvider::Google, GOOGLE_TOKEN))
            .await
            .unwrap();
        let second = f
            .sut
            .social_login(social_input(SocialProvider::Google, GOOGLE_TOKEN))
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.user.id(), second.user.id());
        assert_eq!(first.user.social_provider(), Some(SocialProvider::Google));
        assert_eq!(first.user.last_name().as_str(), "Google");
        assert_eq!(f.repo.users().len(), 1);
    }

    #[tokio::test]
    async fn test_social_login_既存のパスワードアカウントにログインする() {
        let f = fixture();
        f.sut.register(register_input("jane@gmail.com")).await.unwrap();

        let output = f
            .sut
            .social_login(social_input(SocialProvider::Google, GOOGLE_TOKEN))
            .await
            .unwrap();

        assert!(!output.created);
        assert!(output.user.can_login_with_password());
    }

    #[tokio::test]
    async fn test_social_login_appleはリクエストの氏名を使う() {
        let f = fixture();
        let mut input = social_input(SocialProvider::Apple, APPLE_TOKEN);
        input.first_name = Some("Jane".to_string());
        input.last_name = Some("Appleseed".to_string());

        let output = f.sut.social_login(input).await.unwrap();

        assert_eq!(output.user.first_name().as_str(), "Jane");
        assert_eq!(output.user.last_name().as_str(), "Appleseed");
    }

    #[tokio::test]
    async fn test_social_login_氏名がなければメールアドレスから補う() {
        let f = fixture();

        let output = f
            .sut
            .social_login(social_input(SocialProvider::Apple, APPLE_TOKEN))
            .await
            .unwrap();

        assert_eq!(output.user.first_name().as_str(), "relay123");
        assert_eq!(output.user.last_name().as_str(), "Apple");
    }

    #[tokio::test]
    async fn test_social_login_無効なトークンは401() {
        let f = fixture();

        let result = f
            .sut
            .social_login(social_input(SocialProvider::Google, "forged"))
            .await;

        assert!(matches!(result, Err(ApiError::InvalidToken)));
        assert!(f.repo.users().is_empty());
    }

    #[tokio::test]
    async fn test_social_login_メールアドレスがなければ400() {
        let f = fixture();

        let result = f
            .sut
            .social_login(social_input(SocialProvider::Facebook, "fb-no-email"))
            .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    // ===== forgot_password =====

    #[tokio::test]
    async fn test_forgot_password_パスワードアカウントにはメールを送信する() {
        // Given
        let f = fixture();
        f.sut.register(register_input("jane@example.com")).await.unwrap();

        // When
        f.sut.forgot_password("jane@example.com").await.unwrap();

        // Then
        let sent = f.sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert!(
            sent[0]
                .text_body
                .contains("http://localhost:19006/resetpassword/")
        );
    }

    #[tokio::test]
    async fn test_forgot_password_メールのトークンは再設定用として検証できる() {
        let f = fixture();
        let registered = f.sut.register(register_input("jane@example.com")).await.unwrap();

        f.sut.forgot_password("jane@example.com").await.unwrap();

        let sent = f.sender.sent_emails();
        let token = sent[0]
            .text_body
            .split("/resetpassword/")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap();
        let claims = JwtTokenIssuer::new("test-secret")
            .decode(token, TokenKind::PasswordReset)
            .unwrap();
        assert_eq!(claims.sub, registered.user.id().to_string());
    }

    #[tokio::test]
    async fn test_forgot_password_未登録やソーシャル専用でも成功を返しメールは送らない() {
        let f = fixture();
        f.sut
            .social_login(social_input(SocialProvider::Google, GOOGLE_TOKEN))
            .await
            .unwrap();

        assert!(f.sut.forgot_password("nobody@example.com").await.is_ok());
        assert!(f.sut.forgot_password("jane@gmail.com").await.is_ok());
        assert!(f.sut.forgot_password("broken").await.is_ok());
        assert!(f.sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_forgot_password_送信失敗でも成功を返す() {
        let f = fixture_with_sender(MockNotificationSender::failing());
        f.sut.register(register_input("jane@example.com")).await.unwrap();

        let result = f.sut.forgot_password("jane@example.com").await;

        assert!(result.is_ok());
    }
}
