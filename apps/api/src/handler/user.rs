//! # ユーザー認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/user/register` - メール + パスワードで新規登録
//! - `POST /api/user/login` - メール + パスワードでログイン
//! - `POST /api/user/facebook` - Facebook アクセストークンでログイン / 登録
//! - `POST /api/user/google` - Google アクセストークンでログイン / 登録
//! - `POST /api/user/apple` - Apple ID トークンでログイン / 登録
//! - `POST /api/user/forgotpassword` - パスワード再設定メールの送信
//!
//! リクエスト・レスポンスのキーは camelCase（モバイルクライアントの形式）。
//! 成功時の本文はエンベロープなしでそのまま返す（クライアントは本文を直接読む）。
//! アカウントを作成した場合は 201、既存アカウントへのログインは 200 を返す。

use std::sync::Arc;

use apartments_domain::social::SocialProvider;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::ApiError,
    usecase::{AuthOutput, RegisterInput, SocialLoginInput, UserUseCase},
    validation::ValidatedJson,
};

/// ユーザー認証ハンドラの共有状態
pub struct UserState {
    pub usecase: Arc<dyn UserUseCase>,
}

// --- リクエスト/レスポンス型 ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name:  String,
    #[validate(email)]
    pub email:      String,
    #[validate(length(min = 8, max = 64))]
    pub password:   String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email:    String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Facebook / Google のアクセストークン
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest {
    #[validate(length(min = 1))]
    pub access_token: String,
}

/// Apple の ID トークン
///
/// 氏名は初回認可時のみクライアントが受け取るため任意。
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppleRequest {
    #[validate(length(min = 1))]
    pub identity_token: String,
    #[validate(length(max = 50))]
    pub first_name:     Option<String>,
    #[validate(length(max = 50))]
    pub last_name:      Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// 認証成功レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id:              Uuid,
    pub first_name:      String,
    pub last_name:       String,
    pub email:           String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_provider: Option<SocialProvider>,
    pub access_token:    String,
    pub refresh_token:   String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub email_sent: bool,
}

impl From<AuthOutput> for AuthResponse {
    fn from(output: AuthOutput) -> Self {
        let user = output.user;
        Self {
            id:              *user.id().as_uuid(),
            first_name:      user.first_name().as_str().to_string(),
            last_name:       user.last_name().as_str().to_string(),
            email:           user.email().as_str().to_string(),
            social_provider: user.social_provider(),
            access_token:    output.tokens.access_token,
            refresh_token:   output.tokens.refresh_token,
        }
    }
}

/// 作成なら 201、ログインなら 200 で認証結果を返す
fn auth_response(output: AuthOutput) -> impl IntoResponse {
    let status = if output.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(AuthResponse::from(output)))
}

// --- ハンドラ ---

/// POST /api/user/register
pub async fn register(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state
        .usecase
        .register(RegisterInput {
            first_name: req.first_name,
            last_name:  req.last_name,
            email:      req.email,
            password:   req.password,
        })
        .await?;
    Ok(auth_response(output))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state.usecase.login(&req.email, &req.password).await?;
    Ok(auth_response(output))
}

/// POST /api/user/facebook
pub async fn facebook(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<AccessTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output =
        social_login(&state, SocialProvider::Facebook, req.access_token, None, None).await?;
    Ok(auth_response(output))
}

/// POST /api/user/google
pub async fn google(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<AccessTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output =
        social_login(&state, SocialProvider::Google, req.access_token, None, None).await?;
    Ok(auth_response(output))
}

/// POST /api/user/apple
pub async fn apple(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<AppleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let output = social_login(
        &state,
        SocialProvider::Apple,
        req.identity_token,
        req.first_name,
        req.last_name,
    )
    .await?;
    Ok(auth_response(output))
}

async fn social_login(
    state: &UserState,
    provider: SocialProvider,
    token: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<AuthOutput, ApiError> {
    state
        .usecase
        .social_login(SocialLoginInput {
            provider,
            token,
            first_name,
            last_name,
        })
        .await
}

/// POST /api/user/forgotpassword
///
/// アカウントの有無にかかわらず常に `{ "emailSent": true }` を返す。
pub async fn forgot_password(
    State(state): State<Arc<UserState>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.usecase.forgot_password(&req.email).await?;
    Ok(Json(ForgotPasswordResponse { email_sent: true }))
}

#[cfg(test)]
mod tests {
    use apartments_domain::{
        password::PasswordHash,
        user::{Email, PersonName, User, UserId},
    };
    use apartments_infra::token::TokenPair;
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::post,
    };
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    // テスト用スタブ
    // - パスワード "password123" のみログイン成功
    // - ソーシャルトークン "new" は作成、"known" は既存ログイン、それ以外は無効
    struct StubUserUseCase;

    fn user(social_provider: Option<SocialProvider>) -> User {
        let first = PersonName::new("Jane").unwrap();
        let last = PersonName::new("Doe").unwrap();
        let email = Email::new("jane@example.com").unwrap();
        match social_provider {
            Some(p) => User::new_social(UserId::new(), first, last, email, p, Utc::now()),
            None => User::new_with_password(
                UserId::new(),
                first,
                last,
                email,
                PasswordHash::new("hash"),
                Utc::now(),
            ),
        }
    }

    fn output(user: User, created: bool) -> AuthOutput {
        AuthOutput {
            user,
            tokens: TokenPair {
                access_token:  "access".to_string(),
                refresh_token: "refresh".to_string(),
            },
            created,
        }
    }

    #[async_trait]
    impl UserUseCase for StubUserUseCase {
        async fn register(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
            if input.email == "taken@example.com" {
                return Err(ApiError::Conflict("登録済み".to_string()));
            }
            Ok(output(user(None), true))
        }

        async fn login(&self, _email: &str, password: &str) -> Result<AuthOutput, ApiError> {
            if password == "password123" {
                Ok(output(user(None), false))
            } else {
                Err(ApiError::AuthenticationFailed)
            }
        }

        async fn social_login(&self, input: SocialLoginInput) -> Result<AuthOutput, ApiError> {
            match input.token.as_str() {
                "new" => Ok(output(user(Some(input.provider)), true)),
                "known" => Ok(output(user(Some(input.provider)), false)),
                _ => Err(ApiError::InvalidToken),
            }
        }

        async fn forgot_password(&self, _email: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn create_test_app() -> Router {
        let state = Arc::new(UserState {
            usecase: Arc::new(StubUserUseCase),
        });

        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/facebook", post(facebook))
            .route("/google", post(google))
            .route("/apple", post(apple))
            .route("/forgotpassword", post(forgot_password))
            .with_state(state)
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        let response = create_test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_register_成功() {
        // Given
        let body = serde_json::json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "password123"
        });

        // When
        let (status, json) = post_json("/register", body).await;

        // Then
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert!(json["id"].is_string());
        assert!(json.get("socialProvider").is_none());
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_register_登録済みは409() {
        let body = serde_json::json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "taken@example.com",
            "password": "password123"
        });

        let (status, json) = post_json("/register", body).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["status"], 409);
    }

    #[tokio::test]
    async fn test_register_不正なボディは400() {
        let body = serde_json::json!({
            "firstName": "",
            "lastName": "Doe",
            "email": "not-an-email",
            "password": "short"
        });

        let (status, json) = post_json("/register", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.contains("firstName") || detail.contains("first_name"));
        assert!(detail.contains("email"));
        assert!(detail.contains("password"));
    }

    #[tokio::test]
    async fn test_login_成功() {
        let body = serde_json::json!({ "email": "jane@example.com", "password": "password123" });

        let (status, json) = post_json("/login", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["lastName"], "Doe");
    }

    #[tokio::test]
    async fn test_login_認証失敗は401() {
        let body = serde_json::json!({ "email": "jane@example.com", "password": "wrongpassword" });

        let (status, json) = post_json("/login", body).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["title"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_facebook_初回は201() {
        let (status, json) =
            post_json("/facebook", serde_json::json!({ "accessToken": "new" })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["socialProvider"], "facebook");
    }

    #[tokio::test]
    async fn test_google_既存アカウントは200() {
        let (status, json) =
            post_json("/google", serde_json::json!({ "accessToken": "known" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["socialProvider"], "google");
    }

    #[tokio::test]
    async fn test_apple_氏名は任意() {
        let (status, json) =
            post_json("/apple", serde_json::json!({ "identityToken": "new" })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["socialProvider"], "apple");
    }

    #[tokio::test]
    async fn test_ソーシャルトークンが無効なら401() {
        let (status, _) =
            post_json("/google", serde_json::json!({ "accessToken": "forged" })).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_ソーシャルトークン欠落は400() {
        let (status, _) = post_json("/facebook", serde_json::json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forgot_password_常にemail_sentを返す() {
        let (status, json) = post_json(
            "/forgotpassword",
            serde_json::json!({ "email": "nobody@example.com" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "emailSent": true }));
    }
}
