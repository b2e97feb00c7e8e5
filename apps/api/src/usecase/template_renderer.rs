//! # テンプレートレンダラー
//!
//! tera でパスワード再設定メールを HTML / plaintext の両形式で生成する。
//! テンプレートは `include_str!` でバイナリに埋め込む。

use apartments_domain::notification::{EmailMessage, NotificationError};
use tera::{Context, Tera};

/// 件名
const PASSWORD_RESET_SUBJECT: &str = "[Apartments] Reset your password";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "password_reset.html",
                    include_str!("../../templates/password_reset.html"),
                ),
                (
                    "password_reset.txt",
                    include_str!("../../templates/password_reset.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// パスワード再設定メールを生成する
    ///
    /// - `reset_url`: `{APP_URL}/resetpassword/{token}`
    /// - `expires_minutes`: リンクの有効期限（分）
    pub fn render_password_reset(
        &self,
        to: &str,
        first_name: &str,
        reset_url: &str,
        expires_minutes: i64,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("first_name", first_name);
        context.insert("reset_url", reset_url);
        context.insert("expires_minutes", &expires_minutes);

        let html_body = self
            .engine
            .render("password_reset.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("password_reset.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage::new(
            to,
            PASSWORD_RESET_SUBJECT,
            html_body,
            text_body,
        ))
    }
}
