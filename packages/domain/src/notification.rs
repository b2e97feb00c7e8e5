//! # 通知
//!
//! 送信するメールと、その送信で起こりうる失敗を表す。
//! 今のところ送るのはパスワード再設定メールだけで、送信結果は
//! API のレスポンスに反映しない。

use thiserror::Error;

/// 通知の組み立て・送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 送信するメール（HTML とプレーンテキストの両方を持つ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to:        String,
    pub subject:   String,
    pub html_body: String,
    pub text_body: String,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            to:        to.into(),
            subject:   subject.into(),
            html_body: html_body.into(),
            text_body: text_body.into(),
        }
    }
}
