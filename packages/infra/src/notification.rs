//! # メール送信
//!
//! パスワード再設定メールの送り先を抽象化する。
//! 実装は起動時に `NOTIFICATION_BACKEND` で選ぶ。
//!
//! | 値 | 実装 | 用途 |
//! |----|------|------|
//! | `smtp` | [`SmtpNotificationSender`] | SMTP リレー経由で送信 |
//! | `noop` | [`NoopNotificationSender`] | 送信せず宛先と件名だけログに残す |

mod noop;
mod smtp;

use apartments_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use smtp::SmtpNotificationSender;

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
