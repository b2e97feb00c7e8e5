//! 送信を行わない実装（開発環境・テスト環境の既定値）

use apartments_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;

use super::NotificationSender;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        // 本文には再設定トークンが含まれるため出力しない
        tracing::info!(to = %email.to, subject = %email.subject, "メール送信は無効化されています");
        Ok(())
    }
}
