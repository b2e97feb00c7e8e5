//! SMTP リレー経由の送信（lettre）

use apartments_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart},
};

use super::NotificationSender;

pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
}

impl SmtpNotificationSender {
    /// 送信元アドレスが不正な場合は起動時にエラーを返す
    pub fn new(host: &str, port: u16, from_address: &str) -> Result<Self, NotificationError> {
        let from = parse_mailbox(from_address)?;

        // 平文接続（同一ネットワーク内のリレーのみを想定）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Self { transport, from })
    }

    /// テキストと HTML の multipart/alternative を組み立てる
    fn compose(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotificationError::SendFailed(format!("メッセージを組み立てられません: {e}")))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::SendFailed(format!("メールアドレスが不正です ({address}): {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    #[tracing::instrument(skip_all, fields(to = %email.to))]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.compose(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        tracing::debug!(code = %response.code(), "SMTP リレーが受理しました");
        Ok(())
    }
}
