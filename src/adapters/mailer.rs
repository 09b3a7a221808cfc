use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::digest::{SENDER_NAME, SUBJECT};
use crate::domain::model::OutgoingDigest;
use crate::domain::ports::Mailer;
use crate::utils::error::{DigestError, Result};

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub email_address: String,
    pub password: String,
    pub timeout: Duration,
}

/// STARTTLS + 帳密登入；沒有連線池，每封信各自開關一次連線
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let address = settings.email_address.parse::<Address>().map_err(|e| {
            DigestError::InvalidConfigValueError {
                field: "smtp.email_address".to_string(),
                value: settings.email_address.clone(),
                reason: format!("{}", e),
            }
        })?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), address);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| DigestError::config(format!("SMTP relay {}: {}", settings.host, e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.email_address.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self { transport, from })
    }
}

/// 組出 HTML 多部分郵件
pub fn build_message(from: Mailbox, digest: &OutgoingDigest) -> Result<Message> {
    let to = Mailbox::new(
        Some(digest.recipient_name.clone()),
        digest
            .recipient_email
            .parse::<Address>()
            .map_err(|e| DigestError::mail(&digest.recipient_email, e))?,
    );

    Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .multipart(MultiPart::mixed().singlepart(SinglePart::html(digest.html_body.clone())))
        .map_err(|e| DigestError::mail(&digest.recipient_email, e))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, digest: &OutgoingDigest) -> Result<()> {
        let message = build_message(self.from.clone(), digest)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DigestError::mail(&digest.recipient_email, e))?;
        tracing::debug!("Mail accepted for {}", digest.recipient_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(email: &str) -> OutgoingDigest {
        OutgoingDigest {
            recipient_name: "Ada".to_string(),
            recipient_email: email.to_string(),
            html_body: "Hi Ada,<br><br>Yours sincerely,<br>HallBot".to_string(),
        }
    }

    fn sender() -> Mailbox {
        Mailbox::new(
            Some(SENDER_NAME.to_string()),
            "bot@example.com".parse().unwrap(),
        )
    }

    #[test]
    fn test_message_headers() {
        let message = build_message(sender(), &digest("ada@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Weekly Hall Digest"));
        assert!(raw.contains("From: HallBot <bot@example.com>"));
        assert!(raw.contains("To: Ada <ada@example.com>"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_bad_recipient_is_a_mail_error() {
        let err = build_message(sender(), &digest("not an address")).unwrap_err();
        assert!(matches!(err, DigestError::MailError { .. }));
    }

    #[test]
    fn test_new_rejects_bad_sender_address() {
        let settings = SmtpSettings {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            email_address: "nobody".to_string(),
            password: "secret".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(SmtpMailer::new(&settings).is_err());
    }
}
