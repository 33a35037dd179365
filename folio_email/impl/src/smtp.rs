//! Delivery through an SMTP relay.

use anyhow::{anyhow, Context};
use folio_email_contracts::{Email, EmailSendError, EmailService, SentEmail};
use folio_models::email_address::EmailAddress;
use folio_utils::Apply;
use lettre::{
    message::{Mailbox, MessageBuilder, MultiPart},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    pub fn new(url: &str, from: EmailAddress) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build();

        Ok(Self { from, transport })
    }
}

impl EmailService for SmtpEmailService {
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        let message = build_message(&self.from, email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| EmailSendError::Provider(err.to_string()))?;

        if !response.is_positive() {
            let detail = response.message().collect::<Vec<_>>().join(" ");
            return Err(EmailSendError::Provider(detail));
        }

        Ok(SentEmail { id: None })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

/// A reply-to address lettre cannot parse is reported as a provider error, as
/// the message is refused before it reaches the relay.
fn build_message(from: &EmailAddress, email: Email) -> Result<Message, EmailSendError> {
    let reply_to = email
        .reply_to
        .map(|reply_to| {
            reply_to.parse::<Mailbox>().map_err(|err| {
                EmailSendError::Provider(format!("Invalid reply-to address {reply_to:?}: {err}"))
            })
        })
        .transpose()?;

    Message::builder()
        .from(from.0.clone().into())
        .to(email.recipient.0.into())
        .apply_map(reply_to, MessageBuilder::reply_to)
        .subject(email.subject)
        .multipart(MultiPart::alternative_plain_html(email.text, email.html))
        .context("Failed to build email")
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;

    fn email(reply_to: Option<&str>) -> Email {
        Email {
            recipient: "contact@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Hello".into(),
            html: "<p>Hello World!</p>".into(),
            text: "Hello World!".into(),
            reply_to: reply_to.map(Into::into),
        }
    }

    #[test]
    fn message_headers() {
        let from = "sender@example.com".parse().unwrap();

        let message = build_message(&from, email(Some("max@example.de"))).unwrap();

        let headers = message.headers();
        assert_eq!(headers.get_raw("From"), Some("sender@example.com"));
        assert_eq!(headers.get_raw("To"), Some("contact@example.com"));
        assert_eq!(headers.get_raw("Reply-To"), Some("max@example.de"));
        assert_eq!(headers.get_raw("Subject"), Some("Portfolio Contact: Hello"));

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("Hello World!"));
    }

    #[test]
    fn without_reply_to() {
        let from = "sender@example.com".parse().unwrap();

        let message = build_message(&from, email(None)).unwrap();

        assert_eq!(message.headers().get_raw("Reply-To"), None);
    }

    #[test]
    fn invalid_reply_to() {
        let from = "sender@example.com".parse().unwrap();

        for reply_to in ["not an address", "a(b@c.de", "a,b@c.de", "a;b@c.de", "a[b@c.de"] {
            let result = build_message(&from, email(Some(reply_to)));

            assert_matches!(result, Err(EmailSendError::Provider(detail)) if detail.contains("reply-to"));
        }
    }
}
