use std::future::Future;

use folio_models::email_address::EmailAddress;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Send the given email. Exactly one delivery attempt is made.
    fn send(&self, email: Email) -> impl Future<Output = Result<SentEmail, EmailSendError>> + Send;

    /// Check whether the email provider is reachable.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// An email with both an html and a plain text body. The sender is
/// determined by the [`EmailService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentEmail {
    /// Message id assigned by the provider, if it returned one.
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error("Email provider failed to deliver the message: {0}")]
    Provider(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<SentEmail, String>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| {
                Box::pin(std::future::ready(result.map_err(EmailSendError::Provider)))
            });
        self
    }

    pub fn with_ping(mut self, result: Result<(), String>) -> Self {
        self.expect_ping()
            .once()
            .return_once(move || Box::pin(std::future::ready(result.map_err(anyhow::Error::msg))));
        self
    }
}
