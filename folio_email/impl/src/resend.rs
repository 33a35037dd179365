//! Delivery through the HTTP API of [Resend](https://resend.com).

use std::sync::Arc;

use anyhow::Context;
use folio_email_contracts::{Email, EmailSendError, EmailService, SentEmail};
use folio_models::email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/";

#[derive(Debug, Clone)]
pub struct ResendEmailService {
    client: HttpClient,
    config: Arc<ResendEmailServiceConfig>,
}

#[derive(Debug)]
struct ResendEmailServiceConfig {
    from: EmailAddress,
    api_key: String,
    endpoint: Url,
}

impl ResendEmailService {
    /// Create a new client for the Resend API.
    ///
    /// The `endpoint_override` must end with a slash if it contains a path.
    pub fn new(
        from: EmailAddress,
        api_key: String,
        endpoint_override: Option<Url>,
    ) -> anyhow::Result<Self> {
        let endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => RESEND_ENDPOINT.parse()?,
        };

        Ok(Self {
            client: HttpClient::new()?,
            config: ResendEmailServiceConfig {
                from,
                api_key,
                endpoint,
            }
            .into(),
        })
    }
}

impl EmailService for ResendEmailService {
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        let url = self
            .config
            .endpoint
            .join("emails")
            .context("Failed to build url of the send endpoint")?;

        let request = SendEmailRequest {
            from: self.config.from.as_str(),
            to: [email.recipient.as_str()],
            reply_to: email.reply_to.as_deref(),
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| EmailSendError::Provider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { name, message }) => format!("{status} {name}: {message}"),
                Err(_) => status.to_string(),
            };
            return Err(EmailSendError::Provider(detail));
        }

        let SendEmailResponse { id } = response
            .json()
            .await
            .context("Failed to parse response of the Resend API")?;
        debug!(?id, "email accepted by resend");

        Ok(SentEmail { id })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.client
            .get(self.config.endpoint.clone())
            .send()
            .await
            .map(|_| ())
            .context("Failed to reach the Resend API")
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    name: String,
    message: String,
}
