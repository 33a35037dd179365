use folio_config::{EmailConfig, EmailProvider};
use folio_email_impl::{EmailServiceImpl, ResendEmailService, SmtpEmailService};
use tracing::warn;

/// Create the email service selected by the config.
///
/// Returns `None` if the credentials of the selected provider are missing.
pub fn connect(config: &EmailConfig) -> anyhow::Result<Option<EmailServiceImpl>> {
    let service = match config.provider {
        EmailProvider::Resend => {
            let Some(api_key) = config.resend.api_key() else {
                warn!("No resend api key configured, contact messages cannot be sent");
                return Ok(None);
            };
            ResendEmailService::new(
                config.from.clone(),
                api_key.into(),
                config.resend.endpoint_override.clone(),
            )?
            .into()
        }
        EmailProvider::Smtp => {
            let Some(url) = config.smtp.url() else {
                warn!("No smtp url configured, contact messages cannot be sent");
                return Ok(None);
            };
            SmtpEmailService::new(url, config.from.clone())?.into()
        }
    };

    Ok(Some(service))
}
