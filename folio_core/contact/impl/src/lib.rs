use std::sync::Arc;

use folio_core_contact_contracts::{
    ContactFeatureService, ContactReceipt, ContactSendMessageError,
};
use folio_email_contracts::{Email, EmailSendError, EmailService, SentEmail};
use folio_models::{
    contact::{ContactMessage, ContactMessageAuthor},
    email_address::EmailAddress,
};
use folio_shared_contracts::time::TimeService;
use folio_templates_contracts::{
    ContactNotificationHtmlTemplate, ContactNotificationTextTemplate, TemplateService,
};
use folio_utils::html::{escape_html, line_breaks};
use tracing::{error, info};

pub const SUBJECT_PREFIX: &str = "Portfolio Contact: ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Template, Email> {
    time: Time,
    template: Template,
    /// `None` if no credentials for an email provider have been configured.
    email: Option<Email>,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub recipient: Arc<EmailAddress>,
}

impl<Time, Template, Email> ContactFeatureServiceImpl<Time, Template, Email> {
    pub fn new(
        time: Time,
        template: Template,
        email: Option<Email>,
        config: ContactFeatureConfig,
    ) -> Self {
        Self {
            time,
            template,
            email,
            config,
        }
    }
}

impl<Time, Template, EmailS> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Template, EmailS>
where
    Time: TimeService,
    Template: TemplateService,
    EmailS: EmailService,
{
    #[tracing::instrument(skip_all)]
    async fn send_message(
        &self,
        message: ContactMessage,
    ) -> Result<ContactReceipt, ContactSendMessageError> {
        let Some(email_service) = &self.email else {
            error!("Cannot forward contact message: no email provider has been configured");
            return Err(ContactSendMessageError::NotConfigured);
        };

        let timestamp = self.time.now().format(TIMESTAMP_FORMAT).to_string();

        let ContactMessage {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        } = message;

        let html = self.template.render(&ContactNotificationHtmlTemplate {
            name: escape_html(&name),
            email: escape_html(&email),
            subject: escape_html(&subject),
            message: line_breaks(&escape_html(&content)),
            timestamp: timestamp.clone(),
        })?;

        let text = self.template.render(&ContactNotificationTextTemplate {
            name: name.into_inner(),
            email: (*email).clone(),
            subject: (*subject).clone(),
            message: content.into_inner(),
            timestamp,
        })?;

        let notification = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("{SUBJECT_PREFIX}{}", *subject),
            html,
            text,
            reply_to: Some(email.into_inner()),
        };

        match email_service.send(notification).await {
            Ok(SentEmail { id }) => {
                info!(?id, "Forwarded contact message");
                Ok(ContactReceipt { id })
            }
            Err(EmailSendError::Provider(err)) => {
                error!("Email provider failed to deliver contact message: {err}");
                Err(ContactSendMessageError::Send)
            }
            Err(EmailSendError::Other(err)) => Err(err.into()),
        }
    }
}
