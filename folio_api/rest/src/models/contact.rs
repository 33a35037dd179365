use folio_models::contact::{ContactMessage, ContactMessageError};
use serde::{Deserialize, Serialize};

/// The body of a contact form submission. Missing fields and `null` are
/// accepted here and rejected during validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<ApiContactMessage> for ContactMessage {
    type Error = ContactMessageError;

    fn try_from(value: ApiContactMessage) -> Result<Self, Self::Error> {
        ContactMessage::parse(value.name, value.email, value.subject, value.message)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactReceipt {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
