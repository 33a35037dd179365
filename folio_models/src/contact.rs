use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

/// A message submitted through the contact form of the portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: ContactEmailAddress,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

/// The email address of the author of a contact message.
///
/// Only the rough shape `local@domain.tld` is checked, so this is weaker than
/// [`EmailAddress`](crate::email_address::EmailAddress).
#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmailAddress(String);

/// Anything but `@` and whitespace, where whitespace is what ECMAScript
/// matches with `\s`. Unlike the Unicode `\s` of `regex` this contains U+FEFF
/// and lacks U+0085.
const CONTACT_EMAIL_PART: &str = r"[^@\t\n\x0B\x0C\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}]+";

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let part = CONTACT_EMAIL_PART;
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactMessageError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
}

impl ContactMessage {
    /// Validates the raw fields of a contact form submission.
    ///
    /// Presence of all fields is checked before the shape of the email
    /// address. Absent and empty fields are treated the same.
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        content: Option<String>,
    ) -> Result<Self, ContactMessageError> {
        let (Some(name), Some(email), Some(subject), Some(content)) = (
            name.and_then(|name| ContactMessageAuthorName::try_new(name).ok()),
            email.filter(|email| !email.is_empty()),
            subject.and_then(|subject| ContactMessageSubject::try_new(subject).ok()),
            content.and_then(|content| ContactMessageContent::try_new(content).ok()),
        ) else {
            return Err(ContactMessageError::MissingFields);
        };

        let email =
            ContactEmailAddress::try_new(email).map_err(|_| ContactMessageError::InvalidEmail)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}
