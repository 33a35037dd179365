use std::net::SocketAddr;

use folio_email_contracts::{Email, EmailSendError, EmailService};
use folio_email_impl::ResendEmailService;
use folio_testing::resend::{Inbox, ReceivedEmail};
use folio_utils::assert_matches;

const API_KEY: &str = "re_test";

#[tokio::test]
async fn send_email() {
    let (sut, inbox) = setup(API_KEY).await;

    let result = sut
        .send(email("contact@example.com", Some("max@example.de")))
        .await
        .unwrap();

    assert_eq!(result.id.as_deref(), Some("fake-1"));
    assert_eq!(
        inbox.emails().await,
        [ReceivedEmail {
            id: "fake-1".into(),
            from: "sender@example.com".into(),
            to: vec!["contact@example.com".into()],
            reply_to: Some("max@example.de".into()),
            subject: "Portfolio Contact: Hello".into(),
            html: Some("<p>Hello &amp; welcome</p>".into()),
            text: Some("Hello & welcome".into()),
        }]
    );
}

#[tokio::test]
async fn send_email_without_reply_to() {
    let (sut, inbox) = setup(API_KEY).await;

    sut.send(email("contact@example.com", None)).await.unwrap();

    assert_eq!(inbox.emails().await[0].reply_to, None);
}

#[tokio::test]
async fn rejected() {
    let (sut, inbox) = setup(API_KEY).await;

    let result = sut.send(email("contact@reject.example", None)).await;

    assert_matches!(result, Err(EmailSendError::Provider(detail)) if detail.contains("validation_error"));
    assert!(inbox.emails().await.is_empty());
}

#[tokio::test]
async fn invalid_api_key() {
    let (sut, inbox) = setup("wrong").await;

    let result = sut.send(email("contact@example.com", None)).await;

    assert_matches!(result, Err(EmailSendError::Provider(detail)) if detail.contains("401"));
    assert!(inbox.emails().await.is_empty());
}

#[tokio::test]
async fn unreachable() {
    let addr = SocketAddr::from(([127, 0, 0, 1], 1));
    let sut = make_sut(addr, API_KEY);

    let result = sut.send(email("contact@example.com", None)).await;

    assert_matches!(result, Err(EmailSendError::Provider(_)));
}

#[tokio::test]
async fn ping() {
    let (sut, _) = setup(API_KEY).await;
    sut.ping().await.unwrap();
}

async fn setup(api_key: &str) -> (ResendEmailService, Inbox) {
    let (addr, inbox) = folio_testing::resend::spawn(API_KEY).await.unwrap();
    (make_sut(addr, api_key), inbox)
}

fn make_sut(addr: SocketAddr, api_key: &str) -> ResendEmailService {
    ResendEmailService::new(
        "sender@example.com".parse().unwrap(),
        api_key.into(),
        Some(format!("http://{addr}/").parse().unwrap()),
    )
    .unwrap()
}

fn email(recipient: &str, reply_to: Option<&str>) -> Email {
    Email {
        recipient: recipient.parse().unwrap(),
        subject: "Portfolio Contact: Hello".into(),
        html: "<p>Hello &amp; welcome</p>".into(),
        text: "Hello & welcome".into(),
        reply_to: reply_to.map(Into::into),
    }
}
