use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{
    ContactFeatureService, ContactReceipt, ContactSendMessageError,
};
use folio_models::contact::{ContactMessage, ContactMessageError};
use tracing::error;

use super::error;
use crate::{
    middlewares::panic_handler,
    models::contact::{ApiContactMessage, ApiContactReceipt},
};

pub const CONTACT_ROUTE: &str = "/api/contact";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    let router = Router::new()
        .route(CONTACT_ROUTE, routing::post(send_message))
        .with_state(service);
    panic_handler::add(router, unexpected_error)
}

/// The body is parsed by hand so that malformed JSON and a missing
/// content type end up in the same place.
async fn send_message(service: State<Arc<impl ContactFeatureService>>, body: Bytes) -> Response {
    let message = match serde_json::from_slice::<ApiContactMessage>(&body) {
        Ok(message) => message,
        Err(err) => {
            error!("Failed to parse contact message: {err}");
            return unexpected_error();
        }
    };

    let message = match ContactMessage::try_from(message) {
        Ok(message) => message,
        Err(ContactMessageError::MissingFields) => {
            return error(StatusCode::BAD_REQUEST, "All fields are required")
        }
        Err(ContactMessageError::InvalidEmail) => {
            return error(StatusCode::BAD_REQUEST, "Invalid email format")
        }
    };

    match service.send_message(message).await {
        Ok(ContactReceipt { id }) => Json(ApiContactReceipt {
            message: "Message sent successfully!",
            id,
        })
        .into_response(),
        Err(ContactSendMessageError::NotConfigured) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email service is not configured. Please contact the administrator.",
        ),
        Err(ContactSendMessageError::Send) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send email. Please try again later.",
        ),
        Err(ContactSendMessageError::Other(err)) => {
            error!("Failed to send contact message: {err:#}");
            unexpected_error()
        }
    }
}

fn unexpected_error() -> Response {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to send message. Please try again.",
    )
}

#[cfg(test)]
mod tests {
    use folio_core_contact_contracts::MockContactFeatureService;
    use folio_models::contact::{
        ContactEmailAddress, ContactMessageAuthor, ContactMessageAuthorName,
        ContactMessageContent, ContactMessageSubject,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message("Jane", "jane@example.com", "Hi", "Hello"),
            Ok(ContactReceipt {
                id: Some("abc123".into()),
            }),
        );
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Message sent successfully!", "id": "abc123"})
        );
    }

    #[tokio::test]
    async fn ok_without_id() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message("Jane", "jane@example.com", "Hi", "Hello"),
            Ok(ContactReceipt { id: None }),
        );
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(body, json!({"message": "Message sent successfully!"}));
    }

    #[tokio::test]
    async fn missing_fields() {
        // Arrange
        let url = spawn(MockContactFeatureService::new()).await;

        for field in ["name", "email", "subject", "message"] {
            for value in [None, Some(Value::Null), Some(json!(""))] {
                let mut body = valid_body();
                match value {
                    Some(value) => body[field] = value,
                    None => {
                        body.as_object_mut().unwrap().remove(field);
                    }
                }

                // Act
                let (status, response) = post(&url, &body).await;

                // Assert
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(response, json!({"error": "All fields are required"}));
            }
        }
    }

    #[tokio::test]
    async fn empty_object() {
        // Arrange
        let url = spawn(MockContactFeatureService::new()).await;

        // Act
        let (status, body) = post(&url, &json!({})).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "All fields are required"}));
    }

    #[tokio::test]
    async fn invalid_email() {
        // Arrange
        let url = spawn(MockContactFeatureService::new()).await;
        let mut body = valid_body();
        body["email"] = json!("not-an-email");

        // Act
        let (status, body) = post(&url, &body).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }

    #[tokio::test]
    async fn missing_fields_take_precedence() {
        // Arrange
        let url = spawn(MockContactFeatureService::new()).await;
        let body = json!({"name": "Jane", "email": "nope", "subject": "", "message": "Hello"});

        // Act
        let (status, body) = post(&url, &body).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "All fields are required"}));
    }

    #[tokio::test]
    async fn malformed_json() {
        // Arrange
        let url = spawn(MockContactFeatureService::new()).await;

        // Act
        let response = reqwest::Client::new()
            .post(&url)
            .body("{\"name\": ")
            .send()
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({"error": "Failed to send message. Please try again."})
        );
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message("Jane", "jane@example.com", "Hi", "Hello"),
            Err(ContactSendMessageError::NotConfigured),
        );
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Email service is not configured. Please contact the administrator."})
        );
    }

    #[tokio::test]
    async fn provider_error() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message("Jane", "jane@example.com", "Hi", "Hello"),
            Err(ContactSendMessageError::Send),
        );
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Failed to send email. Please try again later."})
        );
    }

    #[tokio::test]
    async fn unexpected_failure_hides_detail() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message("Jane", "jane@example.com", "Hi", "Hello"),
            Err(anyhow::anyhow!("template exploded").into()),
        );
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Failed to send message. Please try again."})
        );
    }

    #[tokio::test]
    async fn panic() {
        // Arrange
        let mut service = MockContactFeatureService::new();
        service
            .expect_send_message()
            .once()
            .returning(|_| panic!("boom"));
        let url = spawn(service).await;

        // Act
        let (status, body) = post(&url, &valid_body()).await;

        // Assert
        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Failed to send message. Please try again."})
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions() {
        // Arrange
        let mut service = MockContactFeatureService::new();
        service
            .expect_send_message()
            .times(50)
            .returning(|message| {
                let result = if message.subject.starts_with("fail") {
                    Err(ContactSendMessageError::Send)
                } else {
                    Ok(ContactReceipt {
                        id: Some(message.subject.into_inner()),
                    })
                };
                Box::pin(std::future::ready(result))
            });
        let url = spawn(service).await;

        // Act
        let requests = (0..50).map(|i| {
            let url = url.clone();
            let subject = if i % 5 == 0 {
                format!("fail {i}")
            } else {
                format!("ok {i}")
            };
            async move {
                let mut body = valid_body();
                body["subject"] = json!(subject);
                (subject, post(&url, &body).await)
            }
        });
        let responses = futures::future::join_all(requests).await;

        // Assert
        for (subject, (status, body)) in responses {
            if subject.starts_with("fail") {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            } else {
                assert_eq!(status, reqwest::StatusCode::OK);
                assert_eq!(body["id"], json!(subject));
            }
        }
    }

    async fn spawn(service: MockContactFeatureService) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(service.into())).await });
        format!("http://{addr}{CONTACT_ROUTE}")
    }

    async fn post(url: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .json(body)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }

    fn valid_body() -> Value {
        json!({
            "name": "Jane",
            "email": "jane@example.com",
            "subject": "Hi",
            "message": "Hello",
        })
    }

    fn message(name: &str, email: &str, subject: &str, content: &str) -> ContactMessage {
        ContactMessage {
            author: ContactMessageAuthor {
                name: ContactMessageAuthorName::try_new(name.to_owned()).unwrap(),
                email: ContactEmailAddress::try_new(email.to_owned()).unwrap(),
            },
            subject: ContactMessageSubject::try_new(subject.to_owned()).unwrap(),
            content: ContactMessageContent::try_new(content.to_owned()).unwrap(),
        }
    }
}
