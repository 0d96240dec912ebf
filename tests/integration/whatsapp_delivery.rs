//! WhatsApp Cloud API messenger against a mock Graph endpoint.

use fieldvisit::config::WhatsAppMessengerConfig;
use fieldvisit::contract::TechnicianId;
use fieldvisit::messenger::{Messenger, WhatsAppMessenger};
use fieldvisit::reminder::ReminderMessage;
use std::collections::BTreeMap;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn messenger(server: &MockServer) -> WhatsAppMessenger {
    let mut recipients = BTreeMap::new();
    recipients.insert("Rory".to_owned(), "087 123 4567".to_owned());
    WhatsAppMessenger::new(&WhatsAppMessengerConfig {
        api_base: server.uri(),
        access_token: "token-123".to_owned(),
        phone_number_id: "1055".to_owned(),
        recipients,
        default_country_code: Some("353".to_owned()),
    })
}

fn summary(technician: &str) -> ReminderMessage {
    ReminderMessage {
        technician_id: TechnicianId::new(technician),
        body: "Overdue contracts for Rory:\n\n- Cold Store".to_owned(),
        overdue_count: 1,
    }
}

#[tokio::test]
async fn posts_text_message_to_configured_recipient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1055/messages"))
        .and(header("Authorization", "Bearer token-123"))
        .and(body_partial_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": "353871234567",
            "type": "text",
            "text": { "body": "Overdue contracts for Rory:\n\n- Cold Store" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{ "id": "wamid.1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    messenger(&server)
        .deliver(&summary("RORY"))
        .await
        .expect("delivered");
}

#[tokio::test]
async fn api_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1055/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let err = messenger(&server)
        .deliver(&summary("Rory"))
        .await
        .expect_err("401");
    let text = err.to_string();
    assert!(text.contains("401"), "{text}");
    assert!(text.contains("invalid token"), "{text}");
}

#[tokio::test]
async fn unknown_technician_never_hits_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = messenger(&server)
        .deliver(&summary("Siobhan"))
        .await
        .expect_err("no recipient");
    assert!(err.to_string().contains("Siobhan"));
}
