//! HTTP relay adapter against a mock relay server.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use url::Url;
use utility_accounts::contract::model::{NotificationChannel, ServiceKind};
use utility_accounts::domain::ports::{GatewayError, NotificationGateway};
use utility_accounts::infra::notify::HttpRelayGateway;

fn relay(server: &MockServer, demo_fallback: bool) -> Arc<dyn NotificationGateway> {
    let base = Url::parse(&server.url("/api")).unwrap();
    Arc::new(HttpRelayGateway::new(
        reqwest::Client::new(),
        base,
        demo_fallback,
    ))
}

#[tokio::test]
async fn otp_is_posted_and_returned_on_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/send-otp")
                .body_includes(r#""type":"sms""#)
                .body_includes(r#""contact":"9000000001""#)
                .body_includes(r#""otp":""#);
            then.status(200)
                .json_body(json!({ "success": true, "message": "OTP sent successfully" }));
        })
        .await;

    let out = relay(&server, false)
        .send_otp(NotificationChannel::Sms, "9000000001")
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(out.success);
    assert_eq!(out.message, "OTP sent successfully");
    assert_eq!(out.code.unwrap().len(), 6);
}

#[tokio::test]
async fn relay_refusal_returns_no_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-otp");
            then.status(200)
                .json_body(json!({ "success": false, "message": "Invalid number" }));
        })
        .await;

    let out = relay(&server, false)
        .send_otp(NotificationChannel::Sms, "1")
        .await
        .unwrap();

    assert!(!out.success);
    assert!(out.code.is_none());
    assert_eq!(out.message, "Invalid number");
}

#[tokio::test]
async fn alert_body_carries_limit_message() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-alert").json_body(json!({
                "type": "email",
                "contact": "u@x.com",
                "userName": "U",
                "meterType": "water",
                "limit": "5000",
                "message": "Limit set for water: 5000"
            }));
            then.status(200)
                .json_body(json!({ "success": true, "message": "Alert sent" }));
        })
        .await;

    let out = relay(&server, false)
        .send_limit_alert(
            NotificationChannel::Email,
            "u@x.com",
            "U",
            ServiceKind::Water,
            "5000",
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(out.success);
}

#[tokio::test]
async fn feedback_confirmation_posts_form_fields() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/send-feedback-confirmation")
                .json_body(json!({
                    "name": "U",
                    "email": "u@x.com",
                    "servicesUsed": "electricity",
                    "interfaceRating": 5,
                    "overallFeedback": "Great"
                }));
            then.status(200)
                .json_body(json!({ "success": true, "message": "Email sent" }));
        })
        .await;

    let out = relay(&server, false)
        .send_feedback_confirmation("U", "u@x.com", "electricity", 5, "Great")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(out.message, "Email sent");
}

#[tokio::test]
async fn server_error_surfaces_as_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-alert");
            then.status(500);
        })
        .await;

    let err = relay(&server, false)
        .send_limit_alert(
            NotificationChannel::Sms,
            "555",
            "U",
            ServiceKind::Electricity,
            "1",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 500 }));
}

#[tokio::test]
async fn undecodable_reply_surfaces_as_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-feedback-confirmation");
            then.status(200).body("<html>ok</html>");
        })
        .await;

    let err = relay(&server, false)
        .send_feedback_confirmation("U", "u@x.com", "water", 4, "")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn demo_fallback_answers_relay_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(503);
        })
        .await;
    let gateway = relay(&server, true);

    let otp = gateway
        .send_otp(NotificationChannel::Email, "u@x.com")
        .await
        .unwrap();
    assert!(otp.success);
    assert_eq!(otp.message, "Demo OTP sent to u@x.com");
    assert!(otp.code.is_some());

    let alert = gateway
        .send_limit_alert(
            NotificationChannel::Sms,
            "555",
            "U",
            ServiceKind::Electricity,
            "300",
        )
        .await
        .unwrap();
    assert_eq!(alert.message, "Demo alert sent to 555 for electricity limit: 300");

    let conf = gateway
        .send_feedback_confirmation("U", "u@x.com", "water", 4, "")
        .await
        .unwrap();
    assert_eq!(conf.message, "Demo confirmation email sent to u@x.com");
}

#[tokio::test]
async fn unreachable_relay_is_a_transport_error() {
    // Nothing listens on the discard port.
    let gateway = HttpRelayGateway::new(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9/api").unwrap(),
        false,
    );

    let err = gateway
        .send_otp(NotificationChannel::Sms, "555")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
