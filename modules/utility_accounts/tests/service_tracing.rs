//! The service layer emits named spans and events for each operation.

mod common;

use common::{account, Harness};
use tracing_test::traced_test;
use utility_accounts::contract::model::{NotificationChannel, PaymentRequest};

#[traced_test]
#[test]
fn login_emits_span_and_event() {
    let h = Harness::new();
    assert!(h.service().login("admin@smartutility.com", "admin123").unwrap());

    assert!(logs_contain("utility_accounts.session.login"));
    assert!(logs_contain("User logged in"));
    assert!(!logs_contain("admin123"));
}

#[traced_test]
#[test]
fn register_emits_span() {
    let h = Harness::new();
    h.service().register(account("U", "u@x.com", "pw")).unwrap();

    assert!(logs_contain("utility_accounts.session.register"));
    assert!(logs_contain("User registered"));
}

#[traced_test]
#[tokio::test]
async fn pay_bill_emits_span_with_bill_no() {
    let h = Harness::new();
    let svc = h.service();
    svc.register(account("U", "u@x.com", "pw")).unwrap();

    svc.pay_bill(PaymentRequest {
        bill_no: "ELE001".into(),
        amount: "100".into(),
        payment_type: "card".into(),
        area: String::new(),
    })
    .await
    .unwrap();

    assert!(logs_contain("utility_accounts.service.pay_bill"));
    assert!(logs_contain("bill_no=ELE001"));
    assert!(logs_contain("Bill paid"));
}

#[traced_test]
#[tokio::test]
async fn swallowed_dispatch_failure_is_logged() {
    let h = Harness::new();
    h.gateway.fail_all();

    let out = h
        .service()
        .request_otp(NotificationChannel::Sms, "555")
        .await
        .unwrap();

    assert!(!out.success);
    assert!(logs_contain("utility_accounts.service.request_otp"));
    assert!(logs_contain("OTP dispatch failed"));
}
