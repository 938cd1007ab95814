mod common;

use common::{account, Harness};
use utility_accounts::contract::model::FeedbackForm;
use utility_accounts::domain::error::DomainError;

fn feedback(email: &str, rating: u8) -> FeedbackForm {
    FeedbackForm {
        name: "N".into(),
        email: email.into(),
        services_used: "water".into(),
        interface_rating: rating,
        ..FeedbackForm::default()
    }
}

#[tokio::test]
async fn overview_aggregates_users_and_ratings() {
    let h = Harness::new();
    let svc = h.service();
    svc.register(account("A", "a@x.com", "pw")).unwrap();
    svc.logout().unwrap();
    svc.register(account("B", "b@x.com", "pw")).unwrap();
    svc.logout().unwrap();
    for rating in [5, 4, 4] {
        svc.submit_feedback(feedback("f@x.com", rating)).await.unwrap();
    }

    assert!(svc.login("admin@smartutility.com", "admin123").unwrap());
    let overview = svc.admin_overview().unwrap();

    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.total_feedbacks, 3);
    assert_eq!(overview.avg_rating, 4.3);
    assert_eq!(overview.electricity_usage_kwh, 272);
    assert_eq!(overview.water_usage_liters, 1132);
    assert_eq!(overview.total_usage(), 1404);
}

#[tokio::test]
async fn overview_with_no_feedback_averages_zero() {
    let h = Harness::new();
    let svc = h.service();
    assert!(svc.login("admin@smartutility.com", "admin123").unwrap());

    let overview = svc.admin_overview().unwrap();
    assert_eq!(overview.total_users, 0);
    assert_eq!(overview.avg_rating, 0.0);
}

#[tokio::test]
async fn admin_lists_are_unfiltered() {
    let h = Harness::new();
    let svc = h.service();
    svc.register(account("A", "a@x.com", "pw")).unwrap();
    svc.logout().unwrap();
    svc.submit_feedback(feedback("f@x.com", 3)).await.unwrap();

    assert!(svc.login("admin@smartutility.com", "admin123").unwrap());

    let users = svc.admin_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].password, "pw");
    // Registration plus the admin's own login.
    assert_eq!(svc.admin_activities().unwrap().len(), 2);
    assert!(svc.admin_transactions().unwrap().is_empty());
    assert_eq!(svc.admin_feedbacks().unwrap().len(), 1);
}

#[test]
fn non_admin_is_denied() {
    let h = Harness::new();
    let svc = h.service();

    assert!(matches!(svc.admin_overview(), Err(DomainError::NotAuthenticated)));

    svc.register(account("A", "a@x.com", "pw")).unwrap();
    assert!(matches!(svc.admin_overview(), Err(DomainError::AccessDenied)));
    assert!(matches!(svc.admin_users(), Err(DomainError::AccessDenied)));
    assert!(matches!(svc.admin_activities(), Err(DomainError::AccessDenied)));
    assert!(matches!(svc.admin_transactions(), Err(DomainError::AccessDenied)));
    assert!(matches!(svc.admin_feedbacks(), Err(DomainError::AccessDenied)));
}
