mod common;

use common::{account, Harness};
use utility_accounts::contract::error::AccountsError;
use utility_accounts::contract::model::{NewAccount, ProfilePatch};

#[tokio::test]
async fn client_round_trip() {
    let h = Harness::new();
    let api = h.accounts.client();

    let user = api.register(account("U", "u@x.com", "pw")).await.unwrap();
    assert_eq!(api.current_user().await.unwrap(), user);

    let updated = api
        .update_profile(ProfilePatch {
            area: Some("east".into()),
            ..ProfilePatch::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.area, "east");

    api.logout().await.unwrap();
    assert!(api.current_user().await.is_none());
    assert!(api.update_profile(ProfilePatch::default()).await.unwrap().is_none());
    assert!(api.login("u@x.com", "pw").await.unwrap());
}

#[tokio::test]
async fn domain_errors_map_to_contract_errors() {
    let h = Harness::new();
    let api = h.accounts.client();

    let err = api.my_activities().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AccountsError>(),
        Some(&AccountsError::Unauthenticated)
    );

    let err = api.register(NewAccount::default()).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AccountsError>(),
        Some(&AccountsError::validation("name is required"))
    );

    api.register(account("U", "u@x.com", "pw")).await.unwrap();
    let err = api.admin_overview().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AccountsError>(),
        Some(&AccountsError::Forbidden)
    );
}

#[tokio::test]
async fn conflict_is_reported_with_email() {
    let h = Harness::with_config(utility_accounts::config::UtilityAccountsConfig {
        enforce_unique_email: true,
        ..Default::default()
    });
    let api = h.accounts.client();
    api.register(account("U", "u@x.com", "pw")).await.unwrap();
    api.logout().await.unwrap();

    let err = api.register(account("V", "u@x.com", "pw2")).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<AccountsError>(),
        Some(&AccountsError::conflict("u@x.com"))
    );
}
