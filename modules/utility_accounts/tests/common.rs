#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use kv_store::{KeyValueStore, MemoryStore};
use parking_lot::Mutex;
use utility_accounts::config::UtilityAccountsConfig;
use utility_accounts::contract::model::{
    ActivityRecord, Dispatch, NewAccount, NotificationChannel, OtpDispatch, ServiceKind,
    UserRecord,
};
use utility_accounts::domain::repo::{ActivityRepository, UsersRepository};
use utility_accounts::domain::ports::{GatewayError, NotificationGateway};
use utility_accounts::domain::service::Service;
use utility_accounts::infra::storage::{KvActivityRepository, KvUsersRepository};
use utility_accounts::UtilityAccounts;

/// A message the recording gateway was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Otp {
        channel: NotificationChannel,
        contact: String,
        code: String,
    },
    Alert {
        channel: NotificationChannel,
        contact: String,
        kind: ServiceKind,
        limit: String,
    },
    Confirmation {
        email: String,
        rating: u8,
    },
}

/// Gateway that records every request and optionally fails them all.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<Sent>>,
    fail: Mutex<bool>,
}

impl RecordingGateway {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn fail_all(&self) {
        *self.fail.lock() = true;
    }

    fn check(&self) -> Result<(), GatewayError> {
        if *self.fail.lock() {
            return Err(GatewayError::Transport("relay offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> Result<OtpDispatch, GatewayError> {
        self.check()?;
        let code = "123456".to_string();
        self.sent.lock().push(Sent::Otp {
            channel,
            contact: contact.into(),
            code: code.clone(),
        });
        Ok(OtpDispatch {
            success: true,
            code: Some(code),
            message: format!("sent to {contact}"),
        })
    }

    async fn send_limit_alert(
        &self,
        channel: NotificationChannel,
        contact: &str,
        _user_name: &str,
        meter_kind: ServiceKind,
        limit: &str,
    ) -> Result<Dispatch, GatewayError> {
        self.check()?;
        self.sent.lock().push(Sent::Alert {
            channel,
            contact: contact.into(),
            kind: meter_kind,
            limit: limit.into(),
        });
        Ok(Dispatch {
            success: true,
            message: "ok".into(),
        })
    }

    async fn send_feedback_confirmation(
        &self,
        _name: &str,
        email: &str,
        _services_used: &str,
        interface_rating: u8,
        _overall_feedback: &str,
    ) -> Result<Dispatch, GatewayError> {
        self.check()?;
        self.sent.lock().push(Sent::Confirmation {
            email: email.into(),
            rating: interface_rating,
        });
        Ok(Dispatch {
            success: true,
            message: "ok".into(),
        })
    }
}

/// The module wired over an in-memory store with no simulated delays.
pub struct Harness {
    pub store: Arc<dyn KeyValueStore>,
    pub gateway: Arc<RecordingGateway>,
    pub config: UtilityAccountsConfig,
    pub accounts: UtilityAccounts,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(UtilityAccountsConfig::default())
    }

    pub fn with_config(config: UtilityAccountsConfig) -> Self {
        Self::over_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn over_store(config: UtilityAccountsConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let config = config.without_delays();
        let gateway = Arc::new(RecordingGateway::default());
        let accounts =
            UtilityAccounts::build_with_notifier(&config, store.clone(), gateway.clone());
        Self {
            store,
            gateway,
            config,
            accounts,
        }
    }

    /// A fresh module over the same store, as after a process restart.
    pub fn restart(&self) -> Self {
        Self::over_store(self.config.clone(), self.store.clone())
    }

    pub fn service(&self) -> Arc<Service> {
        self.accounts.service()
    }

    /// Every stored activity, read straight from the store.
    pub fn activities(&self) -> Vec<ActivityRecord> {
        KvActivityRepository::new(self.store.clone()).query_all()
    }

    pub fn directory_record(&self, id: &str) -> UserRecord {
        KvUsersRepository::new(self.store.clone())
            .all()
            .into_iter()
            .find(|u| u.id == id)
            .expect("directory record")
    }
}

pub fn account(name: &str, email: &str, password: &str) -> NewAccount {
    NewAccount {
        name: name.into(),
        email: email.into(),
        password: password.into(),
        mobile: "9000000001".into(),
        dob: "1990-01-01".into(),
        area: "sector-1".into(),
        water_meter_no: "WAT001".into(),
        electricity_meter_no: "ELE001".into(),
    }
}

/// The account used by the documented registration scenario.
pub fn scenario_account() -> NewAccount {
    NewAccount {
        name: "A".into(),
        email: "a@x.com".into(),
        password: "p1".into(),
        area: "sector-1".into(),
        water_meter_no: "W1".into(),
        electricity_meter_no: "E1".into(),
        ..NewAccount::default()
    }
}
