use std::sync::Arc;

use anyhow::Context;
use kv_store::KeyValueStore;
use tracing::{debug, info};
use url::Url;

use crate::config::{NotificationMode, UtilityAccountsConfig};
use crate::contract::client::UtilityAccountsApi;
use crate::domain::credentials::CredentialChain;
use crate::domain::ids::IdGenerator;
use crate::domain::logs::{ActivityLog, TransactionLog};
use crate::domain::ports::NotificationGateway;
use crate::domain::repo::UsersRepository;
use crate::domain::service::{Logs, Service, ServiceConfig};
use crate::domain::session::{SessionManager, SessionPolicy};
use crate::gateways::local::UtilityAccountsLocalClient;
use crate::infra::notify::{DemoNotificationGateway, HttpRelayGateway};
use crate::infra::storage::{
    KvActivityRepository, KvFeedbackRepository, KvSessionStore, KvTransactionRepository,
    KvUsersRepository,
};

/// The assembled module: repositories over one key-value store, the session
/// manager restored from it, and the domain service behind a local client.
#[derive(Clone)]
pub struct UtilityAccounts {
    service: Arc<Service>,
}

impl UtilityAccounts {
    /// Wire the module with the gateway selected by `cfg.notifications`.
    pub fn build(cfg: &UtilityAccountsConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let notifier = notifier_from_config(cfg)?;
        Ok(Self::build_with_notifier(cfg, store, notifier))
    }

    /// Wire the module around an explicit notification gateway.
    pub fn build_with_notifier(
        cfg: &UtilityAccountsConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        info!("Initializing utility_accounts module");
        debug!(
            demo_accounts = cfg.demo_accounts.len(),
            enforce_unique_email = cfg.enforce_unique_email,
            payment_delay_ms = cfg.payment_delay_ms,
            "Loaded utility_accounts config"
        );

        let ids = Arc::new(IdGenerator::new());
        let users: Arc<dyn UsersRepository> = Arc::new(KvUsersRepository::new(store.clone()));
        let activities = ActivityLog::new(
            Arc::new(KvActivityRepository::new(store.clone())),
            ids.clone(),
        );
        let transactions = TransactionLog::new(
            Arc::new(KvTransactionRepository::new(store.clone())),
            activities.clone(),
            ids.clone(),
        );

        let credentials =
            CredentialChain::standard(cfg.admin_identity(), cfg.demo_accounts(), users.clone());
        let session = SessionManager::restore(
            credentials,
            users.clone(),
            Arc::new(KvSessionStore::new(store.clone())),
            activities.clone(),
            ids.clone(),
            SessionPolicy {
                enforce_unique_email: cfg.enforce_unique_email,
            },
        );

        let logs = Logs {
            activities,
            transactions,
            feedback: Arc::new(KvFeedbackRepository::new(store)),
        };
        let service = Service::new(
            Arc::new(session),
            users,
            logs,
            notifier,
            ids,
            ServiceConfig {
                payment_delay: cfg.payment_delay(),
            },
        );

        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for the public API.
    pub fn client(&self) -> Arc<dyn UtilityAccountsApi> {
        Arc::new(UtilityAccountsLocalClient::new(self.service.clone()))
    }
}

fn notifier_from_config(cfg: &UtilityAccountsConfig) -> anyhow::Result<Arc<dyn NotificationGateway>> {
    let notifications = &cfg.notifications;
    match notifications.mode {
        NotificationMode::Demo => Ok(Arc::new(DemoNotificationGateway::new(
            notifications.demo_delays(),
        ))),
        NotificationMode::Relay => {
            let raw = notifications
                .relay_base_url
                .as_deref()
                .context("notifications.relay_base_url is required in relay mode")?;
            let base = Url::parse(raw).with_context(|| format!("Invalid relay URL '{raw}'"))?;
            info!(relay = %base, "Using HTTP notification relay");
            Ok(Arc::new(HttpRelayGateway::new(
                reqwest::Client::new(),
                base,
                notifications.demo_fallback,
            )))
        }
    }
}
