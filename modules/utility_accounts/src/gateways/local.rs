use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UtilityAccountsApi,
    error::AccountsError,
    model::{
        ActivityRecord, AdminOverview, AlertOutcome, FeedbackForm, FeedbackReceipt,
        FeedbackRecord, LimitSettings, MeterReading, NewAccount, NotificationChannel,
        OtpDispatch, PaymentRequest, ProfilePatch, ServiceKind, SessionUser, TransactionRecord,
        UserRecord,
    },
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the UtilityAccountsApi trait that delegates to the domain service
pub struct UtilityAccountsLocalClient {
    service: Arc<Service>,
}

impl UtilityAccountsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UtilityAccountsApi for UtilityAccountsLocalClient {
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        self.service.login(email, password).map_err(map_domain_error)
    }

    async fn register(&self, account: NewAccount) -> anyhow::Result<SessionUser> {
        self.service.register(account).map_err(map_domain_error)
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.service.logout().map_err(map_domain_error)
    }

    async fn update_profile(&self, patch: ProfilePatch) -> anyhow::Result<Option<SessionUser>> {
        self.service.update_profile(patch).map_err(map_domain_error)
    }

    async fn current_user(&self) -> Option<SessionUser> {
        self.service.current_user()
    }

    async fn pay_bill(&self, request: PaymentRequest) -> anyhow::Result<TransactionRecord> {
        self.service.pay_bill(request).await.map_err(map_domain_error)
    }

    async fn set_limits(&self, settings: LimitSettings) -> anyhow::Result<Vec<AlertOutcome>> {
        self.service.set_limits(settings).await.map_err(map_domain_error)
    }

    async fn view_meter_reading(
        &self,
        kind: ServiceKind,
        meter_no: &str,
        consumer_name: &str,
    ) -> anyhow::Result<MeterReading> {
        self.service
            .view_meter_reading(kind, meter_no, consumer_name)
            .map_err(map_domain_error)
    }

    async fn submit_feedback(&self, form: FeedbackForm) -> anyhow::Result<FeedbackReceipt> {
        self.service.submit_feedback(form).await.map_err(map_domain_error)
    }

    async fn request_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> anyhow::Result<OtpDispatch> {
        self.service
            .request_otp(channel, contact)
            .await
            .map_err(map_domain_error)
    }

    async fn verify_otp(&self, contact: &str, code: &str) -> bool {
        self.service.verify_otp(contact, code)
    }

    async fn my_transactions(&self) -> anyhow::Result<Vec<TransactionRecord>> {
        self.service.my_transactions().map_err(map_domain_error)
    }

    async fn my_activities(&self) -> anyhow::Result<Vec<ActivityRecord>> {
        self.service.my_activities().map_err(map_domain_error)
    }

    async fn admin_overview(&self) -> anyhow::Result<AdminOverview> {
        self.service.admin_overview().map_err(map_domain_error)
    }

    async fn admin_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        self.service.admin_users().map_err(map_domain_error)
    }

    async fn admin_activities(&self) -> anyhow::Result<Vec<ActivityRecord>> {
        self.service.admin_activities().map_err(map_domain_error)
    }

    async fn admin_transactions(&self) -> anyhow::Result<Vec<TransactionRecord>> {
        self.service.admin_transactions().map_err(map_domain_error)
    }

    async fn admin_feedbacks(&self) -> anyhow::Result<Vec<FeedbackRecord>> {
        self.service.admin_feedbacks().map_err(map_domain_error)
    }
}

impl From<DomainError> for AccountsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::MissingField { field } => {
                AccountsError::validation(format!("{field} is required"))
            }
            DomainError::InvalidEmail { email } => {
                AccountsError::validation(format!("Invalid email: {email}"))
            }
            DomainError::InvalidAmount { amount } => {
                AccountsError::validation(format!("Invalid amount: {amount}"))
            }
            DomainError::InvalidRating { value } => AccountsError::validation(format!(
                "Interface rating must be between 1 and 5, got {value}"
            )),
            e @ DomainError::MeterMismatch { .. } => AccountsError::validation(e.to_string()),
            DomainError::EmailAlreadyExists { email } => AccountsError::conflict(email),
            DomainError::NotAuthenticated => AccountsError::unauthenticated(),
            DomainError::AccessDenied => AccountsError::forbidden(),
            DomainError::Storage { message } => {
                tracing::error!(error = %message, "Storage failure");
                AccountsError::internal()
            }
        }
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error(domain_error: DomainError) -> anyhow::Error {
    anyhow::Error::new(AccountsError::from(domain_error))
}
