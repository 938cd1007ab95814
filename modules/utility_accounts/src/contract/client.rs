use async_trait::async_trait;

use crate::contract::model::{
    ActivityRecord, AdminOverview, AlertOutcome, FeedbackForm, FeedbackReceipt, FeedbackRecord,
    LimitSettings, MeterReading, NewAccount, NotificationChannel, OtpDispatch, PaymentRequest,
    ProfilePatch, ServiceKind, SessionUser, TransactionRecord, UserRecord,
};

/// Public API of the utility_accounts module.
///
/// Errors are [`AccountsError`](crate::contract::error::AccountsError) values
/// wrapped in `anyhow`; downcast to branch on them.
#[async_trait]
pub trait UtilityAccountsApi: Send + Sync {
    /// `Ok(false)` for unknown credentials.
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<bool>;

    async fn register(&self, account: NewAccount) -> anyhow::Result<SessionUser>;

    async fn logout(&self) -> anyhow::Result<()>;

    /// `Ok(None)` when nobody is logged in.
    async fn update_profile(&self, patch: ProfilePatch) -> anyhow::Result<Option<SessionUser>>;

    async fn current_user(&self) -> Option<SessionUser>;

    async fn pay_bill(&self, request: PaymentRequest) -> anyhow::Result<TransactionRecord>;

    async fn set_limits(&self, settings: LimitSettings) -> anyhow::Result<Vec<AlertOutcome>>;

    async fn view_meter_reading(
        &self,
        kind: ServiceKind,
        meter_no: &str,
        consumer_name: &str,
    ) -> anyhow::Result<MeterReading>;

    async fn submit_feedback(&self, form: FeedbackForm) -> anyhow::Result<FeedbackReceipt>;

    async fn request_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> anyhow::Result<OtpDispatch>;

    async fn verify_otp(&self, contact: &str, code: &str) -> bool;

    async fn my_transactions(&self) -> anyhow::Result<Vec<TransactionRecord>>;

    async fn my_activities(&self) -> anyhow::Result<Vec<ActivityRecord>>;

    async fn admin_overview(&self) -> anyhow::Result<AdminOverview>;

    async fn admin_users(&self) -> anyhow::Result<Vec<UserRecord>>;

    async fn admin_activities(&self) -> anyhow::Result<Vec<ActivityRecord>>;

    async fn admin_transactions(&self) -> anyhow::Result<Vec<TransactionRecord>>;

    async fn admin_feedbacks(&self) -> anyhow::Result<Vec<FeedbackRecord>>;
}
