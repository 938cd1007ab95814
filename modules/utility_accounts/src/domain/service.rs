use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    ActivityRecord, ActivityType, AdminOverview, AlertOutcome, Dispatch, FeedbackForm,
    FeedbackReceipt, FeedbackRecord, LimitSettings, MeterReading, NewAccount,
    NotificationChannel, OtpDispatch, PaymentRequest, ProfilePatch, ServiceKind, SessionUser,
    TransactionRecord, UserRecord,
};
use crate::domain::error::{require, DomainError};
use crate::domain::ids::IdGenerator;
use crate::domain::logs::{ActivityLog, PaymentDetails, TransactionLog};
use crate::domain::meter::{
    sample_reading, SAMPLE_ELECTRICITY_KWH_PER_USER, SAMPLE_WATER_LITERS_PER_USER,
};
use crate::domain::ports::NotificationGateway;
use crate::domain::repo::{FeedbackRepository, UsersRepository};
use crate::domain::session::SessionManager;

/// `userId` stored on feedback submitted without a session.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Simulated payment processing time.
    pub payment_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            payment_delay: Duration::from_millis(2000),
        }
    }
}

/// The audit trails the service writes to.
#[derive(Clone)]
pub struct Logs {
    pub activities: ActivityLog,
    pub transactions: TransactionLog,
    pub feedback: Arc<dyn FeedbackRepository>,
}

/// Domain service for the utility flows: payments, limits, meter readings,
/// feedback, OTP checks and the admin dashboard. Session operations are
/// delegated to the [`SessionManager`].
///
/// Local state is committed before any notification is dispatched, and a
/// failed dispatch never undoes it.
#[derive(Clone)]
pub struct Service {
    session: Arc<SessionManager>,
    users: Arc<dyn UsersRepository>,
    logs: Logs,
    notifier: Arc<dyn NotificationGateway>,
    otps: Arc<Mutex<HashMap<String, String>>>,
    ids: Arc<IdGenerator>,
    config: ServiceConfig,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        session: Arc<SessionManager>,
        users: Arc<dyn UsersRepository>,
        logs: Logs,
        notifier: Arc<dyn NotificationGateway>,
        ids: Arc<IdGenerator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            session,
            users,
            logs,
            notifier,
            otps: Arc::new(Mutex::new(HashMap::new())),
            ids,
            config,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // --- session ---

    pub fn login(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        self.session.login(email, password)
    }

    pub fn register(&self, account: NewAccount) -> Result<SessionUser, DomainError> {
        self.session.register(account)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.session.logout()
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Option<SessionUser>, DomainError> {
        self.session.update_profile(patch)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    // --- OTP ---

    /// Send a one-time code. Dispatch failures come back as an unsuccessful
    /// result, never as an error.
    #[instrument(name = "utility_accounts.service.request_otp", skip(self), fields(channel = %channel))]
    pub async fn request_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> Result<OtpDispatch, DomainError> {
        require("contact", contact)?;

        match self.notifier.send_otp(channel, contact).await {
            Ok(dispatch) => {
                if let (true, Some(code)) = (dispatch.success, dispatch.code.as_ref()) {
                    self.otps.lock().insert(contact.to_string(), code.clone());
                }
                Ok(dispatch)
            }
            Err(e) => {
                warn!(error = %e, "OTP dispatch failed (continuing)");
                Ok(OtpDispatch {
                    success: false,
                    code: None,
                    message: "Failed to send OTP. Please try again.".to_string(),
                })
            }
        }
    }

    /// Check a code issued to `contact`; a matching code is consumed.
    pub fn verify_otp(&self, contact: &str, code: &str) -> bool {
        let mut otps = self.otps.lock();
        match otps.get(contact) {
            Some(expected) if expected == code.trim() => {
                otps.remove(contact);
                true
            }
            _ => false,
        }
    }

    // --- payments ---

    #[instrument(
        name = "utility_accounts.service.pay_bill",
        skip(self, request),
        fields(bill_no = %request.bill_no)
    )]
    pub async fn pay_bill(&self, request: PaymentRequest) -> Result<TransactionRecord, DomainError> {
        let user = self.session.require_user()?;

        require("billNo", &request.bill_no)?;
        require("amount", &request.amount)?;
        require("paymentType", &request.payment_type)?;
        validate_amount(&request.amount)?;

        let service_type = ServiceKind::from_bill_no(&request.bill_no);
        if request.bill_no != user.electricity_meter_no && request.bill_no != user.water_meter_no {
            return Err(DomainError::meter_mismatch(service_type, request.bill_no));
        }

        if !self.config.payment_delay.is_zero() {
            debug!(delay_ms = self.config.payment_delay.as_millis() as u64, "Processing payment");
            tokio::time::sleep(self.config.payment_delay).await;
        }

        let record = self.logs.transactions.record(
            &user,
            PaymentDetails {
                bill_no: request.bill_no,
                amount: request.amount,
                payment_type: request.payment_type,
                service_type,
                area: request.area,
            },
        )?;

        info!(transaction_id = %record.id, "Bill paid");
        Ok(record)
    }

    // --- limits ---

    #[instrument(name = "utility_accounts.service.set_limits", skip(self, settings))]
    pub async fn set_limits(&self, settings: LimitSettings) -> Result<Vec<AlertOutcome>, DomainError> {
        let user = self.session.require_user()?;

        if settings.electricity_meter_no != user.electricity_meter_no {
            return Err(DomainError::meter_mismatch(
                ServiceKind::Electricity,
                settings.electricity_meter_no,
            ));
        }
        if settings.water_meter_no != user.water_meter_no {
            return Err(DomainError::meter_mismatch(
                ServiceKind::Water,
                settings.water_meter_no,
            ));
        }
        require("electricityLimit", &settings.electricity_limit)?;

        self.logs.activities.record(
            &user,
            "Limit Settings Updated",
            format!(
                "Set electricity limit: {} kWh, water limit: {} L",
                settings.electricity_limit, settings.water_limit
            ),
            ActivityType::LimitSetting,
        )?;
        info!(
            reminder_hours = settings.reminder_hours,
            snooze_hours = settings.snooze_hours,
            "Limits saved"
        );

        let mut contacts = Vec::new();
        if settings.notify_phone && !user.mobile.is_empty() {
            contacts.push((NotificationChannel::Sms, user.mobile.clone()));
        }
        if settings.notify_email && !user.email.is_empty() {
            contacts.push((NotificationChannel::Email, user.email.clone()));
        }

        let mut outcomes = Vec::new();
        for (channel, contact) in contacts {
            let mut limits = vec![(ServiceKind::Electricity, &settings.electricity_limit)];
            if !settings.water_limit.is_empty() {
                limits.push((ServiceKind::Water, &settings.water_limit));
            }
            for (kind, limit) in limits {
                let dispatch = match self
                    .notifier
                    .send_limit_alert(channel, &contact, &user.name, kind, limit)
                    .await
                {
                    Ok(d) => d,
                    Err(e) => {
                        warn!(error = %e, channel = %channel, "Limit alert failed (continuing)");
                        Dispatch {
                            success: false,
                            message: e.to_string(),
                        }
                    }
                };
                outcomes.push(AlertOutcome {
                    channel,
                    contact: contact.clone(),
                    kind,
                    dispatch,
                });
            }
        }

        Ok(outcomes)
    }

    // --- meter readings ---

    /// Anonymous callers get the reading without an activity entry.
    #[instrument(name = "utility_accounts.service.view_meter_reading", skip(self))]
    pub fn view_meter_reading(
        &self,
        kind: ServiceKind,
        meter_no: &str,
        consumer_name: &str,
    ) -> Result<MeterReading, DomainError> {
        if let Some(user) = self.session.current_user() {
            let action = match kind {
                ServiceKind::Electricity => "Electricity Reading Viewed",
                ServiceKind::Water => "Water Reading Viewed",
            };
            self.logs.activities.record(
                &user,
                action,
                format!("Viewed {kind} meter reading for {meter_no}"),
                ActivityType::MeterReading,
            )?;
        }
        Ok(sample_reading(kind, meter_no, consumer_name))
    }

    // --- feedback ---

    #[instrument(name = "utility_accounts.service.submit_feedback", skip(self, form))]
    pub async fn submit_feedback(&self, form: FeedbackForm) -> Result<FeedbackReceipt, DomainError> {
        require("name", &form.name)?;
        require("email", &form.email)?;
        require("servicesUsed", &form.services_used)?;
        if !(1..=5).contains(&form.interface_rating) {
            return Err(DomainError::invalid_rating(form.interface_rating));
        }

        let user = self.session.current_user();
        let now = Utc::now();
        let record = FeedbackRecord {
            id: self.ids.next_id(now),
            user_id: user
                .as_ref()
                .map(|u| u.id.clone())
                .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string()),
            name: form.name,
            email: form.email,
            services_used: form.services_used,
            performance: form.performance,
            interface_rating: form.interface_rating,
            overall_feedback: form.overall_feedback,
            created_at: now,
        };
        self.logs
            .feedback
            .append(record.clone())
            .map_err(DomainError::storage)?;

        if let Some(user) = &user {
            self.logs.activities.record(
                user,
                "Feedback Submitted",
                format!(
                    "Submitted feedback for {} with {}/5 rating",
                    record.services_used, record.interface_rating
                ),
                ActivityType::Feedback,
            )?;
        }

        let confirmation = match self
            .notifier
            .send_feedback_confirmation(
                &record.name,
                &record.email,
                &record.services_used,
                record.interface_rating,
                &record.overall_feedback,
            )
            .await
        {
            Ok(d) => Some(d),
            Err(e) => {
                warn!(error = %e, "Feedback confirmation failed (continuing)");
                None
            }
        };

        info!(feedback_id = %record.id, "Feedback stored");
        Ok(FeedbackReceipt {
            record,
            confirmation,
        })
    }

    // --- history ---

    pub fn my_transactions(&self) -> Result<Vec<TransactionRecord>, DomainError> {
        let user = self.session.require_user()?;
        Ok(self.logs.transactions.query_by_user(&user.id))
    }

    pub fn my_activities(&self) -> Result<Vec<ActivityRecord>, DomainError> {
        let user = self.session.require_user()?;
        Ok(self.logs.activities.query_by_user(&user.id))
    }

    // --- admin ---

    #[instrument(name = "utility_accounts.service.admin_overview", skip(self))]
    pub fn admin_overview(&self) -> Result<AdminOverview, DomainError> {
        self.session.require_admin()?;

        let users = self.users.all().len();
        let feedback = self.logs.feedback.all();
        let avg_rating = if feedback.is_empty() {
            0.0
        } else {
            let sum: u32 = feedback.iter().map(|f| u32::from(f.interface_rating)).sum();
            (f64::from(sum) / feedback.len() as f64 * 10.0).round() / 10.0
        };

        Ok(AdminOverview {
            total_users: users,
            total_feedbacks: feedback.len(),
            avg_rating,
            electricity_usage_kwh: users as u64 * SAMPLE_ELECTRICITY_KWH_PER_USER,
            water_usage_liters: users as u64 * SAMPLE_WATER_LITERS_PER_USER,
        })
    }

    pub fn admin_users(&self) -> Result<Vec<UserRecord>, DomainError> {
        self.session.require_admin()?;
        Ok(self.users.all())
    }

    pub fn admin_activities(&self) -> Result<Vec<ActivityRecord>, DomainError> {
        self.session.require_admin()?;
        Ok(self.logs.activities.query_all())
    }

    pub fn admin_transactions(&self) -> Result<Vec<TransactionRecord>, DomainError> {
        self.session.require_admin()?;
        Ok(self.logs.transactions.query_all())
    }

    pub fn admin_feedbacks(&self) -> Result<Vec<FeedbackRecord>, DomainError> {
        self.session.require_admin()?;
        Ok(self.logs.feedback.all())
    }
}

fn validate_amount(amount: &str) -> Result<(), DomainError> {
    let cleaned: String = amount
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(DomainError::invalid_amount(amount)),
    }
}
