use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Records here are plain values; the persisted JSON shape lives in
// `infra::storage::entity`. The small enums carry serde names because they
// appear verbatim in both the stored records and the relay payloads.

/// Utility a meter, bill or limit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Electricity,
    Water,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Water => "water",
        }
    }

    /// Unit used when reporting limits and consumption.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Electricity => "kWh",
            Self::Water => "L",
        }
    }

    /// Bill numbers that mention `ele` (any case) are electricity bills.
    pub fn from_bill_no(bill_no: &str) -> Self {
        if bill_no.to_lowercase().contains("ele") {
            Self::Electricity
        } else {
            Self::Water
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Payment,
    Feedback,
    Profile,
    Login,
    Registration,
    LimitSetting,
    MeterReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Sms,
    Email,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account as stored in the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub dob: String,
    pub area: String,
    pub water_meter_no: String,
    pub electricity_meter_no: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Drop the password.
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            dob: self.dob.clone(),
            area: self.area.clone(),
            water_meter_no: self.water_meter_no.clone(),
            electricity_meter_no: self.electricity_meter_no.clone(),
            created_at: self.created_at,
        }
    }

    pub fn apply(&mut self, patch: &ProfilePatch) {
        patch.merge_into(
            &mut self.name,
            &mut self.email,
            &mut self.mobile,
            &mut self.dob,
            &mut self.area,
            &mut self.water_meter_no,
            &mut self.electricity_meter_no,
        );
    }
}

/// The currently authenticated identity; never carries a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub dob: String,
    pub area: String,
    pub water_meter_no: String,
    pub electricity_meter_no: String,
    pub created_at: DateTime<Utc>,
}

impl SessionUser {
    pub fn apply(&mut self, patch: &ProfilePatch) {
        patch.merge_into(
            &mut self.name,
            &mut self.email,
            &mut self.mobile,
            &mut self.dob,
            &mut self.area,
            &mut self.water_meter_no,
            &mut self.electricity_meter_no,
        );
    }

    /// Meter number registered for `kind`.
    pub fn meter_no(&self, kind: ServiceKind) -> &str {
        match kind {
            ServiceKind::Electricity => &self.electricity_meter_no,
            ServiceKind::Water => &self.water_meter_no,
        }
    }
}

/// Registration form data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub dob: String,
    pub area: String,
    pub water_meter_no: String,
    pub electricity_meter_no: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub dob: Option<String>,
    pub area: Option<String>,
    pub water_meter_no: Option<String>,
    pub electricity_meter_no: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the supplied fields, in declaration order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("email", self.email.is_some()),
            ("mobile", self.mobile.is_some()),
            ("dob", self.dob.is_some()),
            ("area", self.area.is_some()),
            ("waterMeterNo", self.water_meter_no.is_some()),
            ("electricityMeterNo", self.electricity_meter_no.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn merge_into(
        &self,
        name: &mut String,
        email: &mut String,
        mobile: &mut String,
        dob: &mut String,
        area: &mut String,
        water_meter_no: &mut String,
        electricity_meter_no: &mut String,
    ) {
        let pairs = [
            (&self.name, name),
            (&self.email, email),
            (&self.mobile, mobile),
            (&self.dob, dob),
            (&self.area, area),
            (&self.water_meter_no, water_meter_no),
            (&self.electricity_meter_no, electricity_meter_no),
        ];
        for (src, dst) in pairs {
            if let Some(value) = src {
                dst.clone_from(value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub bill_no: String,
    pub amount: String,
    pub payment_type: String,
    pub service_type: ServiceKind,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub services_used: String,
    pub performance: String,
    pub interface_rating: u8,
    pub overall_feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Bill payment form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentRequest {
    pub bill_no: String,
    pub amount: String,
    pub payment_type: String,
    pub area: String,
}

/// Consumption-limit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitSettings {
    pub electricity_meter_no: String,
    pub electricity_limit: String,
    pub water_meter_no: String,
    pub water_limit: String,
    pub reminder_hours: u32,
    pub snooze_hours: u32,
    pub notify_phone: bool,
    pub notify_email: bool,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            electricity_meter_no: String::new(),
            electricity_limit: String::new(),
            water_meter_no: String::new(),
            water_limit: String::new(),
            reminder_hours: 24,
            snooze_hours: 1,
            notify_phone: true,
            notify_email: true,
        }
    }
}

/// Feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub services_used: String,
    pub performance: String,
    pub interface_rating: u8,
    pub overall_feedback: String,
}

/// Meter snapshot shown by the tracking pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterReading {
    pub kind: ServiceKind,
    pub meter_no: String,
    pub consumer_name: String,
    pub current_reading: String,
    pub last_reading: String,
    pub consumption: String,
    pub bill: String,
    pub status: String,
    pub avg_daily: String,
    pub peak_hours: String,
    pub efficiency: String,
    pub last_update: DateTime<Utc>,
}

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub total_users: usize,
    pub total_feedbacks: usize,
    /// Mean interface rating rounded to one decimal; 0 with no feedback.
    pub avg_rating: f64,
    pub electricity_usage_kwh: u64,
    pub water_usage_liters: u64,
}

impl AdminOverview {
    pub fn total_usage(&self) -> u64 {
        self.electricity_usage_kwh + self.water_usage_liters
    }
}

/// Result of an OTP dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    pub success: bool,
    pub code: Option<String>,
    pub message: String,
}

/// Result of an alert or confirmation dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub success: bool,
    pub message: String,
}

/// Stored feedback plus the outcome of the confirmation email, if it was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReceipt {
    pub record: FeedbackRecord,
    pub confirmation: Option<Dispatch>,
}

/// One limit alert sent (or attempted) after saving limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    pub channel: NotificationChannel,
    pub contact: String,
    pub kind: ServiceKind,
    pub dispatch: Dispatch,
}
