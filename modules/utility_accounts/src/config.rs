use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::credentials::{AdminIdentity, DemoAccount};
use crate::infra::notify::DemoDelays;

/// Configuration for the utility_accounts module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtilityAccountsConfig {
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default = "default_demo_accounts")]
    pub demo_accounts: Vec<DemoAccountConfig>,
    /// Reject registration when the email is already registered.
    #[serde(default)]
    pub enforce_unique_email: bool,
    #[serde(default = "default_payment_delay_ms")]
    pub payment_delay_ms: u64,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Default for UtilityAccountsConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig::default(),
            demo_accounts: default_demo_accounts(),
            enforce_unique_email: false,
            payment_delay_ms: default_payment_delay_ms(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl UtilityAccountsConfig {
    /// Zero every simulated delay.
    pub fn without_delays(mut self) -> Self {
        self.payment_delay_ms = 0;
        self.notifications.otp_delay_ms = 0;
        self.notifications.alert_delay_ms = 0;
        self.notifications.feedback_delay_ms = 0;
        self
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    pub fn admin_identity(&self) -> AdminIdentity {
        AdminIdentity {
            email: self.admin.email.clone(),
            password: self.admin.password.clone(),
            name: self.admin.name.clone(),
        }
    }

    pub fn demo_accounts(&self) -> Vec<DemoAccount> {
        self.demo_accounts.iter().map(DemoAccount::from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        let admin = AdminIdentity::default();
        Self {
            email: admin.email,
            password: admin.password,
            name: admin.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoAccountConfig {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub water_meter_no: String,
    #[serde(default)]
    pub electricity_meter_no: String,
}

impl From<&DemoAccountConfig> for DemoAccount {
    fn from(c: &DemoAccountConfig) -> Self {
        Self {
            id: c.id.clone(),
            email: c.email.clone(),
            password: c.password.clone(),
            name: c.name.clone(),
            mobile: c.mobile.clone(),
            area: c.area.clone(),
            water_meter_no: c.water_meter_no.clone(),
            electricity_meter_no: c.electricity_meter_no.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    #[default]
    Demo,
    Relay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub mode: NotificationMode,
    /// Required in relay mode, e.g. `http://localhost:3001/api`.
    #[serde(default)]
    pub relay_base_url: Option<String>,
    /// Answer relay failures with the demo result.
    #[serde(default = "default_true")]
    pub demo_fallback: bool,
    #[serde(default = "default_otp_delay_ms")]
    pub otp_delay_ms: u64,
    #[serde(default = "default_alert_delay_ms")]
    pub alert_delay_ms: u64,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            mode: NotificationMode::Demo,
            relay_base_url: None,
            demo_fallback: true,
            otp_delay_ms: default_otp_delay_ms(),
            alert_delay_ms: default_alert_delay_ms(),
            feedback_delay_ms: default_feedback_delay_ms(),
        }
    }
}

impl NotificationsConfig {
    pub fn demo_delays(&self) -> DemoDelays {
        DemoDelays {
            otp: Duration::from_millis(self.otp_delay_ms),
            alert: Duration::from_millis(self.alert_delay_ms),
            feedback: Duration::from_millis(self.feedback_delay_ms),
        }
    }
}

fn default_demo_accounts() -> Vec<DemoAccountConfig> {
    vec![DemoAccountConfig {
        id: "demo-1".to_string(),
        email: "demo@smartutility.com".to_string(),
        password: "demo123".to_string(),
        name: "Demo User".to_string(),
        mobile: "9876543210".to_string(),
        area: "Sector 21".to_string(),
        water_meter_no: "WAT789012".to_string(),
        electricity_meter_no: "ELE123456".to_string(),
    }]
}

fn default_admin_name() -> String {
    AdminIdentity::default().name
}

fn default_payment_delay_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_otp_delay_ms() -> u64 {
    1000
}

fn default_alert_delay_ms() -> u64 {
    500
}

fn default_feedback_delay_ms() -> u64 {
    800
}
