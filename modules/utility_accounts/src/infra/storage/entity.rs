use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::model::{ActivityType, ServiceKind, TransactionStatus};

// Persisted JSON shapes. Field names are camelCase on disk; text fields
// default to empty so older records with missing keys still load. User
// records written by the first web release used snake_case for the meter
// numbers and the creation time, hence the aliases.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, alias = "water_meter_no")]
    pub water_meter_no: String,
    #[serde(default, alias = "electricity_meter_no")]
    pub electricity_meter_no: String,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// `userData`: the session user, without a password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, alias = "water_meter_no")]
    pub water_meter_no: String,
    #[serde(default, alias = "electricity_meter_no")]
    pub electricity_meter_no: String,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntity {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntity {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub bill_no: String,
    pub amount: String,
    pub payment_type: String,
    pub service_type: ServiceKind,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub area: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntity {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub services_used: String,
    #[serde(default)]
    pub performance: String,
    pub interface_rating: u8,
    #[serde(default)]
    pub overall_feedback: String,
    pub created_at: DateTime<Utc>,
}
