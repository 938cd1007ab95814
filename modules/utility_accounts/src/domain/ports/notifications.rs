use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{Dispatch, NotificationChannel, OtpDispatch, ServiceKind};

/// Failure to reach or understand the notification relay.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    #[error("Relay request failed: {0}")]
    Transport(String),

    #[error("Relay returned HTTP {status}")]
    Status { status: u16 },

    #[error("Relay response could not be decoded: {0}")]
    Decode(String),
}

/// Transport-agnostic port for OTP, limit-alert and feedback-confirmation
/// dispatch. Every call is best-effort: callers log failures and carry on.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> Result<OtpDispatch, GatewayError>;

    async fn send_limit_alert(
        &self,
        channel: NotificationChannel,
        contact: &str,
        user_name: &str,
        meter_kind: ServiceKind,
        limit: &str,
    ) -> Result<Dispatch, GatewayError>;

    async fn send_feedback_confirmation(
        &self,
        name: &str,
        email: &str,
        services_used: &str,
        interface_rating: u8,
        overall_feedback: &str,
    ) -> Result<Dispatch, GatewayError>;
}

/// Six-digit numeric code in `100000..=999999`.
pub fn generate_otp() -> String {
    use rand::Rng;
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
