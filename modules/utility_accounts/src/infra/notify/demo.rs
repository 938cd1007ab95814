use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::contract::model::{Dispatch, NotificationChannel, OtpDispatch, ServiceKind};
use crate::domain::ports::notifications::generate_otp;
use crate::domain::ports::{GatewayError, NotificationGateway};

/// Simulated network latency per message kind.
#[derive(Debug, Clone, Copy)]
pub struct DemoDelays {
    pub otp: Duration,
    pub alert: Duration,
    pub feedback: Duration,
}

impl Default for DemoDelays {
    fn default() -> Self {
        Self {
            otp: Duration::from_millis(1000),
            alert: Duration::from_millis(500),
            feedback: Duration::from_millis(800),
        }
    }
}

impl DemoDelays {
    pub fn none() -> Self {
        Self {
            otp: Duration::ZERO,
            alert: Duration::ZERO,
            feedback: Duration::ZERO,
        }
    }
}

/// Gateway that only logs. Every dispatch succeeds after a short delay.
#[derive(Debug, Clone, Default)]
pub struct DemoNotificationGateway {
    delays: DemoDelays,
}

impl DemoNotificationGateway {
    pub fn new(delays: DemoDelays) -> Self {
        Self { delays }
    }

    pub(crate) fn otp_sent(contact: &str, code: String) -> OtpDispatch {
        OtpDispatch {
            success: true,
            code: Some(code),
            message: format!("Demo OTP sent to {contact}"),
        }
    }

    pub(crate) fn alert_sent(contact: &str, meter_kind: ServiceKind, limit: &str) -> Dispatch {
        Dispatch {
            success: true,
            message: format!("Demo alert sent to {contact} for {meter_kind} limit: {limit}"),
        }
    }

    pub(crate) fn confirmation_sent(email: &str) -> Dispatch {
        Dispatch {
            success: true,
            message: format!("Demo confirmation email sent to {email}"),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl NotificationGateway for DemoNotificationGateway {
    #[instrument(name = "utility_accounts.notify.demo.otp", skip_all, fields(channel = %channel))]
    async fn send_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> Result<OtpDispatch, GatewayError> {
        pause(self.delays.otp).await;
        let code = generate_otp();
        info!(contact = %contact, otp = %code, "Demo OTP issued");
        Ok(Self::otp_sent(contact, code))
    }

    #[instrument(name = "utility_accounts.notify.demo.alert", skip_all, fields(channel = %channel))]
    async fn send_limit_alert(
        &self,
        channel: NotificationChannel,
        contact: &str,
        user_name: &str,
        meter_kind: ServiceKind,
        limit: &str,
    ) -> Result<Dispatch, GatewayError> {
        pause(self.delays.alert).await;
        info!(contact = %contact, user = %user_name, meter = %meter_kind, limit = %limit, "Demo limit alert");
        Ok(Self::alert_sent(contact, meter_kind, limit))
    }

    #[instrument(name = "utility_accounts.notify.demo.feedback", skip_all)]
    async fn send_feedback_confirmation(
        &self,
        name: &str,
        email: &str,
        _services_used: &str,
        interface_rating: u8,
        _overall_feedback: &str,
    ) -> Result<Dispatch, GatewayError> {
        pause(self.delays.feedback).await;
        info!(name = %name, email = %email, rating = interface_rating, "Demo feedback confirmation");
        Ok(Self::confirmation_sent(email))
    }
}
