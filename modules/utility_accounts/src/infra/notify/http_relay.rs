use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use url::Url;

use crate::contract::model::{Dispatch, NotificationChannel, OtpDispatch, ServiceKind};
use crate::domain::ports::notifications::generate_otp;
use crate::domain::ports::{GatewayError, NotificationGateway};
use crate::infra::notify::demo::DemoNotificationGateway;

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    #[serde(rename = "type")]
    channel: NotificationChannel,
    contact: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertBody<'a> {
    #[serde(rename = "type")]
    channel: NotificationChannel,
    contact: &'a str,
    user_name: &'a str,
    meter_type: ServiceKind,
    limit: &'a str,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackBody<'a> {
    name: &'a str,
    email: &'a str,
    services_used: &'a str,
    interface_rating: u8,
    overall_feedback: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Gateway that POSTs JSON to a notification relay (`/send-otp`,
/// `/send-alert`, `/send-feedback-confirmation`).
///
/// With `demo_fallback` set, a relay failure is logged and answered with the
/// demo result instead of an error.
pub struct HttpRelayGateway {
    client: reqwest::Client,
    base: Url,
    demo_fallback: bool,
}

impl HttpRelayGateway {
    pub fn new(client: reqwest::Client, base: Url, demo_fallback: bool) -> Self {
        Self {
            client,
            base,
            demo_fallback,
        }
    }

    fn endpoint(&self, name: &str) -> Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn post<B: Serialize + ?Sized>(&self, name: &str, body: &B) -> Result<RelayReply, GatewayError> {
        let url = self.endpoint(name)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<RelayReply>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn fall_back<T>(&self, err: GatewayError, demo: impl FnOnce() -> T) -> Result<T, GatewayError> {
        if self.demo_fallback {
            warn!(error = %err, "Relay unavailable, using demo result");
            Ok(demo())
        } else {
            Err(err)
        }
    }
}

#[async_trait]
impl NotificationGateway for HttpRelayGateway {
    #[instrument(
        name = "utility_accounts.http.relay.send_otp",
        skip_all,
        fields(relay = %self.base, channel = %channel)
    )]
    async fn send_otp(
        &self,
        channel: NotificationChannel,
        contact: &str,
    ) -> Result<OtpDispatch, GatewayError> {
        let otp = generate_otp();
        let body = OtpBody {
            channel,
            contact,
            otp: &otp,
        };
        match self.post("send-otp", &body).await {
            Ok(reply) => Ok(OtpDispatch {
                success: reply.success,
                code: reply.success.then(|| otp.clone()),
                message: reply.message,
            }),
            Err(e) => self.fall_back(e, || DemoNotificationGateway::otp_sent(contact, otp.clone())),
        }
    }

    #[instrument(
        name = "utility_accounts.http.relay.send_alert",
        skip_all,
        fields(relay = %self.base, channel = %channel)
    )]
    async fn send_limit_alert(
        &self,
        channel: NotificationChannel,
        contact: &str,
        user_name: &str,
        meter_kind: ServiceKind,
        limit: &str,
    ) -> Result<Dispatch, GatewayError> {
        let body = AlertBody {
            channel,
            contact,
            user_name,
            meter_type: meter_kind,
            limit,
            message: format!("Limit set for {meter_kind}: {limit}"),
        };
        match self.post("send-alert", &body).await {
            Ok(reply) => Ok(Dispatch {
                success: reply.success,
                message: reply.message,
            }),
            Err(e) => self.fall_back(e, || {
                DemoNotificationGateway::alert_sent(contact, meter_kind, limit)
            }),
        }
    }

    #[instrument(name = "utility_accounts.http.relay.send_feedback_confirmation", skip_all, fields(relay = %self.base))]
    async fn send_feedback_confirmation(
        &self,
        name: &str,
        email: &str,
        services_used: &str,
        interface_rating: u8,
        overall_feedback: &str,
    ) -> Result<Dispatch, GatewayError> {
        let body = FeedbackBody {
            name,
            email,
            services_used,
            interface_rating,
            overall_feedback,
        };
        match self.post("send-feedback-confirmation", &body).await {
            Ok(reply) => Ok(Dispatch {
                success: reply.success,
                message: reply.message,
            }),
            Err(e) => self.fall_back(e, || DemoNotificationGateway::confirmation_sent(email)),
        }
    }
}
