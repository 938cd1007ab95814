pub mod demo;
pub mod http_relay;

pub use demo::{DemoDelays, DemoNotificationGateway};
pub use http_relay::HttpRelayGateway;
