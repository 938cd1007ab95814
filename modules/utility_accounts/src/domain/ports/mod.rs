pub mod notifications;

pub use notifications::{GatewayError, NotificationGateway};
