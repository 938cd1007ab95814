pub mod credentials;
pub mod error;
pub mod ids;
pub mod logs;
pub mod meter;
pub mod ports;
pub mod repo;
pub mod service;
pub mod session;
