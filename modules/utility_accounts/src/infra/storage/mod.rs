pub mod entity;
pub mod keys;
pub mod kv_repos;
pub mod mapper;

pub use kv_repos::{
    KvActivityRepository, KvFeedbackRepository, KvSessionStore, KvTransactionRepository,
    KvUsersRepository,
};
