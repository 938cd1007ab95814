//! Store keys. These names are shared with existing persisted data and must not change.

pub const REGISTERED_USERS: &str = "registeredUsers";
pub const USER_DATA: &str = "userData";
pub const IS_LOGGED_IN: &str = "isLoggedIn";
pub const IS_ADMIN: &str = "isAdmin";
pub const USER_ACTIVITIES: &str = "userActivities";
pub const USER_TRANSACTIONS: &str = "userTransactions";
pub const USER_FEEDBACKS: &str = "userFeedbacks";
