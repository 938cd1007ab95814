use crate::contract::model::{
    ActivityRecord, FeedbackRecord, ProfilePatch, SessionUser, TransactionRecord, UserRecord,
};

// Ports for the domain layer: persistence operations the domain needs.
//
// Reads never fail: an unreadable collection is reported by the adapter and
// surfaces here as empty. Writes return errors, and a failed write must fail
// the operation that issued it.

/// Registered accounts.
pub trait UsersRepository: Send + Sync {
    /// Append a record. Duplicate emails are accepted.
    fn add(&self, record: UserRecord) -> anyhow::Result<()>;
    /// First record (in insertion order) with this exact email and password.
    fn find_by_credentials(&self, email: &str, password: &str) -> Option<UserRecord>;
    /// First record with this exact email.
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;
    /// Merge `patch` into the first record with `id`. Returns false when no
    /// record matched; that is not an error.
    fn update(&self, id: &str, patch: &ProfilePatch) -> anyhow::Result<bool>;
    fn find_by_id(&self, id: &str) -> Option<UserRecord>;
    /// Overwrite the first record with `record.id`. Returns false when absent.
    fn replace(&self, record: UserRecord) -> anyhow::Result<bool>;
    /// Drop the first record with `id`. Returns false when absent.
    fn remove(&self, id: &str) -> anyhow::Result<bool>;
    fn all(&self) -> Vec<UserRecord>;
}

/// Audit trail of user actions, newest first.
pub trait ActivityRepository: Send + Sync {
    /// Insert at the head of the sequence.
    fn append(&self, record: ActivityRecord) -> anyhow::Result<()>;
    fn query_all(&self) -> Vec<ActivityRecord>;

    fn query_by_user(&self, user_id: &str) -> Vec<ActivityRecord> {
        self.query_all()
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect()
    }
}

/// Completed bill payments, newest first.
pub trait TransactionRepository: Send + Sync {
    /// Insert at the head of the sequence.
    fn append(&self, record: TransactionRecord) -> anyhow::Result<()>;
    /// Drop the transaction with `id`. Returns false when absent.
    fn remove(&self, id: &str) -> anyhow::Result<bool>;
    fn query_all(&self) -> Vec<TransactionRecord>;

    fn query_by_user(&self, user_id: &str) -> Vec<TransactionRecord> {
        self.query_all()
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect()
    }
}

/// Feedback submissions in submission order.
pub trait FeedbackRepository: Send + Sync {
    fn append(&self, record: FeedbackRecord) -> anyhow::Result<()>;
    fn all(&self) -> Vec<FeedbackRecord>;
}

/// What survives a restart of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub user: SessionUser,
    pub is_admin: bool,
}

/// Persistence of the current-session snapshot.
pub trait SessionStore: Send + Sync {
    /// `None` when no session is stored or the stored user is unreadable.
    fn load(&self) -> Option<PersistedSession>;
    /// An interrupted save must not leave a snapshot that `load` accepts.
    fn save(&self, session: &PersistedSession) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}
