use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::contract::model::{
    ActivityRecord, ActivityType, ServiceKind, SessionUser, TransactionRecord, TransactionStatus,
};
use crate::domain::error::DomainError;
use crate::domain::ids::IdGenerator;
use crate::domain::repo::{ActivityRepository, TransactionRepository};

/// Builds and appends activity records for a user.
#[derive(Clone)]
pub struct ActivityLog {
    repo: Arc<dyn ActivityRepository>,
    ids: Arc<IdGenerator>,
}

impl ActivityLog {
    pub fn new(repo: Arc<dyn ActivityRepository>, ids: Arc<IdGenerator>) -> Self {
        Self { repo, ids }
    }

    pub fn record(
        &self,
        user: &SessionUser,
        action: &str,
        details: String,
        kind: ActivityType,
    ) -> Result<ActivityRecord, DomainError> {
        let now = Utc::now();
        let record = ActivityRecord {
            id: self.ids.next_id(now),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            action: action.to_string(),
            details,
            timestamp: now,
            kind,
        };
        self.repo
            .append(record.clone())
            .map_err(DomainError::storage)?;
        debug!(activity_id = %record.id, kind = ?kind, "Activity recorded");
        Ok(record)
    }

    pub fn query_all(&self) -> Vec<ActivityRecord> {
        self.repo.query_all()
    }

    pub fn query_by_user(&self, user_id: &str) -> Vec<ActivityRecord> {
        self.repo.query_by_user(user_id)
    }
}

/// Payment details captured by the bill payment form.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub bill_no: String,
    pub amount: String,
    pub payment_type: String,
    pub service_type: ServiceKind,
    pub area: String,
}

/// Completed payments. Every logged transaction also yields exactly one
/// `payment` activity.
#[derive(Clone)]
pub struct TransactionLog {
    repo: Arc<dyn TransactionRepository>,
    activities: ActivityLog,
    ids: Arc<IdGenerator>,
}

impl TransactionLog {
    pub fn new(
        repo: Arc<dyn TransactionRepository>,
        activities: ActivityLog,
        ids: Arc<IdGenerator>,
    ) -> Self {
        Self {
            repo,
            activities,
            ids,
        }
    }

    pub fn record(
        &self,
        user: &SessionUser,
        payment: PaymentDetails,
    ) -> Result<TransactionRecord, DomainError> {
        let now = Utc::now();
        let record = TransactionRecord {
            id: self.ids.next_transaction_id(now),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            bill_no: payment.bill_no,
            amount: payment.amount,
            payment_type: payment.payment_type,
            service_type: payment.service_type,
            status: TransactionStatus::Completed,
            timestamp: now,
            area: payment.area,
        };
        self.repo
            .append(record.clone())
            .map_err(DomainError::storage)?;

        // No transaction without its activity.
        if let Err(e) = self.activities.record(
            user,
            "Bill Payment",
            format!("Paid {} bill of {}", record.service_type, record.amount),
            ActivityType::Payment,
        ) {
            if let Err(undo) = self.repo.remove(&record.id) {
                error!(
                    transaction_id = %record.id,
                    error = %format!("{undo:#}"),
                    "Failed to drop transaction without activity"
                );
            }
            return Err(e);
        }

        debug!(transaction_id = %record.id, "Transaction recorded");
        Ok(record)
    }

    pub fn query_all(&self) -> Vec<TransactionRecord> {
        self.repo.query_all()
    }

    pub fn query_by_user(&self, user_id: &str) -> Vec<TransactionRecord> {
        self.repo.query_by_user(user_id)
    }
}
