use crate::contract::model::{ActivityRecord, FeedbackRecord, SessionUser, TransactionRecord, UserRecord};
use crate::infra::storage::entity::{
    ActivityEntity, FeedbackEntity, SessionUserEntity, TransactionEntity, UserEntity,
};

impl From<UserEntity> for UserRecord {
    fn from(e: UserEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            password: e.password,
            mobile: e.mobile,
            dob: e.dob,
            area: e.area,
            water_meter_no: e.water_meter_no,
            electricity_meter_no: e.electricity_meter_no,
            created_at: e.created_at,
        }
    }
}

impl From<UserRecord> for UserEntity {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            password: r.password,
            mobile: r.mobile,
            dob: r.dob,
            area: r.area,
            water_meter_no: r.water_meter_no,
            electricity_meter_no: r.electricity_meter_no,
            created_at: r.created_at,
        }
    }
}

impl From<SessionUserEntity> for SessionUser {
    fn from(e: SessionUserEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            mobile: e.mobile,
            dob: e.dob,
            area: e.area,
            water_meter_no: e.water_meter_no,
            electricity_meter_no: e.electricity_meter_no,
            created_at: e.created_at,
        }
    }
}

impl From<&SessionUser> for SessionUserEntity {
    fn from(u: &SessionUser) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            mobile: u.mobile.clone(),
            dob: u.dob.clone(),
            area: u.area.clone(),
            water_meter_no: u.water_meter_no.clone(),
            electricity_meter_no: u.electricity_meter_no.clone(),
            created_at: u.created_at,
        }
    }
}

impl From<ActivityEntity> for ActivityRecord {
    fn from(e: ActivityEntity) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            user_name: e.user_name,
            user_email: e.user_email,
            action: e.action,
            details: e.details,
            timestamp: e.timestamp,
            kind: e.kind,
        }
    }
}

impl From<ActivityRecord> for ActivityEntity {
    fn from(r: ActivityRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user_name: r.user_name,
            user_email: r.user_email,
            action: r.action,
            details: r.details,
            timestamp: r.timestamp,
            kind: r.kind,
        }
    }
}

impl From<TransactionEntity> for TransactionRecord {
    fn from(e: TransactionEntity) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            user_name: e.user_name,
            bill_no: e.bill_no,
            amount: e.amount,
            payment_type: e.payment_type,
            service_type: e.service_type,
            status: e.status,
            timestamp: e.timestamp,
            area: e.area,
        }
    }
}

impl From<TransactionRecord> for TransactionEntity {
    fn from(r: TransactionRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user_name: r.user_name,
            bill_no: r.bill_no,
            amount: r.amount,
            payment_type: r.payment_type,
            service_type: r.service_type,
            status: r.status,
            timestamp: r.timestamp,
            area: r.area,
        }
    }
}

impl From<FeedbackEntity> for FeedbackRecord {
    fn from(e: FeedbackEntity) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            name: e.name,
            email: e.email,
            services_used: e.services_used,
            performance: e.performance,
            interface_rating: e.interface_rating,
            overall_feedback: e.overall_feedback,
            created_at: e.created_at,
        }
    }
}

impl From<FeedbackRecord> for FeedbackEntity {
    fn from(r: FeedbackRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            email: r.email,
            services_used: r.services_used,
            performance: r.performance,
            interface_rating: r.interface_rating,
            overall_feedback: r.overall_feedback,
            created_at: r.created_at,
        }
    }
}
