use std::sync::Arc;

use chrono::Utc;

use crate::contract::model::SessionUser;
use crate::domain::repo::UsersRepository;

/// Session id of the reserved admin identity. Directory ids are numeric and
/// demo ids are configured, so this never collides with a stored account.
pub const ADMIN_USER_ID: &str = "admin";

/// The single hardcoded admin credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminIdentity {
    fn default() -> Self {
        Self {
            email: "admin@smartutility.com".to_string(),
            password: "admin123".to_string(),
            name: "Admin User".to_string(),
        }
    }
}

impl AdminIdentity {
    fn session_user(&self) -> SessionUser {
        SessionUser {
            id: ADMIN_USER_ID.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: String::new(),
            dob: String::new(),
            area: String::new(),
            water_meter_no: String::new(),
            electricity_meter_no: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// A seeded demo account with its fabricated profile. Not stored in the
/// user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccount {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub mobile: String,
    pub area: String,
    pub water_meter_no: String,
    pub electricity_meter_no: String,
}

impl DemoAccount {
    fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            dob: String::new(),
            area: self.area.clone(),
            water_meter_no: self.water_meter_no.clone(),
            electricity_meter_no: self.electricity_meter_no.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Which source accepted a credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    ReservedAdmin,
    SeededDemoAccount,
    DirectoryAccount,
}

impl IdentityKind {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::ReservedAdmin)
    }
}

/// One place credentials can be checked against.
#[derive(Clone)]
pub enum CredentialSource {
    ReservedAdmin(AdminIdentity),
    SeededDemoAccount(Vec<DemoAccount>),
    DirectoryAccount(Arc<dyn UsersRepository>),
}

impl CredentialSource {
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::ReservedAdmin(_) => IdentityKind::ReservedAdmin,
            Self::SeededDemoAccount(_) => IdentityKind::SeededDemoAccount,
            Self::DirectoryAccount(_) => IdentityKind::DirectoryAccount,
        }
    }

    /// Exact email + password match.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<SessionUser> {
        match self {
            Self::ReservedAdmin(admin) => (admin.email == email && admin.password == password)
                .then(|| admin.session_user()),
            Self::SeededDemoAccount(accounts) => accounts
                .iter()
                .find(|a| a.email == email && a.password == password)
                .map(DemoAccount::session_user),
            Self::DirectoryAccount(users) => users
                .find_by_credentials(email, password)
                .map(|record| record.to_session_user()),
        }
    }
}

/// Credential sources tried in priority order; the first match wins.
#[derive(Clone)]
pub struct CredentialChain {
    sources: Vec<CredentialSource>,
}

impl CredentialChain {
    /// Reserved admin, then seeded demo accounts, then the user directory.
    pub fn standard(
        admin: AdminIdentity,
        demo_accounts: Vec<DemoAccount>,
        users: Arc<dyn UsersRepository>,
    ) -> Self {
        Self {
            sources: vec![
                CredentialSource::ReservedAdmin(admin),
                CredentialSource::SeededDemoAccount(demo_accounts),
                CredentialSource::DirectoryAccount(users),
            ],
        }
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Option<(IdentityKind, SessionUser)> {
        self.sources
            .iter()
            .find_map(|source| source.authenticate(email, password).map(|u| (source.kind(), u)))
    }

    /// True when `user` is the reserved admin identity.
    pub fn is_reserved_admin(user: &SessionUser) -> bool {
        user.id == ADMIN_USER_ID
    }
}
