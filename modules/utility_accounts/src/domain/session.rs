use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::contract::model::{ActivityType, NewAccount, ProfilePatch, SessionUser, UserRecord};
use crate::domain::credentials::CredentialChain;
use crate::domain::error::{require, DomainError};
use crate::domain::ids::IdGenerator;
use crate::domain::logs::ActivityLog;
use crate::domain::repo::{PersistedSession, SessionStore, UsersRepository};

/// Current-session state. There is no terminal state; the process just ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { user: SessionUser, is_admin: bool },
}

impl Session {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user, .. } => Some(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { is_admin: true, .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionPolicy {
    /// Reject registration when the email is already in the directory.
    pub enforce_unique_email: bool,
}

/// Owns the single current session and mediates every mutation of the user
/// directory.
///
/// Mutations hold the session write lock for their whole duration, so they
/// are applied one at a time. The in-memory session only changes after every
/// write of the operation succeeded; when a later write fails, the earlier
/// ones are undone so a restart sees the state from before the call.
pub struct SessionManager {
    state: RwLock<Session>,
    credentials: CredentialChain,
    users: Arc<dyn UsersRepository>,
    store: Arc<dyn SessionStore>,
    activities: ActivityLog,
    ids: Arc<IdGenerator>,
    policy: SessionPolicy,
}

impl SessionManager {
    /// Build the manager and restore a persisted session, if one is readable.
    pub fn restore(
        credentials: CredentialChain,
        users: Arc<dyn UsersRepository>,
        store: Arc<dyn SessionStore>,
        activities: ActivityLog,
        ids: Arc<IdGenerator>,
        policy: SessionPolicy,
    ) -> Self {
        let state = match store.load() {
            Some(persisted) => {
                let is_admin = CredentialChain::is_reserved_admin(&persisted.user);
                if is_admin != persisted.is_admin {
                    warn!(
                        user_id = %persisted.user.id,
                        stored = persisted.is_admin,
                        derived = is_admin,
                        "Stored admin flag disagrees with identity, using derived value"
                    );
                }
                info!(user_id = %persisted.user.id, "Restored persisted session");
                Session::Authenticated {
                    user: persisted.user,
                    is_admin,
                }
            }
            None => Session::Anonymous,
        };

        Self {
            state: RwLock::new(state),
            credentials,
            users,
            store,
            activities,
            ids,
            policy,
        }
    }

    pub fn session(&self) -> Session {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin()
    }

    pub fn require_user(&self) -> Result<SessionUser, DomainError> {
        self.current_user().ok_or_else(DomainError::not_authenticated)
    }

    pub fn require_admin(&self) -> Result<SessionUser, DomainError> {
        let state = self.state.read();
        match &*state {
            Session::Authenticated {
                user,
                is_admin: true,
            } => Ok(user.clone()),
            Session::Authenticated { .. } => Err(DomainError::access_denied()),
            Session::Anonymous => Err(DomainError::not_authenticated()),
        }
    }

    /// Returns `Ok(false)` for unknown credentials; the caller cannot tell a
    /// wrong email from a wrong password.
    #[instrument(name = "utility_accounts.session.login", skip(self, password), fields(email = %email))]
    pub fn login(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write();

        let Some((kind, user)) = self.credentials.authenticate(email, password) else {
            debug!("Credentials rejected");
            return Ok(false);
        };
        let is_admin = kind.is_admin();

        let committed = self.persist(&user, is_admin).and_then(|()| {
            self.activities.record(
                &user,
                "User Login",
                format!("Logged in as {}", user.email),
                ActivityType::Login,
            )
        });
        if let Err(e) = committed {
            self.restore_snapshot(&state);
            return Err(e);
        }

        info!(user_id = %user.id, identity = ?kind, "User logged in");
        *state = Session::Authenticated { user, is_admin };
        Ok(true)
    }

    #[instrument(
        name = "utility_accounts.session.register",
        skip(self, account),
        fields(email = %account.email)
    )]
    pub fn register(&self, account: NewAccount) -> Result<SessionUser, DomainError> {
        let mut state = self.state.write();

        validate_new_account(&account)?;
        if self.policy.enforce_unique_email && self.users.find_by_email(&account.email).is_some() {
            return Err(DomainError::email_already_exists(account.email));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: self.ids.next_id(now),
            name: account.name,
            email: account.email,
            password: account.password,
            mobile: account.mobile,
            dob: account.dob,
            area: account.area,
            water_meter_no: account.water_meter_no,
            electricity_meter_no: account.electricity_meter_no,
            created_at: now,
        };
        let user = record.to_session_user();

        self.users.add(record).map_err(DomainError::storage)?;
        let committed = self.persist(&user, false).and_then(|()| {
            self.activities.record(
                &user,
                "Account Registered",
                format!("Registered new account for {}", user.email),
                ActivityType::Registration,
            )
        });
        if let Err(e) = committed {
            self.restore_snapshot(&state);
            if let Err(undo) = self.users.remove(&user.id) {
                error!(
                    user_id = %user.id,
                    error = %format!("{undo:#}"),
                    "Failed to drop half-registered account"
                );
            }
            return Err(e);
        }

        info!(user_id = %user.id, "User registered");
        *state = Session::Authenticated {
            user: user.clone(),
            is_admin: false,
        };
        Ok(user)
    }

    /// Ends the session. No activity is recorded for logout.
    #[instrument(name = "utility_accounts.session.logout", skip(self))]
    pub fn logout(&self) -> Result<(), DomainError> {
        let mut state = self.state.write();
        self.store.clear().map_err(DomainError::storage)?;
        if let Some(user) = state.user() {
            info!(user_id = %user.id, "User logged out");
        }
        *state = Session::Anonymous;
        Ok(())
    }

    /// `Ok(None)` when nobody is logged in (nothing to update, not an error).
    #[instrument(name = "utility_accounts.session.update_profile", skip(self, patch))]
    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Option<SessionUser>, DomainError> {
        let mut state = self.state.write();

        let Session::Authenticated { user, is_admin } = &*state else {
            debug!("No active session, profile update skipped");
            return Ok(None);
        };
        let is_admin = *is_admin;

        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        let mut updated = user.clone();
        updated.apply(&patch);

        let previous = self.users.find_by_id(&updated.id);
        if let Err(e) = self.commit_profile(&updated, is_admin, &patch) {
            self.restore_snapshot(&state);
            if let Some(previous) = previous {
                if let Err(undo) = self.users.replace(previous) {
                    error!(
                        user_id = %updated.id,
                        error = %format!("{undo:#}"),
                        "Failed to revert directory record"
                    );
                }
            }
            return Err(e);
        }

        info!(user_id = %updated.id, "Profile updated");
        *state = Session::Authenticated {
            user: updated.clone(),
            is_admin,
        };
        Ok(Some(updated))
    }

    fn commit_profile(
        &self,
        updated: &SessionUser,
        is_admin: bool,
        patch: &ProfilePatch,
    ) -> Result<(), DomainError> {
        self.persist(updated, is_admin)?;
        let matched = self
            .users
            .update(&updated.id, patch)
            .map_err(DomainError::storage)?;
        if !matched {
            debug!(user_id = %updated.id, "No directory record for session user");
        }

        let fields = patch.changed_fields();
        let details = if fields.is_empty() {
            "No profile fields changed".to_string()
        } else {
            format!("Updated {}", fields.join(", "))
        };
        self.activities
            .record(updated, "Profile Updated", details, ActivityType::Profile)?;
        Ok(())
    }

    /// Bring the persisted snapshot back in line with `current` after a
    /// failed mutation.
    fn restore_snapshot(&self, current: &Session) {
        let result = match current {
            Session::Authenticated { user, is_admin } => self.store.save(&PersistedSession {
                user: user.clone(),
                is_admin: *is_admin,
            }),
            Session::Anonymous => self.store.clear(),
        };
        if let Err(e) = result {
            error!(error = %format!("{e:#}"), "Failed to restore session snapshot");
        }
    }

    fn persist(&self, user: &SessionUser, is_admin: bool) -> Result<(), DomainError> {
        self.store
            .save(&PersistedSession {
                user: user.clone(),
                is_admin,
            })
            .map_err(DomainError::storage)
    }
}

fn validate_new_account(account: &NewAccount) -> Result<(), DomainError> {
    require("name", &account.name)?;
    require("email", &account.email)?;
    validate_email(&account.email)?;
    require("password", &account.password)?;
    require("waterMeterNo", &account.water_meter_no)?;
    require("electricityMeterNo", &account.electricity_meter_no)?;
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::invalid_email(email));
    }
    Ok(())
}
