use std::sync::Arc;

use anyhow::Context;
use kv_store::{JsonCollection, JsonSlot, KeyValueStore};
use tracing::debug;

use crate::contract::model::{
    ActivityRecord, FeedbackRecord, ProfilePatch, TransactionRecord, UserRecord,
};
use crate::domain::repo::{
    ActivityRepository, FeedbackRepository, PersistedSession, SessionStore, TransactionRepository,
    UsersRepository,
};
use crate::infra::storage::entity::{
    ActivityEntity, FeedbackEntity, SessionUserEntity, TransactionEntity, UserEntity,
};
use crate::infra::storage::keys;

/// User directory stored under `registeredUsers`.
#[derive(Clone)]
pub struct KvUsersRepository {
    users: JsonCollection<UserEntity>,
}

impl KvUsersRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            users: JsonCollection::new(store, keys::REGISTERED_USERS),
        }
    }
}

impl UsersRepository for KvUsersRepository {
    fn add(&self, record: UserRecord) -> anyhow::Result<()> {
        let entity = UserEntity::from(record);
        self.users
            .modify(|users| users.push(entity.clone()))
            .with_context(|| format!("append to {}", keys::REGISTERED_USERS))
    }

    fn find_by_credentials(&self, email: &str, password: &str) -> Option<UserRecord> {
        self.users
            .load()
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .map(UserRecord::from)
    }

    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .load()
            .into_iter()
            .find(|u| u.email == email)
            .map(UserRecord::from)
    }

    fn update(&self, id: &str, patch: &ProfilePatch) -> anyhow::Result<bool> {
        self.users
            .modify(|users| match users.iter_mut().find(|u| u.id == id) {
                Some(entity) => {
                    let mut record = UserRecord::from(entity.clone());
                    record.apply(patch);
                    *entity = UserEntity::from(record);
                    true
                }
                None => false,
            })
            .with_context(|| format!("update {} entry {id}", keys::REGISTERED_USERS))
    }

    fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.users
            .load()
            .into_iter()
            .find(|u| u.id == id)
            .map(UserRecord::from)
    }

    fn replace(&self, record: UserRecord) -> anyhow::Result<bool> {
        let id = record.id.clone();
        let entity = UserEntity::from(record);
        self.users
            .modify(|users| match users.iter_mut().find(|u| u.id == entity.id) {
                Some(slot) => {
                    *slot = entity.clone();
                    true
                }
                None => false,
            })
            .with_context(|| format!("replace {} entry {id}", keys::REGISTERED_USERS))
    }

    fn remove(&self, id: &str) -> anyhow::Result<bool> {
        self.users
            .modify(|users| remove_first(users, |u| u.id == id))
            .with_context(|| format!("remove {} entry {id}", keys::REGISTERED_USERS))
    }

    fn all(&self) -> Vec<UserRecord> {
        self.users.load().into_iter().map(UserRecord::from).collect()
    }
}

fn remove_first<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(matches) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

/// Activity log stored under `userActivities`, newest first.
#[derive(Clone)]
pub struct KvActivityRepository {
    items: JsonCollection<ActivityEntity>,
}

impl KvActivityRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: JsonCollection::new(store, keys::USER_ACTIVITIES),
        }
    }
}

impl ActivityRepository for KvActivityRepository {
    fn append(&self, record: ActivityRecord) -> anyhow::Result<()> {
        let entity = ActivityEntity::from(record);
        self.items
            .modify(|items| items.insert(0, entity.clone()))
            .with_context(|| format!("prepend to {}", keys::USER_ACTIVITIES))
    }

    fn query_all(&self) -> Vec<ActivityRecord> {
        self.items
            .load()
            .into_iter()
            .map(ActivityRecord::from)
            .collect()
    }
}

/// Transaction log stored under `userTransactions`, newest first.
#[derive(Clone)]
pub struct KvTransactionRepository {
    items: JsonCollection<TransactionEntity>,
}

impl KvTransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: JsonCollection::new(store, keys::USER_TRANSACTIONS),
        }
    }
}

impl TransactionRepository for KvTransactionRepository {
    fn append(&self, record: TransactionRecord) -> anyhow::Result<()> {
        let entity = TransactionEntity::from(record);
        self.items
            .modify(|items| items.insert(0, entity.clone()))
            .with_context(|| format!("prepend to {}", keys::USER_TRANSACTIONS))
    }

    fn remove(&self, id: &str) -> anyhow::Result<bool> {
        self.items
            .modify(|items| remove_first(items, |t| t.id == id))
            .with_context(|| format!("remove {} entry {id}", keys::USER_TRANSACTIONS))
    }

    fn query_all(&self) -> Vec<TransactionRecord> {
        self.items
            .load()
            .into_iter()
            .map(TransactionRecord::from)
            .collect()
    }
}

#[derive(Clone)]
pub struct KvFeedbackRepository {
    items: JsonCollection<FeedbackEntity>,
}

impl KvFeedbackRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: JsonCollection::new(store, keys::USER_FEEDBACKS),
        }
    }
}

impl FeedbackRepository for KvFeedbackRepository {
    fn append(&self, record: FeedbackRecord) -> anyhow::Result<()> {
        let entity = FeedbackEntity::from(record);
        self.items
            .modify(|items| items.push(entity.clone()))
            .with_context(|| format!("append to {}", keys::USER_FEEDBACKS))
    }

    fn all(&self) -> Vec<FeedbackRecord> {
        self.items
            .load()
            .into_iter()
            .map(FeedbackRecord::from)
            .collect()
    }
}

/// Session snapshot spread over `userData`, `isLoggedIn` and `isAdmin`.
///
/// `isLoggedIn` acts as the commit flag: `save` lowers it before touching the
/// other keys and raises it last. Snapshots written without the flag (only
/// `userData` and `isAdmin`) are still accepted.
#[derive(Clone)]
pub struct KvSessionStore {
    user_data: JsonSlot<SessionUserEntity>,
    logged_in: JsonSlot<bool>,
    is_admin: JsonSlot<bool>,
}

impl KvSessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            user_data: JsonSlot::new(store.clone(), keys::USER_DATA),
            logged_in: JsonSlot::new(store.clone(), keys::IS_LOGGED_IN),
            is_admin: JsonSlot::new(store, keys::IS_ADMIN),
        }
    }
}

impl SessionStore for KvSessionStore {
    fn load(&self) -> Option<PersistedSession> {
        if self.logged_in.load() == Some(false) {
            return None;
        }
        let Some(user) = self.user_data.load() else {
            debug!("No readable user data, starting anonymous");
            return None;
        };
        Some(PersistedSession {
            user: user.into(),
            is_admin: self.is_admin.load().unwrap_or(false),
        })
    }

    fn save(&self, session: &PersistedSession) -> anyhow::Result<()> {
        self.logged_in
            .save(&false)
            .with_context(|| format!("write {}", keys::IS_LOGGED_IN))?;
        self.user_data
            .save(&SessionUserEntity::from(&session.user))
            .with_context(|| format!("write {}", keys::USER_DATA))?;
        self.is_admin
            .save(&session.is_admin)
            .with_context(|| format!("write {}", keys::IS_ADMIN))?;
        self.logged_in
            .save(&true)
            .with_context(|| format!("write {}", keys::IS_LOGGED_IN))
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.user_data
            .clear()
            .with_context(|| format!("remove {}", keys::USER_DATA))?;
        self.is_admin
            .clear()
            .with_context(|| format!("remove {}", keys::IS_ADMIN))?;
        self.logged_in
            .clear()
            .with_context(|| format!("remove {}", keys::IS_LOGGED_IN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kv_store::MemoryStore;

    use crate::contract::model::{ActivityType, SessionUser};

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    fn record(id: &str, email: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            name: format!("User {id}"),
            email: email.into(),
            password: "pw".into(),
            mobile: String::new(),
            dob: String::new(),
            area: String::new(),
            water_meter_no: format!("WAT{id}"),
            electricity_meter_no: format!("ELE{id}"),
            created_at: Utc::now(),
        }
    }

    fn activity(id: &str, user_id: &str) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            user_id: user_id.into(),
            user_name: String::new(),
            user_email: String::new(),
            action: "User Login".into(),
            details: String::new(),
            timestamp: Utc::now(),
            kind: ActivityType::Login,
        }
    }

    #[test]
    fn first_matching_email_wins() {
        let repo = KvUsersRepository::new(store());
        repo.add(record("1", "a@x.com")).unwrap();
        repo.add(record("2", "a@x.com")).unwrap();

        assert_eq!(repo.find_by_email("a@x.com").unwrap().id, "1");
        assert_eq!(repo.find_by_credentials("a@x.com", "pw").unwrap().id, "1");
        assert!(repo.find_by_credentials("a@x.com", "nope").is_none());
        assert!(repo.find_by_email("A@x.com").is_none());
        assert_eq!(repo.all().len(), 2);
    }

    #[test]
    fn update_touches_only_the_first_match() {
        let repo = KvUsersRepository::new(store());
        repo.add(record("1", "a@x.com")).unwrap();
        repo.add(record("2", "b@x.com")).unwrap();

        let patch = ProfilePatch {
            area: Some("north".into()),
            ..ProfilePatch::default()
        };
        assert!(repo.update("2", &patch).unwrap());
        assert!(!repo.update("missing", &patch).unwrap());

        let all = repo.all();
        assert_eq!(all[0].area, "");
        assert_eq!(all[1].area, "north");
        assert_eq!(all[1].password, "pw");
    }

    #[test]
    fn activities_are_newest_first() {
        let repo = KvActivityRepository::new(store());
        repo.append(activity("1", "u1")).unwrap();
        repo.append(activity("2", "u2")).unwrap();
        repo.append(activity("3", "u1")).unwrap();

        let ids: Vec<_> = repo.query_all().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, ["3", "2", "1"]);
        let mine: Vec<_> = repo.query_by_user("u1").into_iter().map(|a| a.id).collect();
        assert_eq!(mine, ["3", "1"]);
    }

    #[test]
    fn activity_kind_is_stored_as_type() {
        let kv = store();
        let repo = KvActivityRepository::new(kv.clone());
        repo.append(activity("1", "u1")).unwrap();

        let raw = kv.get(keys::USER_ACTIVITIES).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let item = &json["items"][0];
        assert_eq!(item["type"], "login");
        assert_eq!(item["userId"], "u1");
    }

    #[test]
    fn session_store_round_trip_and_clear() {
        let kv = store();
        let sessions = KvSessionStore::new(kv.clone());
        assert!(sessions.load().is_none());

        let user: SessionUser = record("7", "s@x.com").to_session_user();
        sessions
            .save(&PersistedSession {
                user: user.clone(),
                is_admin: false,
            })
            .unwrap();

        let loaded = sessions.load().unwrap();
        assert_eq!(loaded.user, user);
        assert!(!loaded.is_admin);
        assert!(!kv.get(keys::USER_DATA).unwrap().unwrap().contains("password"));

        sessions.clear().unwrap();
        assert!(sessions.load().is_none());
        assert!(kv.get(keys::USER_DATA).unwrap().is_none());
    }

    #[test]
    fn snapshot_without_logged_in_flag_is_restored() {
        let kv = store();
        kv.set(
            keys::USER_DATA,
            r#"{"id":"1700000000000","name":"Old","email":"old@x.com","mobile":"",
                "water_meter_no":"W1","electricity_meter_no":"E1",
                "created_at":"2023-11-14T22:13:20.000Z"}"#,
        )
        .unwrap();
        kv.set(keys::IS_ADMIN, "false").unwrap();

        let loaded = KvSessionStore::new(kv).load().unwrap();
        assert_eq!(loaded.user.id, "1700000000000");
        assert_eq!(loaded.user.water_meter_no, "W1");
        assert!(!loaded.is_admin);
    }

    #[test]
    fn lowered_logged_in_flag_hides_user_data() {
        let kv = store();
        let sessions = KvSessionStore::new(kv.clone());
        sessions
            .save(&PersistedSession {
                user: record("7", "s@x.com").to_session_user(),
                is_admin: false,
            })
            .unwrap();

        kv.set(keys::IS_LOGGED_IN, "false").unwrap();
        assert!(sessions.load().is_none());
    }

    #[test]
    fn remove_and_replace_target_one_user() {
        let repo = KvUsersRepository::new(store());
        repo.add(record("1", "a@x.com")).unwrap();
        repo.add(record("2", "b@x.com")).unwrap();

        let mut changed = repo.find_by_id("2").unwrap();
        changed.area = "south".into();
        assert!(repo.replace(changed).unwrap());
        assert!(!repo.replace(record("9", "z@x.com")).unwrap());
        assert_eq!(repo.find_by_id("2").unwrap().area, "south");

        assert!(repo.remove("1").unwrap());
        assert!(!repo.remove("1").unwrap());
        let ids: Vec<_> = repo.all().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn malformed_user_data_means_no_session() {
        let kv = store();
        kv.set(keys::IS_LOGGED_IN, "true").unwrap();
        kv.set(keys::USER_DATA, "{not json").unwrap();

        assert!(KvSessionStore::new(kv).load().is_none());
    }
}
