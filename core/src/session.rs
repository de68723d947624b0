//! Auth session and the application context that carries it.
//!
//! # Design
//! There is no global session. An `AppContext` is created once and passed
//! to everything that needs the current user or token; it is the only place
//! the session changes. When backed by a [`KeyValueStore`] every change is
//! written through under the session key as
//! `{"state":{"user":…,"token":…},"version":0}`.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{KeyValueStore, StoreError};

pub const DEFAULT_SESSION_KEY: &str = "sr-dash-client";

/// The signed-in user as the dashboard sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    state: Session,
    version: u32,
}

/// Shared handle to the current session. Cloning shares the same session.
#[derive(Clone)]
pub struct AppContext {
    session: Arc<RwLock<Session>>,
    store: Option<Arc<dyn KeyValueStore>>,
    session_key: String,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    /// A context with no persistence.
    pub fn new() -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            store: None,
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// A context persisted to `store`, restoring any saved session.
    /// A malformed snapshot is treated as signed out.
    pub fn with_store(store: Arc<dyn KeyValueStore>, session_key: &str) -> Self {
        let restored = store
            .get(session_key)
            .and_then(|raw| serde_json::from_str::<Snapshot>(&raw).ok())
            .map(|snapshot| snapshot.state)
            .unwrap_or_default();
        if restored.is_authenticated() {
            tracing::debug!(key = session_key, "restored persisted session");
        }
        Self {
            session: Arc::new(RwLock::new(restored)),
            store: Some(store),
            session_key: session_key.to_string(),
        }
    }

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().token.clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.read().user.clone()
    }

    pub fn role(&self) -> Option<String> {
        self.session.read().user.as_ref().and_then(|u| u.role.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Install the session obtained at login.
    pub fn set_session(&self, user: SessionUser, token: impl Into<String>) -> Result<(), StoreError> {
        let session = Session {
            user: Some(user),
            token: Some(token.into()),
        };
        *self.session.write() = session.clone();
        tracing::info!("session established");
        self.persist(&session)
    }

    /// Replace the user record, keeping the token.
    pub fn update_user(&self, user: SessionUser) -> Result<(), StoreError> {
        let session = {
            let mut guard = self.session.write();
            guard.user = Some(user);
            guard.clone()
        };
        self.persist(&session)
    }

    /// Sign out: drop the user and token.
    pub fn clear(&self) -> Result<(), StoreError> {
        *self.session.write() = Session::default();
        tracing::info!("session cleared");
        match &self.store {
            Some(store) => store.remove(&self.session_key),
            None => Ok(()),
        }
    }

    fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let snapshot = Snapshot {
            state: session.clone(),
            version: 0,
        };
        // Serializing plain strings and integers cannot fail.
        let raw = serde_json::to_string(&snapshot).unwrap_or_default();
        store.set(&self.session_key, &raw)
    }
}

/// Role of the user recorded in a raw session snapshot.
///
/// Absent, malformed or role-less snapshots yield `None`.
pub fn role_from_snapshot(raw: Option<&str>) -> Option<String> {
    let value: Value = serde_json::from_str(raw?).ok()?;
    value
        .get("state")?
        .get("user")?
        .get("role")?
        .as_str()
        .map(str::to_string)
}

/// Role of the user persisted in `store` under `session_key`.
pub fn stored_role(store: &dyn KeyValueStore, session_key: &str) -> Option<String> {
    role_from_snapshot(store.get(session_key).as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn admin() -> SessionUser {
        SessionUser {
            id: 1,
            email: Some("admin@wintender.et".to_string()),
            full_name: Some("Admin".to_string()),
            role: Some("ADMIN".to_string()),
        }
    }

    #[test]
    fn set_and_clear_session() {
        let ctx = AppContext::new();
        assert!(!ctx.is_authenticated());

        ctx.set_session(admin(), "tok").unwrap();
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role().as_deref(), Some("ADMIN"));

        ctx.clear().unwrap();
        assert_eq!(ctx.session(), Session::default());
    }

    #[test]
    fn clones_share_the_session() {
        let ctx = AppContext::new();
        let other = ctx.clone();
        ctx.set_session(admin(), "tok").unwrap();
        assert_eq!(other.token().as_deref(), Some("tok"));
    }

    #[test]
    fn persisted_session_is_restored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        AppContext::with_store(store.clone(), DEFAULT_SESSION_KEY)
            .set_session(admin(), "tok")
            .unwrap();

        let restored = AppContext::with_store(store.clone(), DEFAULT_SESSION_KEY);
        assert_eq!(restored.token().as_deref(), Some("tok"));
        assert_eq!(stored_role(store.as_ref(), DEFAULT_SESSION_KEY).as_deref(), Some("ADMIN"));
    }

    #[test]
    fn clear_removes_persisted_snapshot() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ctx = AppContext::with_store(store.clone(), DEFAULT_SESSION_KEY);
        ctx.set_session(admin(), "tok").unwrap();
        ctx.clear().unwrap();
        assert_eq!(store.get(DEFAULT_SESSION_KEY), None);
    }

    #[test]
    fn update_user_keeps_token() {
        let ctx = AppContext::new();
        ctx.set_session(admin(), "tok").unwrap();
        ctx.update_user(SessionUser {
            role: Some("SUPPORT".to_string()),
            ..admin()
        })
        .unwrap();
        assert_eq!(ctx.token().as_deref(), Some("tok"));
        assert_eq!(ctx.role().as_deref(), Some("SUPPORT"));
    }

    #[test]
    fn malformed_snapshot_restores_signed_out() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(DEFAULT_SESSION_KEY, "{not json").unwrap();
        assert!(!AppContext::with_store(store, DEFAULT_SESSION_KEY).is_authenticated());
    }

    #[test]
    fn role_lookup_tolerates_bad_input() {
        assert_eq!(role_from_snapshot(None), None);
        assert_eq!(role_from_snapshot(Some("")), None);
        assert_eq!(role_from_snapshot(Some("null")), None);
        assert_eq!(role_from_snapshot(Some(r#"{"state":{}}"#)), None);
        assert_eq!(role_from_snapshot(Some(r#"{"state":{"user":{"role":7}}}"#)), None);
        assert_eq!(
            role_from_snapshot(Some(r#"{"state":{"user":{"role":"BIDDER"}},"version":0}"#)).as_deref(),
            Some("BIDDER")
        );
    }
}
