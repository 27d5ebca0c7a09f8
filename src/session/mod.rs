//! Client session lifecycle.
//!
//! The session is either fully established (token and user both present)
//! or absent; this layer never writes partial state. Loading tolerates
//! partially damaged persisted data by degrading soft.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::watch;

use crate::models::user::{Role, User};

/// Fully established session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Owns the persisted token and user profile for the running client.
///
/// Views await [`SessionManager::ready`] once before their role gate
/// instead of polling for initialization.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
    ready: watch::Sender<bool>,
}

impl SessionManager {
    /// Create a manager backed by the given store. No session is visible
    /// until [`init`](Self::init) has run.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            store,
            state: RwLock::new(SessionState::default()),
            ready,
        }
    }

    /// Load the persisted session, then release everything waiting on
    /// [`ready`](Self::ready). Storage reads are synchronous.
    pub fn init(&self) {
        match self.store.load() {
            Ok(Some(stored)) => {
                let user = stored.parse_user();
                let mut state = self.state.write().unwrap();
                state.token = Some(stored.token);
                state.user = user;
                tracing::debug!("Restored persisted session");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to load persisted session: {}", e),
        }
        let _ = self.ready.send(true);
    }

    /// Wait until the persisted session has been loaded
    pub async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// The persisted token, if any. No side effects.
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    /// The persisted user profile, if any. No side effects.
    pub fn user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    /// Role of the current user, if an identity is held
    pub fn role(&self) -> Option<Role> {
        self.state.read().unwrap().user.as_ref().map(|u| u.role)
    }

    /// True when a credential is held and, where the token carries an
    /// expiry claim, that expiry has not passed. The backend remains
    /// authoritative; this only filters out provably stale credentials.
    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read().unwrap();
        match &state.token {
            Some(token) => token_expiry(token)
                .map(|expiry| expiry > Utc::now())
                .unwrap_or(true),
            None => false,
        }
    }

    /// Persist and expose a freshly authenticated session
    pub fn establish(&self, session: Session) -> crate::error::AppResult<()> {
        self.store.save(&StoredSession::new(&session))?;
        let mut state = self.state.write().unwrap();
        state.token = Some(session.token);
        state.user = Some(session.user);
        Ok(())
    }

    /// Drop the session unconditionally, both in memory and in storage
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
        let mut state = self.state.write().unwrap();
        state.token = None;
        state.user = None;
    }
}

/// Expiry claim of a JWT credential, when one can be read.
/// Opaque tokens yield `None` and are assumed valid.
fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct ExpClaim {
        exp: i64,
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpClaim>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
    Utc.timestamp_opt(data.claims.exp, 0).single()
}
