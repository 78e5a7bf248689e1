// Session lifecycle: a two-state machine (signed out / signed in) with a
// short-lived provisional sub-state while the authoritative profile fetch
// is outstanding. Every transition mirrors to durable storage before it is
// considered complete, and malformed persisted state fails open to signed
// out.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::client::{encode_segment, to_body, ApiRequest, RestClient};
use crate::error::ApiError;
use crate::model::{AuthUser, LoginBody, LoginResult, Profile, RegisterBody};

/// Durable storage port for the single session slot.
pub trait SessionVault: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, raw: &str);
    fn clear(&self);
}

#[derive(Default)]
pub struct MemoryVault {
    slot: Mutex<Option<String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionVault for MemoryVault {
    fn load(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn store(&self, raw: &str) {
        *self.slot.lock() = Some(raw.to_string());
    }

    fn clear(&self) {
        *self.slot.lock() = None;
    }
}

/// File-backed vault; one well-known file holds the serialized session.
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionVault for FileVault {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn store(&self, raw: &str) {
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!(error = %err, "failed to persist session");
        }
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    token: String,
    user: Option<AuthUser>,
    logged_in_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    SignedOut,
    // Token accepted, profile fetch not yet resolved; not authenticated.
    Provisional { token: String },
    SignedIn { token: String, user: AuthUser },
}

/// Read-only view published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    pub authenticated: bool,
}

pub struct SessionStore {
    state: RwLock<SessionState>,
    vault: Box<dyn SessionVault>,
    notify: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Builds the store and hydrates it from the vault. Corrupt or partial
    /// persisted state is discarded silently.
    pub fn new(vault: Box<dyn SessionVault>) -> Arc<Self> {
        let (notify, _) = watch::channel(SessionSnapshot {
            user: None,
            authenticated: false,
        });
        let store = Arc::new(Self {
            state: RwLock::new(SessionState::SignedOut),
            vault,
            notify,
        });
        store.hydrate();
        store
    }

    fn hydrate(&self) {
        let Some(raw) = self.vault.load() else { return };
        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(PersistedSession {
                token,
                user: Some(user),
                ..
            }) if !token.is_empty() => {
                *self.state.write() = SessionState::SignedIn { token, user };
                self.publish();
            }
            _ => {
                // Partial state (token without user, or vice versa) collapses
                // to signed out rather than to a half-valid session.
                warn!("discarding unusable persisted session");
                self.vault.clear();
            }
        }
    }

    /// Authenticates and completes the transition to signed in. The login
    /// payload's manager flag is not trusted; a follow-up profile fetch
    /// supplies the authoritative user record. If that fetch fails the
    /// store collapses back to signed out.
    pub async fn login(
        &self,
        client: &RestClient,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ApiError> {
        let body = LoginBody {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        };
        let result: LoginResult = client
            .send(ApiRequest::post("/auth/login", to_body(&body)?))
            .await?;

        self.set_provisional(result.access_token.clone());

        let path = format!("/holidaze/profiles/{}", encode_segment(&result.name));
        let profile: Profile = match client
            .send(ApiRequest::get(&path).with_token(result.access_token.clone()))
            .await
        {
            Ok(profile) => profile,
            Err(err) => {
                self.force_sign_out();
                return Err(err);
            }
        };

        let user = AuthUser::from(profile);
        self.complete_sign_in(result.access_token, user.clone());
        info!(user = %user.name, manager = user.venue_manager, "signed in");
        Ok(user)
    }

    /// Registers a new account, then signs in with the same credentials.
    pub async fn register(
        &self,
        client: &RestClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ApiError> {
        let body = RegisterBody {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.trim().to_string(),
        };
        let _created: AuthUser = client
            .send(ApiRequest::post("/auth/register", to_body(&body)?))
            .await?;
        self.login(client, email, password).await
    }

    /// Clears both in-memory and persisted state unconditionally.
    pub fn logout(&self) {
        self.force_sign_out();
        info!("signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.read(), SessionState::SignedIn { .. })
    }

    pub fn user(&self) -> Option<AuthUser> {
        match &*self.state.read() {
            SessionState::SignedIn { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    /// Bearer token for authenticated calls; present only when signed in.
    pub fn token(&self) -> Option<String> {
        match &*self.state.read() {
            SessionState::SignedIn { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.notify.borrow().clone()
    }

    /// Change notifications for views that render identity.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.notify.subscribe()
    }

    /// Updates the signed-in user's own profile (bio, avatar, banner) and
    /// reflects the result into the cached identity.
    pub async fn update_profile(
        &self,
        client: &RestClient,
        body: &crate::model::ProfileUpdateBody,
    ) -> Result<AuthUser, ApiError> {
        let (token, name) = match &*self.state.read() {
            SessionState::SignedIn { token, user } => (token.clone(), user.name.clone()),
            _ => return Err(ApiError::Unauthenticated),
        };
        let path = format!("/holidaze/profiles/{}", encode_segment(&name));
        let profile: Profile = client
            .send(ApiRequest::put(&path, to_body(body)?).with_token(token))
            .await?;
        let user = AuthUser::from(profile);
        self.update_user(user.clone());
        Ok(user)
    }

    /// Reflects a profile edit (avatar, bio, manager flag) into the cached
    /// identity without a new login.
    pub fn update_user(&self, user: AuthUser) {
        let mut state = self.state.write();
        if let SessionState::SignedIn { token, .. } = &*state {
            let token = token.clone();
            self.persist(&token, Some(&user));
            *state = SessionState::SignedIn { token, user };
            drop(state);
            self.publish();
        }
    }

    fn set_provisional(&self, token: String) {
        self.persist(&token, None);
        *self.state.write() = SessionState::Provisional { token };
        self.publish();
    }

    fn complete_sign_in(&self, token: String, user: AuthUser) {
        self.persist(&token, Some(&user));
        *self.state.write() = SessionState::SignedIn { token, user };
        self.publish();
    }

    fn force_sign_out(&self) {
        self.vault.clear();
        *self.state.write() = SessionState::SignedOut;
        self.publish();
    }

    fn persist(&self, token: &str, user: Option<&AuthUser>) {
        let record = PersistedSession {
            token: token.to_string(),
            user: user.cloned(),
            logged_in_at: Utc::now().timestamp_millis(),
        };
        match serde_json::to_string(&record) {
            Ok(raw) => self.vault.store(&raw),
            Err(err) => warn!(error = %err, "failed to serialize session"),
        }
    }

    fn publish(&self) {
        let snapshot = match &*self.state.read() {
            SessionState::SignedIn { user, .. } => SessionSnapshot {
                user: Some(user.clone()),
                authenticated: true,
            },
            _ => SessionSnapshot {
                user: None,
                authenticated: false,
            },
        };
        self.notify.send_replace(snapshot);
    }
}
