//! Authentication and session orchestration

use std::sync::Arc;

use validator::Validate;

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::user::{LoginRequest, RegisterRequest, Role, StudentSummary};
use crate::session::{Session, SessionManager};

/// Navigation targets the view layer switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    AdminDashboard,
    StudentDashboard,
}

impl Screen {
    /// Landing screen for a role after login
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Screen::AdminDashboard,
            Role::Student => Screen::StudentDashboard,
        }
    }
}

/// Outcome of a privileged call that came back 401/403
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The held credential is gone or expired; the session was cleared
    /// and the view must navigate to login
    SessionExpired,
    /// A credential is held and still believed valid; most likely a
    /// backend hiccup, so the session is kept
    Transient(String),
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Authenticate and persist the session, returning where to navigate.
    /// Nothing is persisted when the backend rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Screen> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.auth.login(&request).await?;
        let role = response.user.role;
        self.session.establish(Session {
            token: response.token,
            user: response.user,
        })?;
        tracing::info!(role = %role, "Login succeeded");
        Ok(Screen::for_role(role))
    }

    /// Create a student account. Field checks run before any request.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<()> {
        request.validate()?;
        self.api.auth.register(&request).await
    }

    /// Clear the session unconditionally and return to the entry screen
    pub fn logout(&self) -> Screen {
        self.session.clear();
        tracing::info!("Logged out");
        Screen::Login
    }

    /// Gate a role-specific view. `None` means proceed; otherwise the
    /// view must navigate to the returned screen without fetching anything.
    pub fn gate(&self, expected: Role) -> Option<Screen> {
        if !self.session.is_authenticated() {
            return Some(Screen::Login);
        }
        match self.session.role() {
            Some(role) if role == expected => None,
            Some(role) => Some(Screen::for_role(role)),
            None => Some(Screen::Login),
        }
    }

    /// Apply the session policy to a 401/403: a credential that is absent
    /// or provably expired ends the session; anything else is treated as
    /// transient and the session is kept.
    pub fn on_auth_error(&self, error: &AppError) -> AuthFailure {
        debug_assert!(error.is_auth());
        if self.session.is_authenticated() {
            tracing::warn!("Privileged call rejected while holding a live credential");
            AuthFailure::Transient(
                "Authentication error. Please check your connection and try again.".to_string(),
            )
        } else {
            self.session.clear();
            AuthFailure::SessionExpired
        }
    }

    /// Student roster for the admin dashboard
    pub async fn students(&self) -> AppResult<Vec<StudentSummary>> {
        self.api.auth.students().await
    }
}
