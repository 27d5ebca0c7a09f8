//! Client-side orchestration services

pub mod auth;
pub mod catalog;
pub mod loans;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::session::SessionManager;

/// Destructive and state-changing actions ask the user before any request
/// is issued; a declined confirmation resolves to a no-op.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPolicy: Send + Sync {
    /// Return true to proceed with the described action
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Policy that accepts every action, for non-interactive use
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmationPolicy for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services over the given API client and session
    pub fn new(
        api: ApiClient,
        session: Arc<SessionManager>,
        confirm: Arc<dyn ConfirmationPolicy>,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(api.clone(), session),
            catalog: catalog::CatalogService::new(api.clone(), confirm.clone()),
            loans: loans::LoansService::new(api, confirm),
        }
    }
}
