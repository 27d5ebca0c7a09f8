//! Libris Library Management System client
//!
//! Typed client for the Libris REST backend: persistent session
//! management, catalog and borrow operations, and headless dashboard
//! controllers for the admin and student roles.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use services::{ConfirmationPolicy, Services};
use session::{FileSessionStore, SessionManager, SessionStore};

/// Client state shared by every view
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Arc<SessionManager>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire the client together with the platform session store; the
    /// persisted session is loaded before this returns.
    pub fn bootstrap(config: AppConfig, confirm: Arc<dyn ConfirmationPolicy>) -> AppResult<Self> {
        let store: Arc<dyn SessionStore> = match &config.session.storage_dir {
            Some(dir) => Arc::new(FileSessionStore::at(dir.join("session.json"))),
            None => Arc::new(FileSessionStore::open_default()?),
        };
        Self::with_store(config, store, confirm)
    }

    /// Same wiring with an explicit store, for tests and embedders
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn SessionStore>,
        confirm: Arc<dyn ConfirmationPolicy>,
    ) -> AppResult<Self> {
        let session = Arc::new(SessionManager::new(store));
        session.init();

        let api = api::ApiClient::new(&config.api, session.clone())?;
        let services = Arc::new(Services::new(api, session.clone(), confirm));

        Ok(Self {
            config: Arc::new(config),
            session,
            services,
        })
    }
}

/// Initialize tracing for binaries embedding the client
pub fn init_tracing(config: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris_client={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
