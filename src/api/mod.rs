//! HTTP bindings for the Libris REST API.
//!
//! This layer is transport only: it serializes requests, injects the
//! bearer token, and maps responses into the client error taxonomy.
//! Business checks live in the services above it.

pub mod auth;
pub mod books;
pub mod borrows;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    session::SessionManager,
};

/// Shared transport for the endpoint groups
#[derive(Clone)]
pub(crate) struct Http {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl Http {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = builder.send().await.map_err(AppError::Network)?;
        decode(response).await
    }

    /// Send and ignore the success body
    async fn send_unit(&self, builder: RequestBuilder) -> AppResult<()> {
        let response = builder.send().await.map_err(AppError::Network)?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from(response).await)
    }
}

/// Error payload shape the backend uses for non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    if response.status().is_success() {
        return response.json::<T>().await.map_err(AppError::Network);
    }
    Err(error_from(response).await)
}

async fn error_from(response: Response) -> AppError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| "Operation failed".to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        // The backend reports business-rule rejections across these
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Conflict(message)
        }
        _ => AppError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Typed access to the backend endpoints
#[derive(Clone)]
pub struct ApiClient {
    pub auth: auth::AuthApi,
    pub books: books::BooksApi,
    pub borrows: borrows::BorrowsApi,
}

impl ApiClient {
    /// Build the client with the configured timeout; the session manager
    /// supplies the bearer token per request.
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AppError::Network)?;

        let http = Http {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        };

        Ok(Self {
            auth: auth::AuthApi::new(http.clone()),
            books: books::BooksApi::new(http.clone()),
            borrows: borrows::BorrowsApi::new(http),
        })
    }
}
