//! Authentication endpoints

use reqwest::Method;

use crate::error::AppResult;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, StudentSummary};

use super::Http;

#[derive(Clone)]
pub struct AuthApi {
    http: Http,
}

impl AuthApi {
    pub(super) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Exchange credentials for a token and profile
    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        self.http
            .send(self.http.request(Method::POST, "/auth/login").json(request))
            .await
    }

    /// Create a student account
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        self.http
            .send_unit(self.http.request(Method::POST, "/auth/register").json(request))
            .await
    }

    /// Student roster with per-student borrow counts (admin only)
    pub async fn students(&self) -> AppResult<Vec<StudentSummary>> {
        self.http
            .send(self.http.request(Method::GET, "/auth/students"))
            .await
    }
}
