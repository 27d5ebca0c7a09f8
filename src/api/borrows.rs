//! Borrow lifecycle endpoints

use reqwest::Method;
use serde::Serialize;

use crate::error::AppResult;
use crate::models::borrow::BorrowRecord;

use super::Http;

/// Create borrow request
#[derive(Serialize)]
struct CreateBorrowRequest {
    book_id: i64,
}

#[derive(Clone)]
pub struct BorrowsApi {
    http: Http,
}

impl BorrowsApi {
    pub(super) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Every borrow record (admin only)
    pub async fn list(&self) -> AppResult<Vec<BorrowRecord>> {
        self.http
            .send(self.http.request(Method::GET, "/borrows"))
            .await
    }

    /// Borrow records of one user, active and returned
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<BorrowRecord>> {
        self.http
            .send(
                self.http
                    .request(Method::GET, &format!("/borrows/user/{}", user_id)),
            )
            .await
    }

    /// Active records past their due date, filtered server-side
    pub async fn overdue(&self) -> AppResult<Vec<BorrowRecord>> {
        self.http
            .send(self.http.request(Method::GET, "/borrows/overdue"))
            .await
    }

    /// Create a borrow. The backend sets the due date and decrements the
    /// book's availability; zero availability is rejected with a message.
    pub async fn create(&self, book_id: i64) -> AppResult<BorrowRecord> {
        self.http
            .send(
                self.http
                    .request(Method::POST, "/borrows")
                    .json(&CreateBorrowRequest { book_id }),
            )
            .await
    }

    /// Transition a record to returned. Double returns are rejected by
    /// the backend.
    pub async fn return_record(&self, borrow_id: i64) -> AppResult<BorrowRecord> {
        self.http
            .send(
                self.http
                    .request(Method::PUT, &format!("/borrows/{}/return", borrow_id)),
            )
            .await
    }
}
