//! Borrow lifecycle operations

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::borrow::BorrowRecord;

use super::ConfirmationPolicy;

/// Overdue record paired with the day count the dashboards display
#[derive(Debug, Clone)]
pub struct OverdueLoan {
    pub record: BorrowRecord,
    pub days_overdue: i64,
}

#[derive(Clone)]
pub struct LoansService {
    api: ApiClient,
    confirm: Arc<dyn ConfirmationPolicy>,
}

impl LoansService {
    pub fn new(api: ApiClient, confirm: Arc<dyn ConfirmationPolicy>) -> Self {
        Self { api, confirm }
    }

    /// Borrow a book. The backend creates the record with the loan-period
    /// due date and decrements availability; a book with no copies left is
    /// rejected with the server's message. `None` means the user declined.
    pub async fn borrow_book(&self, book_id: i64) -> AppResult<Option<BorrowRecord>> {
        if !self.confirm.confirm("Do you want to borrow this book?").await {
            return Ok(None);
        }
        let record = self.api.borrows.create(book_id).await?;
        tracing::debug!(borrow_id = record.id, book_id, "Borrow created");
        Ok(Some(record))
    }

    /// Return a borrowed book. Double returns are rejected by the backend;
    /// no local check is attempted. `None` means the user declined.
    pub async fn return_book(&self, borrow_id: i64) -> AppResult<Option<BorrowRecord>> {
        if !self.confirm.confirm("Do you want to return this book?").await {
            return Ok(None);
        }
        let record = self.api.borrows.return_record(borrow_id).await?;
        tracing::debug!(borrow_id, "Borrow returned");
        Ok(Some(record))
    }

    /// Borrow records of one user
    pub async fn user_loans(&self, user_id: i64) -> AppResult<Vec<BorrowRecord>> {
        self.api.borrows.list_for_user(user_id).await
    }

    /// Every borrow record, for the admin view
    pub async fn all_loans(&self) -> AppResult<Vec<BorrowRecord>> {
        self.api.borrows.list().await
    }

    /// Overdue loans with their display day count. The server pre-filters;
    /// a non-positive count is kept and logged as a data anomaly rather
    /// than treated as an error.
    pub async fn overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueLoan>> {
        let records = self.api.borrows.overdue().await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let days_overdue = record.days_overdue(now);
                if days_overdue <= 0 {
                    tracing::warn!(
                        borrow_id = record.id,
                        days_overdue,
                        "Overdue listing returned a record that is not past due"
                    );
                }
                OverdueLoan {
                    record,
                    days_overdue,
                }
            })
            .collect())
    }
}
