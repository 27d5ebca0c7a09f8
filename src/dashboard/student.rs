//! Student dashboard controller

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::book::{Book, BookQuery};
use crate::models::borrow::{format_date, BorrowRecord};
use crate::models::user::{Role, User};
use crate::services::auth::Screen;
use crate::services::Services;
use crate::session::SessionManager;

use super::Access;

/// Number of books shown in the featured strip
const FEATURED_COUNT: usize = 6;

/// Search terms shorter than this reset to the unfiltered catalog
const MIN_SEARCH_LEN: usize = 2;

/// Display values the loan list renders per record
#[derive(Debug, Clone)]
pub struct LoanProgress {
    pub days_remaining: i64,
    pub percent: i64,
    pub due_label: String,
}

pub struct StudentDashboard {
    services: Arc<Services>,
    user: User,
    pub books: Vec<Book>,
    pub loans: Vec<BorrowRecord>,
}

impl StudentDashboard {
    /// Gate the view for the student role and perform the initial load.
    /// Waits for the session to finish loading before deciding anything.
    pub async fn open(
        session: Arc<SessionManager>,
        services: Arc<Services>,
    ) -> AppResult<Access<Self>> {
        session.ready().await;
        if let Some(target) = services.auth.gate(Role::Student) {
            return Ok(Access::Redirect(target));
        }
        let Some(user) = session.user() else {
            return Ok(Access::Redirect(Screen::Login));
        };

        let mut dashboard = Self {
            services,
            user,
            books: Vec::new(),
            loans: Vec::new(),
        };
        dashboard.refresh().await?;
        Ok(Access::Granted(dashboard))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Re-fetch both collections; sequenced after every mutation
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.books = self.services.catalog.list_books(&BookQuery::default()).await?;
        self.loans = self.services.loans.user_loans(self.user.id).await?;
        Ok(())
    }

    /// Featured strip: the first few entries of the current list
    pub fn featured(&self) -> &[Book] {
        &self.books[..self.books.len().min(FEATURED_COUNT)]
    }

    /// Incremental search; terms below the threshold reset the list
    pub async fn search(&mut self, term: &str) -> AppResult<()> {
        let query = if term.len() < MIN_SEARCH_LEN {
            BookQuery::default()
        } else {
            BookQuery::search(term)
        };
        self.books = self.services.catalog.list_books(&query).await?;
        Ok(())
    }

    /// Filter the catalog by category; an empty category resets
    pub async fn filter_category(&mut self, category: &str) -> AppResult<()> {
        let query = if category.is_empty() {
            BookQuery::default()
        } else {
            BookQuery::category(category)
        };
        self.books = self.services.catalog.list_books(&query).await?;
        Ok(())
    }

    /// Detail fetch for the sidebar
    pub async fn book_details(&self, book_id: i64) -> AppResult<Book> {
        self.services.catalog.get_book(book_id).await
    }

    /// Borrow a book, then bring both views back in sync with the
    /// backend. `None` means the user declined the confirmation.
    pub async fn borrow(&mut self, book_id: i64) -> AppResult<Option<BorrowRecord>> {
        let Some(record) = self.services.loans.borrow_book(book_id).await? else {
            return Ok(None);
        };
        self.refresh().await?;
        Ok(Some(record))
    }

    /// Return a borrowed book and re-sync. `None` means declined.
    pub async fn return_book(&mut self, borrow_id: i64) -> AppResult<Option<BorrowRecord>> {
        let Some(record) = self.services.loans.return_book(borrow_id).await? else {
            return Ok(None);
        };
        self.refresh().await?;
        Ok(Some(record))
    }

    /// Display state for one of the user's loans
    pub fn reading_progress(&self, record: &BorrowRecord, now: DateTime<Utc>) -> LoanProgress {
        LoanProgress {
            days_remaining: record.days_remaining(now),
            percent: record.progress_percent(now),
            due_label: format_date(record.due_date),
        }
    }
}
