//! Admin dashboard controller

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookDraft, BookQuery};
use crate::models::borrow::BorrowRecord;
use crate::models::user::{Role, StudentSummary, User};
use crate::services::auth::{AuthFailure, Screen};
use crate::services::loans::OverdueLoan;
use crate::services::Services;
use crate::session::SessionManager;

use super::Access;

pub struct AdminDashboard {
    services: Arc<Services>,
    user: User,
    pub books: Vec<Book>,
    pub borrows: Vec<BorrowRecord>,
    pub overdue: Vec<OverdueLoan>,
    pub students: Vec<StudentSummary>,
}

impl AdminDashboard {
    /// Gate the view for the admin role and load the books tab.
    /// Waits for the session to finish loading before deciding anything.
    pub async fn open(
        session: Arc<SessionManager>,
        services: Arc<Services>,
    ) -> AppResult<Access<Self>> {
        session.ready().await;
        if let Some(target) = services.auth.gate(Role::Admin) {
            return Ok(Access::Redirect(target));
        }
        let Some(user) = session.user() else {
            return Ok(Access::Redirect(Screen::Login));
        };

        let mut dashboard = Self {
            services,
            user,
            books: Vec::new(),
            borrows: Vec::new(),
            overdue: Vec::new(),
            students: Vec::new(),
        };
        dashboard.refresh_books(&BookQuery::default()).await?;
        Ok(Access::Granted(dashboard))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Books tab, optionally filtered by search term and category
    pub async fn refresh_books(&mut self, query: &BookQuery) -> AppResult<()> {
        self.books = self.services.catalog.list_books(query).await?;
        Ok(())
    }

    /// Borrows tab
    pub async fn refresh_borrows(&mut self) -> AppResult<()> {
        self.borrows = self.services.loans.all_loans().await?;
        Ok(())
    }

    /// Overdue tab with display day counts
    pub async fn refresh_overdue(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.overdue = self.services.loans.overdue(now).await?;
        Ok(())
    }

    /// Students tab
    pub async fn refresh_students(&mut self) -> AppResult<()> {
        self.students = self.services.auth.students().await?;
        Ok(())
    }

    /// Single-book fetch used to populate the edit form
    pub async fn edit_book(&self, book_id: i64) -> AppResult<Book> {
        self.services.catalog.get_book(book_id).await
    }

    /// Create (no id) or update (with id) a catalog entry, then re-sync
    /// the books tab
    pub async fn save_book(&mut self, id: Option<i64>, draft: &BookDraft) -> AppResult<Book> {
        let book = match id {
            Some(id) => self.services.catalog.update_book(id, draft).await?,
            None => self.services.catalog.create_book(draft).await?,
        };
        self.refresh_books(&BookQuery::default()).await?;
        Ok(book)
    }

    /// Delete a catalog entry after confirmation; false means declined
    pub async fn delete_book(&mut self, book_id: i64) -> AppResult<bool> {
        if self.services.catalog.delete_book(book_id).await?.is_none() {
            return Ok(false);
        }
        self.refresh_books(&BookQuery::default()).await?;
        Ok(true)
    }

    /// Mark a borrow returned on the student's behalf; false means declined
    pub async fn mark_returned(&mut self, borrow_id: i64) -> AppResult<bool> {
        if self.services.loans.return_book(borrow_id).await?.is_none() {
            return Ok(false);
        }
        self.refresh_borrows().await?;
        Ok(true)
    }

    /// Apply the session policy to a 401/403 from any tab load
    pub fn handle_auth_error(&self, error: &AppError) -> AuthFailure {
        self.services.auth.on_auth_error(error)
    }
}
