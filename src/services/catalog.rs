//! Catalog operations for both dashboards

use std::sync::Arc;

use validator::Validate;

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::book::{Book, BookDraft, BookQuery};

use super::ConfirmationPolicy;

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    confirm: Arc<dyn ConfirmationPolicy>,
}

impl CatalogService {
    pub fn new(api: ApiClient, confirm: Arc<dyn ConfirmationPolicy>) -> Self {
        Self { api, confirm }
    }

    /// List catalog entries; both filters are AND-combined by the backend
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.api.books.list(query).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.api.books.get(id).await
    }

    /// Create a catalog entry (admin). Field checks run before any
    /// request is issued.
    pub async fn create_book(&self, draft: &BookDraft) -> AppResult<Book> {
        draft.validate()?;
        self.api.books.create(draft).await
    }

    /// Update a catalog entry (admin), with the same field checks
    pub async fn update_book(&self, id: i64, draft: &BookDraft) -> AppResult<Book> {
        draft.validate()?;
        self.api.books.update(id, draft).await
    }

    /// Delete a catalog entry (admin). Deletion is irreversible, so the
    /// policy is asked first; `None` means the user declined.
    pub async fn delete_book(&self, id: i64) -> AppResult<Option<()>> {
        let confirmed = self
            .confirm
            .confirm("Are you sure you want to delete this book? This action cannot be undone.")
            .await;
        if !confirmed {
            tracing::debug!(book_id = id, "Delete declined");
            return Ok(None);
        }
        self.api.books.delete(id).await?;
        Ok(Some(()))
    }
}
