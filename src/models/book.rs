//! Book model and catalog request types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog entry as returned by the backend.
///
/// `available_copies` is maintained server-side by borrow/return actions;
/// the client only ever displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    /// A book can be borrowed while at least one copy is on the shelf
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Status badge text in the "Available (2/3)" form the tables show
    pub fn status_label(&self) -> String {
        if self.is_available() {
            format!("Available ({}/{})", self.available_copies, self.total_copies)
        } else {
            format!("Unavailable (0/{})", self.total_copies)
        }
    }
}

/// Payload for creating or updating a catalog entry.
///
/// Field checks run client-side before any request is issued.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookDraft {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    pub category: String,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
}

/// Catalog list filters; both are AND-combined by the backend when present
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BookQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            category: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            search: None,
            category: Some(category.into()),
        }
    }
}
