//! Catalog endpoints

use reqwest::Method;

use crate::error::AppResult;
use crate::models::book::{Book, BookDraft, BookQuery};

use super::Http;

#[derive(Clone)]
pub struct BooksApi {
    http: Http,
}

impl BooksApi {
    pub(super) fn new(http: Http) -> Self {
        Self { http }
    }

    /// List catalog entries. Absent filters are omitted from the query
    /// string; an empty result is a valid answer, not an error.
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.http
            .send(self.http.request(Method::GET, "/books").query(query))
            .await
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.http
            .send(self.http.request(Method::GET, &format!("/books/{}", id)))
            .await
    }

    pub async fn create(&self, draft: &BookDraft) -> AppResult<Book> {
        self.http
            .send(self.http.request(Method::POST, "/books").json(draft))
            .await
    }

    pub async fn update(&self, id: i64, draft: &BookDraft) -> AppResult<Book> {
        self.http
            .send(
                self.http
                    .request(Method::PUT, &format!("/books/{}", id))
                    .json(draft),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.http
            .send_unit(self.http.request(Method::DELETE, &format!("/books/{}", id)))
            .await
    }
}
