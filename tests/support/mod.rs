//! In-process stub of the Libris REST backend.
//!
//! Implements the wire contract the client is written against, including
//! the business rules the real backend enforces: availability bookkeeping
//! on borrow/return, rejection of zero-availability borrows and double
//! returns, and bearer-token authentication with role checks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use libris_client::models::book::Book;
use libris_client::models::borrow::{BorrowRecord, BorrowStatus, LOAN_PERIOD_DAYS};
use libris_client::models::user::{Role, User};

pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

pub struct BackendState {
    pub books: Mutex<Vec<Book>>,
    pub borrows: Mutex<Vec<BorrowRecord>>,
    tokens: Mutex<HashMap<String, User>>,
    next_book_id: AtomicI64,
    next_borrow_id: AtomicI64,
    next_token: AtomicUsize,
    pub create_book_hits: AtomicUsize,
    pub register_hits: AtomicUsize,
}

fn admin_account() -> User {
    User {
        id: 1,
        name: "Alice Admin".to_string(),
        email: "admin@library.io".to_string(),
        role: Role::Admin,
    }
}

fn student_account() -> User {
    User {
        id: 2,
        name: "Sam Student".to_string(),
        email: "student@library.io".to_string(),
        role: Role::Student,
    }
}

impl BackendState {
    fn new() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            borrows: Mutex::new(Vec::new()),
            tokens: Mutex::new(HashMap::new()),
            next_book_id: AtomicI64::new(1),
            next_borrow_id: AtomicI64::new(1),
            next_token: AtomicUsize::new(1),
            create_book_hits: AtomicUsize::new(0),
            register_hits: AtomicUsize::new(0),
        }
    }

    pub fn seed_book(
        &self,
        title: &str,
        author: &str,
        isbn: &str,
        category: &str,
        total_copies: i32,
        available_copies: i32,
    ) -> i64 {
        let id = self.next_book_id.fetch_add(1, Ordering::SeqCst);
        self.books.lock().unwrap().push(Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            category: Some(category.to_string()),
            total_copies,
            available_copies,
        });
        id
    }

    pub fn seed_borrow(
        &self,
        user_id: i64,
        book_id: i64,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
        status: BorrowStatus,
    ) -> i64 {
        let id = self.next_borrow_id.fetch_add(1, Ordering::SeqCst);
        let (title, author) = {
            let books = self.books.lock().unwrap();
            books
                .iter()
                .find(|b| b.id == book_id)
                .map(|b| (b.title.clone(), b.author.clone()))
                .unwrap_or_default()
        };
        let user_name = if user_id == 1 {
            Some(admin_account().name)
        } else {
            Some(student_account().name)
        };
        self.borrows.lock().unwrap().push(BorrowRecord {
            id,
            user_id,
            book_id,
            book_title: title,
            book_author: author,
            user_name,
            borrow_date,
            due_date,
            status,
        });
        id
    }

    pub fn book(&self, id: i64) -> Option<Book> {
        self.books.lock().unwrap().iter().find(|b| b.id == id).cloned()
    }

    pub fn borrow_record(&self, id: i64) -> Option<BorrowRecord> {
        self.borrows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    fn mint_token(&self, user: &User) -> String {
        let token = format!("stub-token-{}", self.next_token.fetch_add(1, Ordering::SeqCst));
        self.tokens.lock().unwrap().insert(token.clone(), user.clone());
        token
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authed(state: &BackendState, headers: &HeaderMap) -> Result<User, Response> {
    let user = bearer(headers).and_then(|token| state.tokens.lock().unwrap().get(&token).cloned());
    user.ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Session expired"))
}

fn admin_only(state: &BackendState, headers: &HeaderMap) -> Result<User, Response> {
    let user = authed(state, headers)?;
    if user.role != Role::Admin {
        return Err(message(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(user)
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<BackendState>>,
    Json(payload): Json<LoginPayload>,
) -> Response {
    let account = match (payload.email.as_str(), payload.password.as_str()) {
        ("admin@library.io", "admin123") => admin_account(),
        ("student@library.io", "student123") => student_account(),
        _ => return message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    let token = state.mint_token(&account);
    Json(json!({ "token": token, "user": account })).into_response()
}

async fn register(State(state): State<Arc<BackendState>>, Json(_body): Json<serde_json::Value>) -> Response {
    state.register_hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!({ "message": "Registered" }))).into_response()
}

async fn students(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = admin_only(&state, &headers) {
        return response;
    }
    let student = student_account();
    let books_count = state
        .borrows
        .lock()
        .unwrap()
        .iter()
        .filter(|b| b.user_id == student.id && b.status == BorrowStatus::Borrowed)
        .count();
    Json(json!([{
        "id": student.id,
        "name": student.name,
        "email": student.email,
        "books_count": books_count,
        "created_at": Utc::now(),
    }]))
    .into_response()
}

async fn list_books(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let search = params.get("search").map(|s| s.to_lowercase());
    let category = params.get("category").map(|s| s.to_lowercase());
    let books: Vec<Book> = state
        .books
        .lock()
        .unwrap()
        .iter()
        .filter(|book| {
            let matches_search = search.as_ref().map_or(true, |term| {
                book.title.to_lowercase().contains(term)
                    || book.author.to_lowercase().contains(term)
                    || book.isbn.to_lowercase().contains(term)
            });
            let matches_category = category.as_ref().map_or(true, |wanted| {
                book.category
                    .as_ref()
                    .map_or(false, |c| c.to_lowercase() == *wanted)
            });
            matches_search && matches_category
        })
        .cloned()
        .collect();
    Json(books).into_response()
}

async fn get_book(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    match state.book(id) {
        Some(book) => Json(book).into_response(),
        None => message(StatusCode::NOT_FOUND, "Book not found"),
    }
}

#[derive(Deserialize)]
struct BookPayload {
    title: String,
    author: String,
    isbn: String,
    category: String,
    total_copies: i32,
}

async fn create_book(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(payload): Json<BookPayload>,
) -> Response {
    if let Err(response) = admin_only(&state, &headers) {
        return response;
    }
    state.create_book_hits.fetch_add(1, Ordering::SeqCst);
    let id = state.next_book_id.fetch_add(1, Ordering::SeqCst);
    let book = Book {
        id,
        title: payload.title,
        author: payload.author,
        isbn: payload.isbn,
        category: Some(payload.category),
        total_copies: payload.total_copies,
        available_copies: payload.total_copies,
    };
    state.books.lock().unwrap().push(book.clone());
    (StatusCode::CREATED, Json(book)).into_response()
}

async fn update_book(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> Response {
    if let Err(response) = admin_only(&state, &headers) {
        return response;
    }
    let mut books = state.books.lock().unwrap();
    let Some(book) = books.iter_mut().find(|b| b.id == id) else {
        return message(StatusCode::NOT_FOUND, "Book not found");
    };
    let delta = payload.total_copies - book.total_copies;
    book.title = payload.title;
    book.author = payload.author;
    book.isbn = payload.isbn;
    book.category = Some(payload.category);
    book.total_copies = payload.total_copies;
    book.available_copies = (book.available_copies + delta).clamp(0, payload.total_copies);
    Json(book.clone()).into_response()
}

async fn delete_book(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = admin_only(&state, &headers) {
        return response;
    }
    let mut books = state.books.lock().unwrap();
    let before = books.len();
    books.retain(|b| b.id != id);
    if books.len() == before {
        return message(StatusCode::NOT_FOUND, "Book not found");
    }
    Json(json!({ "message": "Book deleted" })).into_response()
}

async fn list_borrows(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = admin_only(&state, &headers) {
        return response;
    }
    Json(state.borrows.lock().unwrap().clone()).into_response()
}

async fn user_borrows(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let records: Vec<BorrowRecord> = state
        .borrows
        .lock()
        .unwrap()
        .iter()
        .filter(|b| b.user_id == user_id)
        .cloned()
        .collect();
    Json(records).into_response()
}

async fn overdue_borrows(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }
    let now = Utc::now();
    let records: Vec<BorrowRecord> = state
        .borrows
        .lock()
        .unwrap()
        .iter()
        .filter(|b| b.status == BorrowStatus::Borrowed && b.due_date < now)
        .cloned()
        .collect();
    Json(records).into_response()
}

#[derive(Deserialize)]
struct CreateBorrowPayload {
    book_id: i64,
}

async fn create_borrow(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBorrowPayload>,
) -> Response {
    let user = match authed(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let mut books = state.books.lock().unwrap();
    let Some(book) = books.iter_mut().find(|b| b.id == payload.book_id) else {
        return message(StatusCode::NOT_FOUND, "Book not found");
    };
    if book.available_copies == 0 {
        return message(StatusCode::CONFLICT, "No copies available");
    }
    book.available_copies -= 1;

    let now = Utc::now();
    let id = state.next_borrow_id.fetch_add(1, Ordering::SeqCst);
    let record = BorrowRecord {
        id,
        user_id: user.id,
        book_id: book.id,
        book_title: book.title.clone(),
        book_author: book.author.clone(),
        user_name: Some(user.name),
        borrow_date: now,
        due_date: now + chrono::Duration::days(LOAN_PERIOD_DAYS),
        status: BorrowStatus::Borrowed,
    };
    drop(books);
    state.borrows.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn return_borrow(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = authed(&state, &headers) {
        return response;
    }

    let mut borrows = state.borrows.lock().unwrap();
    let Some(record) = borrows.iter_mut().find(|b| b.id == id) else {
        return message(StatusCode::NOT_FOUND, "Borrow record not found");
    };
    if record.status == BorrowStatus::Returned {
        return message(StatusCode::CONFLICT, "Book already returned");
    }
    record.status = BorrowStatus::Returned;
    let record = record.clone();
    drop(borrows);

    let mut books = state.books.lock().unwrap();
    if let Some(book) = books.iter_mut().find(|b| b.id == record.book_id) {
        book.available_copies = (book.available_copies + 1).min(book.total_copies);
    }
    Json(record).into_response()
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/students", get(students))
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/api/borrows", get(list_borrows).post(create_borrow))
        .route("/api/borrows/user/:id", get(user_borrows))
        .route("/api/borrows/overdue", get(overdue_borrows))
        .route("/api/borrows/:id/return", put(return_borrow))
        .with_state(state)
}

pub async fn spawn() -> StubBackend {
    let state = Arc::new(BackendState::new());
    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub backend");
    });
    StubBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}
