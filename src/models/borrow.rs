//! Borrow record model and loan schedule arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Loan period the backend applies when a borrow is created
pub const LOAN_PERIOD_DAYS: i64 = 14;

const SECONDS_PER_DAY: i64 = 86_400;

/// Lifecycle state of a borrow record.
///
/// The only permitted transition is borrowed -> returned, enforced by the
/// backend; the client never changes a record's status locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BorrowStatus::Borrowed => write!(f, "borrowed"),
            BorrowStatus::Returned => write!(f, "returned"),
        }
    }
}

/// One loan of one book copy to one user.
///
/// `book_title`/`book_author` are denormalized by the backend for display;
/// `user_name` only appears in the admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub book_author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: BorrowStatus,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        self.status == BorrowStatus::Borrowed
    }

    /// An active record past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.due_date < now
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_remaining(self.due_date, now)
    }

    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        days_overdue(self.due_date, now)
    }

    pub fn progress_percent(&self, now: DateTime<Utc>) -> i64 {
        progress_percent(self.borrow_date, self.due_date, now)
    }
}

// Ceiling of a second count in whole days. Rust's integer division already
// truncates toward zero, which is the ceiling for negative values.
fn ceil_days(seconds: i64) -> i64 {
    if seconds > 0 {
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    } else {
        seconds / SECONDS_PER_DAY
    }
}

/// Whole days until the due date, partial days rounded up.
/// Negative once the due date has passed.
pub fn days_remaining(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days((due - now).num_seconds())
}

/// Whole days past the due date, partial days rounded up
pub fn days_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days((now - due).num_seconds())
}

/// Elapsed share of the loan period as an integer percentage in [0, 100].
/// A zero-length loan period counts as fully elapsed.
pub fn progress_percent(
    borrow: DateTime<Utc>,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    let total = (due - borrow).num_seconds();
    if total <= 0 {
        return 100;
    }
    let elapsed = (now - borrow).num_seconds();
    let percent = (elapsed as f64 / total as f64 * 100.0).round() as i64;
    percent.clamp(0, 100)
}

/// Short display date in the "Mar 4, 2026" form the tables show
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
