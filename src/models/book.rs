//! Book entity and read models
//!
//! The `status` column is a denormalized cache. The authoritative
//! availability signal is the existence of an active loan row, so the
//! cache is refreshed only as a side effect of loan transitions and
//! never consulted for borrowing decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::ids::{BookId, Isbn, LoanId, UserId};

/// Binary availability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Borrowed => "BORROWED",
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(BookStatus::Available),
            "BORROWED" => Ok(BookStatus::Borrowed),
            other => Err(AppError::Internal(format!(
                "unknown book status in storage: {other}"
            ))),
        }
    }
}

/// Book entity
#[derive(Debug, Clone)]
pub struct Book {
    id: BookId,
    isbn: Isbn,
    title: String,
    author: String,
    status: BookStatus,
}

impl Book {
    /// New books start out available
    pub fn new(id: BookId, isbn: Isbn, title: String, author: String) -> Self {
        Self {
            id,
            isbn,
            title,
            author,
            status: BookStatus::Available,
        }
    }

    /// Rehydrates a book from persisted state
    pub fn from_parts(
        id: BookId,
        isbn: Isbn,
        title: String,
        author: String,
        status: BookStatus,
    ) -> Self {
        Self {
            id,
            isbn,
            title,
            author,
            status,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn mark_borrowed(&mut self) -> AppResult<()> {
        if !self.is_available() {
            return Err(AppError::Conflict("book is already borrowed".to_string()));
        }
        self.status = BookStatus::Borrowed;
        Ok(())
    }

    pub fn mark_available(&mut self) -> AppResult<()> {
        if self.is_available() {
            return Err(AppError::Conflict("book is already available".to_string()));
        }
        self.status = BookStatus::Available;
        Ok(())
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub status: String,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Book::from_parts(
            BookId::new(&row.id)?,
            Isbn::new(&row.isbn)?,
            row.title,
            row.author,
            row.status.parse()?,
        ))
    }
}

/// Register book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    /// 13-digit ISBN, hyphens and spaces allowed
    pub isbn: String,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: String,
}

/// Current loan summary embedded in a book read model
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanSummary {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Denormalized book projection for list/detail display
///
/// `available` is derived from loan existence, not from the stored
/// status cache.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    pub id: BookId,
    pub isbn: Isbn,
    pub isbn_formatted: String,
    pub title: String,
    pub author: String,
    pub available: bool,
    pub current_loan: Option<LoanSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book::new(
            BookId::new("b-1").unwrap(),
            Isbn::new("9783161484100").unwrap(),
            "The Trial".to_string(),
            "Franz Kafka".to_string(),
        )
    }

    #[test]
    fn new_book_is_available() {
        assert!(book().is_available());
        assert_eq!(book().status(), BookStatus::Available);
    }

    #[test]
    fn mark_borrowed_then_available_roundtrip() {
        let mut b = book();
        b.mark_borrowed().unwrap();
        assert!(!b.is_available());
        b.mark_available().unwrap();
        assert!(b.is_available());
    }

    #[test]
    fn mark_borrowed_twice_conflicts() {
        let mut b = book();
        b.mark_borrowed().unwrap();
        assert!(matches!(b.mark_borrowed(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn mark_available_when_available_conflicts() {
        let mut b = book();
        assert!(matches!(b.mark_available(), Err(AppError::Conflict(_))));
    }
}
