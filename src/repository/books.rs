//! Books repository for database operations
//!
//! Entity reads/writes plus the denormalized book+loan projections for
//! list and detail display. Availability in the projections is derived
//! from active-loan existence, not from the status cache column.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Row};

use crate::{
    error::AppResult,
    models::book::{Book, BookRow, BookView, LoanSummary},
    models::ids::{BookId, Isbn, LoanId, UserId},
};

#[derive(Clone)]
pub struct BooksRepository;

const BOOK_VIEW_SQL: &str = r#"
    SELECT b.id, b.isbn, b.title, b.author,
           l.id AS loan_id, l.user_id, l.borrowed_at, l.due_date
    FROM books b
    LEFT JOIN loans l ON l.book_id = b.id AND l.returned_at IS NULL
"#;

impl BooksRepository {
    pub fn new() -> Self {
        Self
    }

    /// Get book by ID; a normal miss is `None`, never an error
    pub async fn find_by_id(
        &self,
        conn: &mut PgConnection,
        id: &BookId,
    ) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, isbn, title, author, status FROM books WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;

        row.map(Book::try_from).transpose()
    }

    /// Persist full book state, idempotent by identity
    pub async fn save(&self, conn: &mut PgConnection, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, isbn, title, author, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                isbn = EXCLUDED.isbn,
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                status = EXCLUDED.status
            "#,
        )
        .bind(book.id().as_str())
        .bind(book.isbn().as_str())
        .bind(book.title())
        .bind(book.author())
        .bind(book.status().as_str())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// List all books with their current loan, ordered by title
    pub async fn list_views(&self, conn: &mut PgConnection) -> AppResult<Vec<BookView>> {
        let rows = sqlx::query(&format!("{BOOK_VIEW_SQL} ORDER BY b.title"))
            .fetch_all(conn)
            .await?;

        rows.into_iter().map(Self::view_from_row).collect()
    }

    /// Get a single book projection with its current loan
    pub async fn find_view(
        &self,
        conn: &mut PgConnection,
        id: &BookId,
    ) -> AppResult<Option<BookView>> {
        let row = sqlx::query(&format!("{BOOK_VIEW_SQL} WHERE b.id = $1"))
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?;

        row.map(Self::view_from_row).transpose()
    }

    fn view_from_row(row: sqlx::postgres::PgRow) -> AppResult<BookView> {
        let isbn = Isbn::new(row.get("isbn"))?;
        let loan_id: Option<String> = row.get("loan_id");

        let current_loan = match loan_id {
            Some(loan_id) => {
                let user_id: String = row.get("user_id");
                let borrowed_at: DateTime<Utc> = row.get("borrowed_at");
                let due_date: DateTime<Utc> = row.get("due_date");
                Some(LoanSummary {
                    loan_id: LoanId::new(&loan_id)?,
                    user_id: UserId::new(&user_id)?,
                    borrowed_at,
                    due_date,
                })
            }
            None => None,
        };

        Ok(BookView {
            id: BookId::new(row.get("id"))?,
            isbn_formatted: isbn.formatted(),
            isbn,
            title: row.get("title"),
            author: row.get("author"),
            available: current_loan.is_none(),
            current_loan,
        })
    }
}

impl Default for BooksRepository {
    fn default() -> Self {
        Self::new()
    }
}
