//! Loans repository for database operations
//!
//! The loans table is the single source of truth for availability: a
//! book is borrowed exactly when an active (unreturned) loan row
//! references it.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::ids::{BookId, LoanId, UserId},
    models::loan::{Loan, LoanRow, LoanView},
};

#[derive(Clone)]
pub struct LoansRepository;

const LOAN_COLUMNS: &str =
    "id, user_id, book_id, borrowed_at, due_date, returned_at, extension_count";

impl LoansRepository {
    pub fn new() -> Self {
        Self
    }

    /// Get loan by ID; a normal miss is `None`, never an error
    pub async fn find_by_id(
        &self,
        conn: &mut PgConnection,
        id: &LoanId,
    ) -> AppResult<Option<Loan>> {
        let row = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;

        row.map(Loan::try_from).transpose()
    }

    /// Persist full loan state, idempotent by identity
    pub async fn save(&self, conn: &mut PgConnection, loan: &Loan) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, user_id, book_id, borrowed_at, due_date, returned_at, extension_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                due_date = EXCLUDED.due_date,
                returned_at = EXCLUDED.returned_at,
                extension_count = EXCLUDED.extension_count
            "#,
        )
        .bind(loan.id().as_str())
        .bind(loan.user_id().as_str())
        .bind(loan.book_id().as_str())
        .bind(loan.borrowed_at())
        .bind(loan.due_date())
        .bind(loan.returned_at())
        .bind(loan.extension_count())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Active loans for a member
    pub async fn find_active_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: &UserId,
    ) -> AppResult<Vec<Loan>> {
        let rows = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans \
             WHERE user_id = $1 AND returned_at IS NULL ORDER BY borrowed_at"
        ))
        .bind(user_id.as_str())
        .fetch_all(conn)
        .await?;

        rows.into_iter().map(Loan::try_from).collect()
    }

    /// Active loans for a member already past their due date
    pub async fn find_overdue_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Loan>> {
        let rows = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans \
             WHERE user_id = $1 AND returned_at IS NULL AND due_date < $2 \
             ORDER BY due_date"
        ))
        .bind(user_id.as_str())
        .bind(now)
        .fetch_all(conn)
        .await?;

        rows.into_iter().map(Loan::try_from).collect()
    }

    /// The active loan referencing a book, if any
    ///
    /// A partial unique index guarantees at most one active loan per
    /// book, so `fetch_optional` is safe here.
    pub async fn find_active_by_book(
        &self,
        conn: &mut PgConnection,
        book_id: &BookId,
    ) -> AppResult<Option<Loan>> {
        let row = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE book_id = $1 AND returned_at IS NULL"
        ))
        .bind(book_id.as_str())
        .fetch_optional(conn)
        .await?;

        row.map(Loan::try_from).transpose()
    }

    /// Active loan projections for a member's loan list
    pub async fn list_views_by_user(
        &self,
        conn: &mut PgConnection,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<LoanView>> {
        let rows = sqlx::query_as::<_, LoanViewRow>(
            r#"
            SELECT l.id, l.user_id, l.book_id, l.borrowed_at, l.due_date,
                   l.returned_at, l.extension_count, b.title
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1 AND l.returned_at IS NULL
            ORDER BY l.due_date
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(conn)
        .await?;

        rows.into_iter()
            .map(|row| {
                let title = row.title;
                let loan = Loan::try_from(row.loan)?;
                Ok(LoanView {
                    loan_id: loan.id().clone(),
                    book_id: loan.book_id().clone(),
                    title,
                    borrowed_at: loan.borrowed_at(),
                    due_date: loan.due_date(),
                    extension_count: loan.extension_count(),
                    is_overdue: loan.is_overdue(now),
                    can_extend: loan.can_extend(now),
                })
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct LoanViewRow {
    #[sqlx(flatten)]
    loan: LoanRow,
    title: String,
}

impl Default for LoansRepository {
    fn default() -> Self {
        Self::new()
    }
}
