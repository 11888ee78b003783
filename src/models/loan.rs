//! Loan entity and state machine
//!
//! A loan is Active from creation until exactly one return records a
//! terminal state. While active it may be extended up to twice, seven
//! days per extension, and never once overdue.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::ids::{BookId, LoanId, UserId};

/// Loan period granted at borrow time
pub const LOAN_PERIOD_DAYS: i64 = 14;
/// Days added per extension
pub const EXTENSION_DAYS: i64 = 7;
/// Maximum extensions per loan
pub const MAX_EXTENSIONS: i16 = 2;

/// Loan entity
#[derive(Debug, Clone)]
pub struct Loan {
    id: LoanId,
    user_id: UserId,
    book_id: BookId,
    borrowed_at: DateTime<Utc>,
    due_date: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
    extension_count: i16,
}

impl Loan {
    /// Creates an active loan due `LOAN_PERIOD_DAYS` from now
    pub fn create(id: LoanId, user_id: UserId, book_id: BookId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            book_id,
            borrowed_at: now,
            due_date: now + Duration::days(LOAN_PERIOD_DAYS),
            returned_at: None,
            extension_count: 0,
        }
    }

    /// Rehydrates a loan from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: LoanId,
        user_id: UserId,
        book_id: BookId,
        borrowed_at: DateTime<Utc>,
        due_date: DateTime<Utc>,
        returned_at: Option<DateTime<Utc>>,
        extension_count: i16,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            borrowed_at,
            due_date,
            returned_at,
            extension_count,
        }
    }

    /// A loan with no recorded return date is active
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Returned loans are never overdue
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now > self.due_date
    }

    pub fn can_extend(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && !self.is_overdue(now) && self.extension_count < MAX_EXTENSIONS
    }

    /// Terminal transition; fails on a second call
    pub fn record_return(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::AlreadyReturned);
        }
        self.returned_at = Some(now);
        Ok(())
    }

    /// Postpones the due date by `EXTENSION_DAYS`
    ///
    /// Each successful call mutates state, so callers must not retry
    /// blindly.
    pub fn extend(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::AlreadyReturned);
        }
        if self.is_overdue(now) {
            return Err(AppError::Overdue);
        }
        if self.extension_count >= MAX_EXTENSIONS {
            return Err(AppError::ExtensionLimit);
        }
        self.due_date += Duration::days(EXTENSION_DAYS);
        self.extension_count += 1;
        Ok(())
    }

    pub fn id(&self) -> &LoanId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn borrowed_at(&self) -> DateTime<Utc> {
        self.borrowed_at
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }

    pub fn extension_count(&self) -> i16 {
        self.extension_count
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub extension_count: i16,
}

impl TryFrom<LoanRow> for Loan {
    type Error = AppError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        Ok(Loan::from_parts(
            LoanId::new(&row.id)?,
            UserId::new(&row.user_id)?,
            BookId::new(&row.book_id)?,
            row.borrowed_at,
            row.due_date,
            row.returned_at,
            row.extension_count,
        ))
    }
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowBook {
    /// 8-digit member identifier
    pub user_id: String,
    /// Book identifier
    pub book_id: String,
}

/// Successful borrow payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowReceipt {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Successful return payload with computed fees
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnReceipt {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: DateTime<Utc>,
    pub days_late: i64,
    pub late_fee: Decimal,
    pub was_overdue: bool,
}

/// Successful extension payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExtendReceipt {
    pub loan_id: LoanId,
    pub previous_due_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub extension_count: i16,
}

/// Active loan projection for a member's loan list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanView {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub title: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub extension_count: i16,
    pub is_overdue: bool,
    pub can_extend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn loan(now: DateTime<Utc>) -> Loan {
        Loan::create(
            LoanId::new("l-1").unwrap(),
            UserId::new("12345678").unwrap(),
            BookId::new("b-1").unwrap(),
            now,
        )
    }

    #[test]
    fn create_sets_due_date_two_weeks_out() {
        let now = ts();
        let l = loan(now);
        assert_eq!(l.due_date(), now + Duration::days(14));
        assert_eq!(l.extension_count(), 0);
        assert!(l.returned_at().is_none());
        assert!(l.is_active());
    }

    #[test]
    fn extend_is_monotonic_and_bounded() {
        let now = ts();
        let mut l = loan(now);
        l.extend(now).unwrap();
        assert_eq!(l.due_date(), now + Duration::days(14 + 7));
        l.extend(now).unwrap();
        assert_eq!(l.due_date(), now + Duration::days(14 + 14));
        assert_eq!(l.extension_count(), 2);
        assert!(matches!(l.extend(now), Err(AppError::ExtensionLimit)));
        assert_eq!(l.due_date(), now + Duration::days(28));
    }

    #[test]
    fn extend_fails_once_overdue_even_below_limit() {
        let now = ts();
        let mut l = loan(now);
        let late = now + Duration::days(15);
        assert!(l.is_overdue(late));
        assert!(matches!(l.extend(late), Err(AppError::Overdue)));
        assert_eq!(l.extension_count(), 0);
    }

    #[test]
    fn third_extend_fails_with_limit_even_when_overdue_too() {
        // The limit check applies regardless of overdue state, but the
        // overdue check runs first for active overdue loans.
        let now = ts();
        let mut l = loan(now);
        l.extend(now).unwrap();
        l.extend(now).unwrap();
        assert!(matches!(l.extend(now), Err(AppError::ExtensionLimit)));
    }

    #[test]
    fn return_is_terminal() {
        let now = ts();
        let mut l = loan(now);
        let later = now + Duration::days(3);
        l.record_return(later).unwrap();
        assert_eq!(l.returned_at(), Some(later));
        assert!(!l.is_active());
        assert!(matches!(
            l.record_return(later),
            Err(AppError::AlreadyReturned)
        ));
        assert!(matches!(l.extend(later), Err(AppError::AlreadyReturned)));
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let now = ts();
        let mut l = loan(now);
        l.record_return(now + Duration::days(20)).unwrap();
        assert!(!l.is_overdue(now + Duration::days(40)));
    }

    #[test]
    fn can_extend_reflects_all_three_guards() {
        let now = ts();
        let mut l = loan(now);
        assert!(l.can_extend(now));
        assert!(!l.can_extend(now + Duration::days(15)));
        l.extend(now).unwrap();
        l.extend(now).unwrap();
        assert!(!l.can_extend(now));
        let mut r = loan(now);
        r.record_return(now).unwrap();
        assert!(!r.can_extend(now));
    }

    #[test]
    fn due_date_boundary_is_not_overdue() {
        let now = ts();
        let l = loan(now);
        assert!(!l.is_overdue(l.due_date()));
        assert!(l.is_overdue(l.due_date() + Duration::seconds(1)));
    }
}
