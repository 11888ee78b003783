//! Borrowing eligibility policy
//!
//! Pure composition of the member, book and loan-history rules that
//! must hold before a borrow is permitted. Book availability is judged
//! from loan existence, never from the denormalized status cache.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::book::Book;
use crate::models::loan::Loan;
use crate::models::user::{User, UserStatus, MAX_LOANS};

/// First failing eligibility rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    #[error("member is suspended")]
    UserSuspended,
    #[error("member has reached the maximum loan limit ({max} books)", max = MAX_LOANS)]
    LoanLimitExceeded,
    #[error("member has outstanding fees: ${0}")]
    OutstandingFees(Decimal),
    #[error("member has {0} overdue loan(s)")]
    HasOverdueLoans(usize),
    #[error("book \"{0}\" is not available")]
    BookUnavailable(String),
}

pub struct BorrowingPolicy;

impl BorrowingPolicy {
    /// Validates a borrow against all eligibility rules
    ///
    /// Checks run in a fixed order and short-circuit on the first
    /// failure, so the reported reason is deterministic.
    pub fn check_borrow(
        user: &User,
        book: &Book,
        active_loans: &[Loan],
        overdue_loans: &[Loan],
        active_book_loan: Option<&Loan>,
    ) -> Result<(), DenialReason> {
        if user.status() == UserStatus::Suspended {
            return Err(DenialReason::UserSuspended);
        }

        // The counter cache and the loan store may drift; either signal
        // at the ceiling blocks the borrow.
        if user.current_loan_count() >= MAX_LOANS || active_loans.len() >= MAX_LOANS as usize {
            return Err(DenialReason::LoanLimitExceeded);
        }

        if user.overdue_fees() > Decimal::ZERO {
            return Err(DenialReason::OutstandingFees(user.overdue_fees()));
        }

        if !overdue_loans.is_empty() {
            return Err(DenialReason::HasOverdueLoans(overdue_loans.len()));
        }

        if active_book_loan.is_some() {
            return Err(DenialReason::BookUnavailable(book.title().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ids::{BookId, Isbn, LoanId, UserId};
    use chrono::{TimeZone, Utc};

    fn member() -> User {
        User::new(
            UserId::new("12345678").unwrap(),
            "Ada Lovelace".to_string(),
            "ada@example.org".to_string(),
        )
    }

    fn book() -> Book {
        Book::new(
            BookId::new("b-1").unwrap(),
            Isbn::new("9783161484100").unwrap(),
            "The Trial".to_string(),
            "Franz Kafka".to_string(),
        )
    }

    fn loan(id: &str) -> Loan {
        Loan::create(
            LoanId::new(id).unwrap(),
            UserId::new("12345678").unwrap(),
            BookId::new("b-1").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn eligible_member_and_free_book_pass() {
        let result = BorrowingPolicy::check_borrow(&member(), &book(), &[], &[], None);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn suspended_wins_over_loan_limit() {
        let mut u = member();
        u.suspend();
        let loans: Vec<Loan> = (0..5).map(|i| loan(&format!("l-{i}"))).collect();
        let result = BorrowingPolicy::check_borrow(&u, &book(), &loans, &[], None);
        assert_eq!(result, Err(DenialReason::UserSuspended));
    }

    #[test]
    fn five_active_loans_hit_the_limit() {
        let loans: Vec<Loan> = (0..5).map(|i| loan(&format!("l-{i}"))).collect();
        let result = BorrowingPolicy::check_borrow(&member(), &book(), &loans, &[], None);
        assert_eq!(result, Err(DenialReason::LoanLimitExceeded));
    }

    #[test]
    fn counter_cache_at_limit_also_blocks() {
        let mut u = member();
        for _ in 0..5 {
            u.record_loan().unwrap();
        }
        let result = BorrowingPolicy::check_borrow(&u, &book(), &[], &[], None);
        assert_eq!(result, Err(DenialReason::LoanLimitExceeded));
    }

    #[test]
    fn outstanding_fees_block_borrowing() {
        let mut u = member();
        u.add_overdue_fee(Decimal::new(300, 2)).unwrap();
        let result = BorrowingPolicy::check_borrow(&u, &book(), &[], &[], None);
        assert_eq!(
            result,
            Err(DenialReason::OutstandingFees(Decimal::new(300, 2)))
        );
    }

    #[test]
    fn overdue_loans_block_borrowing() {
        let overdue = vec![loan("l-9")];
        let result = BorrowingPolicy::check_borrow(&member(), &book(), &[], &overdue, None);
        assert_eq!(result, Err(DenialReason::HasOverdueLoans(1)));
    }

    #[test]
    fn active_loan_on_book_blocks_regardless_of_status_cache() {
        // Stale cache claims the book is available; the loan row wins.
        let b = book();
        assert!(b.is_available());
        let result =
            BorrowingPolicy::check_borrow(&member(), &b, &[], &[], Some(&loan("l-7")));
        assert_eq!(
            result,
            Err(DenialReason::BookUnavailable("The Trial".to_string()))
        );
    }

    #[test]
    fn stale_borrowed_cache_does_not_block_when_no_loan_exists() {
        let mut b = book();
        b.mark_borrowed().unwrap();
        let result = BorrowingPolicy::check_borrow(&member(), &b, &[], &[], None);
        assert_eq!(result, Ok(()));
    }
}
