//! Injected identifier generation
//!
//! Loan and book identifiers are UUID v4 strings; member identifiers
//! are random 8-digit numbers. Injection keeps generation mockable and
//! avoids wall-clock-seeded global randomness.

use crate::models::ids::{BookId, LoanId, UserId};

#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn loan_id(&self) -> LoanId;
    fn book_id(&self) -> BookId;
    fn user_id(&self) -> UserId;
}

pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn loan_id(&self) -> LoanId {
        LoanId::generate()
    }

    fn book_id(&self) -> BookId {
        BookId::generate()
    }

    fn user_id(&self) -> UserId {
        UserId::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_pass_their_own_validation() {
        let ids = RandomIdGenerator;
        assert!(UserId::new(ids.user_id().as_str()).is_ok());
        assert!(BookId::new(ids.book_id().as_str()).is_ok());
        assert!(LoanId::new(ids.loan_id().as_str()).is_ok());
    }

    #[test]
    fn mocked_generator_returns_canned_ids() {
        let mut ids = MockIdGenerator::new();
        ids.expect_loan_id()
            .returning(|| LoanId::new("loan-fixed").unwrap());
        assert_eq!(ids.loan_id().as_str(), "loan-fixed");
    }
}
