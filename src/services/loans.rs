//! Loan lifecycle use cases: borrow, return, extend
//!
//! Each use case loads its entities inside one unit of work, runs the
//! domain rules, persists every mutation and commits. Any failure
//! before the commit rolls the whole unit back, so business-rule
//! denials never leave partial writes behind.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::ids::{BookId, LoanId, UserId},
    models::loan::{BorrowBook, BorrowReceipt, ExtendReceipt, Loan, LoanView, ReturnReceipt},
    repository::{Repository, UnitOfWork},
    services::clock::Clock,
    services::eligibility::BorrowingPolicy,
    services::fees::LateFeeCalculator,
    services::idgen::IdGenerator,
};

use rust_decimal::Decimal;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    uow: UnitOfWork,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        uow: UnitOfWork,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            uow,
            clock,
            ids,
        }
    }

    /// Borrow a book for a member
    pub async fn borrow_book(&self, request: BorrowBook) -> AppResult<BorrowReceipt> {
        let user_id = UserId::new(&request.user_id)?;
        let book_id = BookId::new(&request.book_id)?;
        let now = self.clock.now();

        let mut tx = self.uow.begin().await?;

        let mut user = self
            .repository
            .users
            .find_by_id(&mut *tx, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {user_id} not found")))?;

        let mut book = self
            .repository
            .books
            .find_by_id(&mut *tx, &book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {book_id} not found")))?;

        let active_loans = self
            .repository
            .loans
            .find_active_by_user(&mut *tx, &user_id)
            .await?;
        let overdue_loans = self
            .repository
            .loans
            .find_overdue_by_user(&mut *tx, &user_id, now)
            .await?;
        let book_loan = self
            .repository
            .loans
            .find_active_by_book(&mut *tx, &book_id)
            .await?;

        BorrowingPolicy::check_borrow(
            &user,
            &book,
            &active_loans,
            &overdue_loans,
            book_loan.as_ref(),
        )?;

        let loan = Loan::create(self.ids.loan_id(), user_id, book_id, now);
        user.record_loan()?;

        // Refresh the denormalized status cache; a stale BORROWED value
        // must not block a borrow the loan store already allowed.
        if book.is_available() {
            book.mark_borrowed()?;
        }

        self.repository.loans.save(&mut *tx, &loan).await?;
        self.repository.users.save(&mut *tx, &user).await?;
        self.repository.books.save(&mut *tx, &book).await?;

        tx.commit().await?;

        tracing::info!(
            "Loan {} created: member {} borrowed book {}",
            loan.id(),
            loan.user_id(),
            loan.book_id()
        );

        Ok(BorrowReceipt {
            loan_id: loan.id().clone(),
            user_id: loan.user_id().clone(),
            book_id: loan.book_id().clone(),
            borrowed_at: loan.borrowed_at(),
            due_date: loan.due_date(),
        })
    }

    /// Return a borrowed book, computing and recording any late fee
    pub async fn return_book(&self, loan_id: &str) -> AppResult<ReturnReceipt> {
        let loan_id = LoanId::new(loan_id)?;
        let now = self.clock.now();

        let mut tx = self.uow.begin().await?;

        let mut loan = self
            .repository
            .loans
            .find_by_id(&mut *tx, &loan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {loan_id} not found")))?;

        let mut user = self
            .repository
            .users
            .find_by_id(&mut *tx, loan.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", loan.user_id())))?;

        let mut book = self
            .repository
            .books
            .find_by_id(&mut *tx, loan.book_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", loan.book_id())))?;

        let due_date = loan.due_date();
        loan.record_return(now)?;

        let days_late = LateFeeCalculator::days_late(due_date, now);
        let late_fee = LateFeeCalculator::late_fee(due_date, now);
        let was_overdue = LateFeeCalculator::is_overdue(due_date, now);

        if late_fee > Decimal::ZERO {
            user.add_overdue_fee(late_fee)?;
        }
        user.record_return()?;

        if !book.is_available() {
            book.mark_available()?;
        }

        self.repository.loans.save(&mut *tx, &loan).await?;
        self.repository.users.save(&mut *tx, &user).await?;
        self.repository.books.save(&mut *tx, &book).await?;

        tx.commit().await?;

        tracing::info!(
            "Loan {} returned, {} day(s) late, fee ${}",
            loan.id(),
            days_late,
            late_fee
        );

        Ok(ReturnReceipt {
            loan_id: loan.id().clone(),
            user_id: loan.user_id().clone(),
            book_id: loan.book_id().clone(),
            borrowed_at: loan.borrowed_at(),
            due_date: loan.due_date(),
            returned_at: now,
            days_late,
            late_fee,
            was_overdue,
        })
    }

    /// Extend a loan's due date by one extension period
    pub async fn extend_loan(&self, loan_id: &str) -> AppResult<ExtendReceipt> {
        let loan_id = LoanId::new(loan_id)?;
        let now = self.clock.now();

        let mut tx = self.uow.begin().await?;

        let mut loan = self
            .repository
            .loans
            .find_by_id(&mut *tx, &loan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {loan_id} not found")))?;

        let previous_due_date = loan.due_date();
        loan.extend(now)?;

        self.repository.loans.save(&mut *tx, &loan).await?;

        tx.commit().await?;

        tracing::info!(
            "Loan {} extended to {} ({}/{} extensions)",
            loan.id(),
            loan.due_date(),
            loan.extension_count(),
            crate::models::loan::MAX_EXTENSIONS
        );

        Ok(ExtendReceipt {
            loan_id: loan.id().clone(),
            previous_due_date,
            due_date: loan.due_date(),
            extension_count: loan.extension_count(),
        })
    }

    /// Active loans for a member, with overdue and extensibility flags
    pub async fn get_user_loans(&self, user_id: &str) -> AppResult<Vec<LoanView>> {
        let user_id = UserId::new(user_id)?;
        let now = self.clock.now();

        let mut conn = self.uow.acquire().await?;

        self.repository
            .users
            .find_by_id(&mut *conn, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {user_id} not found")))?;

        self.repository
            .loans
            .list_views_by_user(&mut *conn, &user_id, now)
            .await
    }
}
