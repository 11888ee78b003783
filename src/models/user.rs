//! Library member entity and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::ids::UserId;

/// Maximum simultaneous active loans per member
pub const MAX_LOANS: i16 = 5;

/// Member account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "SUSPENDED" => Ok(UserStatus::Suspended),
            other => Err(AppError::Internal(format!(
                "unknown user status in storage: {other}"
            ))),
        }
    }
}

/// Library member
///
/// Mutated in place; the surrounding unit of work serializes access
/// per transaction. Invariants: `current_loan_count >= 0` and
/// `overdue_fees >= 0`.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    status: UserStatus,
    current_loan_count: i16,
    overdue_fees: Decimal,
}

impl User {
    pub fn new(id: UserId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            status: UserStatus::Active,
            current_loan_count: 0,
            overdue_fees: Decimal::ZERO,
        }
    }

    /// Rehydrates a member from persisted state
    pub fn from_parts(
        id: UserId,
        name: String,
        email: String,
        status: UserStatus,
        current_loan_count: i16,
        overdue_fees: Decimal,
    ) -> Self {
        Self {
            id,
            name,
            email,
            status,
            current_loan_count,
            overdue_fees,
        }
    }

    /// Composite borrowing precondition over the member's own attributes
    pub fn can_borrow(&self) -> bool {
        self.status == UserStatus::Active
            && self.current_loan_count < MAX_LOANS
            && self.overdue_fees == Decimal::ZERO
    }

    pub fn record_loan(&mut self) -> AppResult<()> {
        if !self.can_borrow() {
            return Err(AppError::LimitExceeded(
                "member cannot take another loan".to_string(),
            ));
        }
        self.current_loan_count += 1;
        Ok(())
    }

    pub fn record_return(&mut self) -> AppResult<()> {
        if self.current_loan_count == 0 {
            return Err(AppError::Invariant(
                "member has no active loans to return".to_string(),
            ));
        }
        self.current_loan_count -= 1;
        Ok(())
    }

    pub fn add_overdue_fee(&mut self, amount: Decimal) -> AppResult<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "overdue fee cannot be negative".to_string(),
            ));
        }
        self.overdue_fees += amount;
        Ok(())
    }

    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
    }

    pub fn reinstate(&mut self) {
        self.status = UserStatus::Active;
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn current_loan_count(&self) -> i16 {
        self.current_loan_count
    }

    pub fn overdue_fees(&self) -> Decimal {
        self.overdue_fees
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub current_loan_count: i16,
    pub overdue_fees: Decimal,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_parts(
            UserId::new(&row.id)?,
            row.name,
            row.email,
            row.status.parse()?,
            row.current_loan_count,
            row.overdue_fees,
        ))
    }
}

/// Create member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Suspend / reinstate request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSuspension {
    pub suspended: bool,
}

/// Member details for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDetails {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub current_loan_count: i16,
    pub overdue_fees: Decimal,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status,
            current_loan_count: user.current_loan_count,
            overdue_fees: user.overdue_fees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> User {
        User::new(
            UserId::new("12345678").unwrap(),
            "Ada Lovelace".to_string(),
            "ada@example.org".to_string(),
        )
    }

    #[test]
    fn fresh_member_can_borrow() {
        assert!(member().can_borrow());
    }

    #[test]
    fn suspended_member_cannot_borrow() {
        let mut u = member();
        u.suspend();
        assert!(!u.can_borrow());
        u.reinstate();
        assert!(u.can_borrow());
    }

    #[test]
    fn member_at_loan_limit_cannot_borrow() {
        let mut u = member();
        for _ in 0..MAX_LOANS {
            u.record_loan().unwrap();
        }
        assert!(!u.can_borrow());
        assert!(matches!(u.record_loan(), Err(AppError::LimitExceeded(_))));
        assert_eq!(u.current_loan_count(), MAX_LOANS);
    }

    #[test]
    fn member_with_fees_cannot_borrow() {
        let mut u = member();
        u.add_overdue_fee(Decimal::new(250, 2)).unwrap();
        assert!(!u.can_borrow());
        assert!(matches!(u.record_loan(), Err(AppError::LimitExceeded(_))));
    }

    #[test]
    fn record_return_decrements_count() {
        let mut u = member();
        u.record_loan().unwrap();
        u.record_return().unwrap();
        assert_eq!(u.current_loan_count(), 0);
    }

    #[test]
    fn record_return_at_zero_is_an_invariant_violation() {
        let mut u = member();
        assert!(matches!(u.record_return(), Err(AppError::Invariant(_))));
    }

    #[test]
    fn negative_fee_is_rejected() {
        let mut u = member();
        assert!(matches!(
            u.add_overdue_fee(Decimal::new(-100, 2)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(u.overdue_fees(), Decimal::ZERO);
    }
}
