//! Injected wall clock
//!
//! Use cases never read `Utc::now()` directly; they take the time from
//! an injected clock so loan dates are deterministic in tests.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ids::{BookId, LoanId, UserId};
    use crate::models::loan::{Loan, LOAN_PERIOD_DAYS};
    use chrono::{Duration, TimeZone};

    #[test]
    fn fixed_clock_drives_loan_dates() {
        let frozen = Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().return_const(frozen);

        let loan = Loan::create(
            LoanId::new("l-1").unwrap(),
            UserId::new("12345678").unwrap(),
            BookId::new("b-1").unwrap(),
            clock.now(),
        );

        assert_eq!(loan.borrowed_at(), frozen);
        assert_eq!(loan.due_date(), frozen + Duration::days(LOAN_PERIOD_DAYS));
    }
}
