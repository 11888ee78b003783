//! Late fee calculation
//!
//! Pure functions of dates; fees accrue at a fixed per-day rate and
//! are computed on demand, never by a scheduled job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Fee charged per full day late
pub const FEE_PER_DAY: Decimal = Decimal::ONE;

pub struct LateFeeCalculator;

impl LateFeeCalculator {
    /// Full days late, floor of elapsed hours over 24, never negative
    pub fn days_late(due_date: DateTime<Utc>, return_date: DateTime<Utc>) -> i64 {
        if return_date <= due_date {
            return 0;
        }
        (return_date - due_date).num_hours() / 24
    }

    /// `max(0, days_late) * FEE_PER_DAY`
    pub fn late_fee(due_date: DateTime<Utc>, return_date: DateTime<Utc>) -> Decimal {
        Decimal::from(Self::days_late(due_date, return_date)) * FEE_PER_DAY
    }

    pub fn is_overdue(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now > due_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn on_time_return_costs_nothing() {
        assert_eq!(LateFeeCalculator::late_fee(due(), due()), Decimal::ZERO);
        assert_eq!(LateFeeCalculator::days_late(due(), due()), 0);
    }

    #[test]
    fn early_return_costs_nothing() {
        let early = due() - Duration::days(3);
        assert_eq!(LateFeeCalculator::late_fee(due(), early), Decimal::ZERO);
        assert_eq!(LateFeeCalculator::days_late(due(), early), 0);
    }

    #[test]
    fn five_days_late_costs_five() {
        let late = due() + Duration::days(5);
        assert_eq!(LateFeeCalculator::late_fee(due(), late), Decimal::from(5));
        assert_eq!(LateFeeCalculator::days_late(due(), late), 5);
    }

    #[test]
    fn partial_days_floor_to_whole_days() {
        let late = due() + Duration::hours(36);
        assert_eq!(LateFeeCalculator::days_late(due(), late), 1);
        assert_eq!(LateFeeCalculator::late_fee(due(), late), Decimal::ONE);

        let barely = due() + Duration::hours(23);
        assert_eq!(LateFeeCalculator::days_late(due(), barely), 0);
        assert_eq!(LateFeeCalculator::late_fee(due(), barely), Decimal::ZERO);
    }

    #[test]
    fn overdue_is_strictly_after_due() {
        assert!(!LateFeeCalculator::is_overdue(due(), due()));
        assert!(LateFeeCalculator::is_overdue(
            due(),
            due() + Duration::seconds(1)
        ));
    }
}
