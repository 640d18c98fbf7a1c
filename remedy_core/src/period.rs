//! Treatment period value type.
//!
//! A period is an amount of calendar units (days, months, years, or an
//! open-ended "forever"). It derives the inclusive end date of a treatment
//! from its start date and can be extended when a decreasing taper outlasts
//! the nominally prescribed duration.

use crate::{Error, Result};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar unit of a treatment period
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Days,
    Months,
    Years,
    Forever,
}

impl PeriodUnit {
    /// Parse a unit from its case-insensitive name ("Days", "months", "FOREVER", ...)
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "days" => Ok(PeriodUnit::Days),
            "months" => Ok(PeriodUnit::Months),
            "years" => Ok(PeriodUnit::Years),
            "forever" => Ok(PeriodUnit::Forever),
            _ => Err(Error::Validation(format!(
                "'{}' is not a valid treatment period unit",
                name
            ))),
        }
    }

    /// Estimated duration of one unit in seconds, for period comparison.
    ///
    /// Months and years use the mean Gregorian lengths so that, e.g.,
    /// one month outlasts 30 days and one year outlasts 12 months of 30 days.
    fn estimated_seconds(&self) -> i64 {
        match self {
            PeriodUnit::Days => 86_400,
            PeriodUnit::Months => 2_629_746,
            PeriodUnit::Years => 31_556_952,
            PeriodUnit::Forever => i64::MAX,
        }
    }
}

/// An immutable treatment duration: amount + unit.
///
/// Two periods are equal only when amount and unit match exactly;
/// "30 days" and "1 month" are different periods even though their
/// estimated durations are close.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentPeriod {
    pub amount: i32,
    pub unit: PeriodUnit,
}

impl TreatmentPeriod {
    pub fn new(amount: i32, unit: PeriodUnit) -> Self {
        Self { amount, unit }
    }

    /// Calculate the inclusive end date for a treatment starting on `starts_on`.
    ///
    /// The start day counts as the first day of the period, so a 1-day
    /// treatment starts and ends on the same date. A forever period ends at
    /// the maximum representable date.
    pub fn calc_end(&self, starts_on: NaiveDate) -> NaiveDate {
        let amount = self.amount.max(0) as u32;
        let exclusive_end = match self.unit {
            PeriodUnit::Days => starts_on.checked_add_days(Days::new(u64::from(amount))),
            PeriodUnit::Months => starts_on.checked_add_months(Months::new(amount)),
            PeriodUnit::Years => starts_on.checked_add_months(Months::new(amount.saturating_mul(12))),
            PeriodUnit::Forever => None,
        };

        exclusive_end
            .and_then(|end| end.checked_sub_days(Days::new(1)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether this period covers strictly more time than `other`.
    ///
    /// Comparison is by estimated total duration, not by unit. A forever
    /// period is longer than any finite one and not longer than another
    /// forever period.
    pub fn is_longer(&self, other: &TreatmentPeriod) -> bool {
        match (self.unit, other.unit) {
            (PeriodUnit::Forever, PeriodUnit::Forever) => false,
            (PeriodUnit::Forever, _) => true,
            (_, PeriodUnit::Forever) => false,
            _ => self.total_seconds() > other.total_seconds(),
        }
    }

    /// Replace this period with a day-based one of `candidate_days` if that
    /// would be longer; otherwise keep this period unchanged.
    ///
    /// Used to prolong a nominal period when a decreasing taper needs more
    /// days than prescribed.
    pub fn extend_if_duration_longer(self, candidate_days: i32) -> TreatmentPeriod {
        let candidate = TreatmentPeriod::new(candidate_days, PeriodUnit::Days);
        if candidate.is_longer(&self) {
            tracing::debug!(
                "Extending treatment period from {:?} to {} days",
                self,
                candidate_days
            );
            candidate
        } else {
            self
        }
    }

    fn total_seconds(&self) -> i64 {
        i64::from(self.amount) * self.unit.estimated_seconds()
    }
}
