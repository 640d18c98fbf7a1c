//! Direction modes: the dosing schedule variants and their day arithmetic.
//!
//! A direction mode tells how a prescribed drug is taken over the treatment
//! period:
//! - Daily: every day
//! - Periodic: `taken` days on, `interval` days off, repeating
//! - Decreasing: daily, while tapering the intake amount down to a limit
//!
//! Modes are resolved from raw string request parameters and are pure values;
//! all arithmetic here is deterministic and free of external state.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag accepted for the daily mode
pub const DAILY_TAG: &str = "Daily";
/// Tag accepted for the periodic mode
pub const PERIODIC_TAG: &str = "Periodic";
/// Tag accepted for the decreasing mode
pub const DECREASING_TAG: &str = "Decreasing";

/// Dosing schedule variant with its parameters
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectionMode {
    /// Taken every day of the treatment period
    Daily,
    /// Taken for `taken` days, paused for `interval` days, repeating
    Periodic { taken: i32, interval: i32 },
    /// Taken daily while stepping the intake amount down by `delta` per day
    /// until it reaches `limit`
    Decreasing { delta: i32, limit: i32 },
}

impl DirectionMode {
    /// Whether `tag` names one of the three variants. Tags are case-sensitive.
    pub fn tag_exists(tag: &str) -> bool {
        matches!(tag, DAILY_TAG | PERIODIC_TAG | DECREASING_TAG)
    }

    /// Resolve a mode from raw request parameters.
    ///
    /// An entirely absent tag defaults to Daily; a present but unrecognized
    /// tag is an error. The parameters of the selected variant must be
    /// present and numeric; parameters of other variants are ignored.
    pub fn resolve(
        tag: Option<&str>,
        taken: Option<&str>,
        interval: Option<&str>,
        delta: Option<&str>,
        limit: Option<&str>,
    ) -> Result<DirectionMode> {
        let tag = match tag {
            None => return Ok(DirectionMode::Daily),
            Some(tag) => tag,
        };

        match tag {
            DAILY_TAG => Ok(DirectionMode::Daily),
            PERIODIC_TAG => Ok(DirectionMode::Periodic {
                taken: parse_parameter("directionModeTaken", taken)?,
                interval: parse_parameter("directionModeInterval", interval)?,
            }),
            DECREASING_TAG => Ok(DirectionMode::Decreasing {
                delta: parse_parameter("directionModeDelta", delta)?,
                limit: parse_parameter("directionModeLimit", limit)?,
            }),
            other => Err(Error::Validation(format!(
                "'{}' is not a valid direction mode type",
                other
            ))),
        }
    }

    /// Whether the drug is taken on `date`, for a date already known to fall
    /// within the treatment period.
    ///
    /// The decreasing taper changes how long a treatment runs, not which of
    /// its days are active, so it behaves like Daily here.
    pub fn is_used_on(&self, starts_on: NaiveDate, date: NaiveDate) -> bool {
        match *self {
            DirectionMode::Daily | DirectionMode::Decreasing { .. } => true,
            DirectionMode::Periodic { taken, interval } => {
                day_ordinal_in_cycle(starts_on, date, taken + interval) <= i64::from(taken)
            }
        }
    }
}

impl fmt::Display for DirectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DirectionMode::Daily => write!(f, "daily"),
            DirectionMode::Periodic { taken, interval } => {
                write!(f, "periodic: {} days taken, {} days pause", taken, interval)
            }
            DirectionMode::Decreasing { delta, limit } => {
                write!(f, "decreasing: {} fewer intakes a day until {}", delta, limit)
            }
        }
    }
}

/// 1-based ordinal of `date` within its repeating cycle of `length` days.
///
/// Day 1 is the start date itself; the ordinal of the last day of a cycle is
/// `length`, after which the count restarts at 1.
fn day_ordinal_in_cycle(starts_on: NaiveDate, date: NaiveDate, length: i32) -> i64 {
    let total_days = (date - starts_on).num_days() + 1;
    let remainder = total_days % i64::from(length);

    if remainder == 0 {
        i64::from(length)
    } else {
        remainder
    }
}

/// Number of days needed to step `daily_intake_amount` down to `limit`
/// inclusive, decreasing by `delta` each day.
///
/// The last counted day is the first one where the amount is at or below the
/// limit; a remainder that does not divide evenly by `delta` costs one extra
/// partial step. The formula is applied literally even when the intake amount
/// is already at or below the limit.
pub fn decreasing_days_until_limit(daily_intake_amount: i32, delta: i32, limit: i32) -> i32 {
    let remaining = daily_intake_amount - limit;
    let mut days = remaining / delta + 1;
    if remaining % delta != 0 {
        days += 1;
    }
    days
}

fn parse_parameter(name: &str, value: Option<&str>) -> Result<i32> {
    let value = value.ok_or_else(|| {
        Error::Validation(format!(
            "direction mode parameter '{}' must be present",
            name
        ))
    })?;

    value.parse().map_err(|_| {
        Error::Validation(format!(
            "direction mode parameter '{}' is malformed: '{}'",
            name, value
        ))
    })
}
