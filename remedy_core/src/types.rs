//! Core domain types for the treatment prescription system.
//!
//! This module defines the persisted entities:
//! - Drugs and their dosages
//! - Treatments: a drug taken over an inclusive date range under a
//!   direction mode
//!
//! Entity equality is identity-based: two records are equal only when both
//! carry the same assigned id. An unsaved record (no id yet) is equal to
//! nothing, not even itself.

use crate::direction::DirectionMode;
use crate::period::TreatmentPeriod;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Drug and Dosage
// ============================================================================

/// A prescribable drug
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Drug {
    /// Assigned by the store on save; None for an unsaved record
    pub id: Option<String>,
    pub name: String,
}

impl Drug {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl PartialEq for Drug {
    fn eq(&self, other: &Self) -> bool {
        ids_match(&self.id, &other.id)
    }
}

/// A single intake: quantity of some form, e.g. "9 Drops"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dose {
    pub quantity: i32,
    pub form: String,
}

/// How a drug is dosed: one dose, taken a number of times a day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dosage {
    pub id: Option<String>,
    pub dose: Dose,
    pub daily_intake_amount: i32,
}

impl Dosage {
    pub fn new(dose: Dose, daily_intake_amount: i32) -> Self {
        Self {
            id: None,
            dose,
            daily_intake_amount,
        }
    }

    /// Total units taken per day across all intakes
    pub fn total_daily_dose(&self) -> i32 {
        self.dose.quantity * self.daily_intake_amount
    }

    /// Human-readable regimen, e.g. "9 Drops 7 times a day"
    pub fn regimen(&self) -> String {
        format!(
            "{} {} {} times a day",
            self.dose.quantity, self.dose.form, self.daily_intake_amount
        )
    }
}

impl PartialEq for Dosage {
    fn eq(&self, other: &Self) -> bool {
        ids_match(&self.id, &other.id)
    }
}

// ============================================================================
// Treatment
// ============================================================================

/// A prescribed course of a drug over an inclusive date range
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Option<String>,
    pub drug: Drug,
    pub dosage: Dosage,
    pub starts_on: NaiveDate,
    pub period: TreatmentPeriod,
    /// Inclusive last day, derived from `starts_on` and `period`
    pub stops_on: NaiveDate,
    pub direction_mode: DirectionMode,
}

impl Treatment {
    /// Whether `date` falls within [starts_on, stops_on]
    pub fn is_within_period(&self, date: NaiveDate) -> bool {
        self.starts_on <= date && date <= self.stops_on
    }

    /// Whether the drug is actually taken on `date`.
    ///
    /// Dates outside the treatment period are never used; dates inside it
    /// are answered by the direction mode's day arithmetic.
    pub fn is_used_on(&self, date: NaiveDate) -> bool {
        self.is_within_period(date) && self.direction_mode.is_used_on(self.starts_on, date)
    }

    /// Whether two treatments prescribe the same drug over intersecting
    /// date ranges.
    ///
    /// Intervals are inclusive on both ends, so ranges touching on a single
    /// shared day overlap. Treatments for different drugs never overlap.
    pub fn overlaps(&self, other: &Treatment) -> bool {
        if self.drug != other.drug {
            return false;
        }

        !(self.starts_on > other.stops_on || self.stops_on < other.starts_on)
    }
}

impl PartialEq for Treatment {
    fn eq(&self, other: &Self) -> bool {
        ids_match(&self.id, &other.id)
    }
}

fn ids_match(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodUnit;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn saved_drug(id: &str, name: &str) -> Drug {
        Drug {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    fn treatment_of(drug: Drug, starts_on: NaiveDate, amount: i32) -> Treatment {
        let period = TreatmentPeriod::new(amount, PeriodUnit::Days);
        Treatment {
            id: None,
            drug,
            dosage: Dosage::new(
                Dose {
                    quantity: 9,
                    form: "Drops".into(),
                },
                7,
            ),
            starts_on,
            period,
            stops_on: period.calc_end(starts_on),
            direction_mode: DirectionMode::Daily,
        }
    }

    #[test]
    fn test_entities_with_same_id_are_equal() {
        assert_eq!(saved_drug("d1", "Arsen Alb"), saved_drug("d1", "Vocara"));
        assert_ne!(saved_drug("d1", "Arsen Alb"), saved_drug("d2", "Arsen Alb"));
    }

    #[test]
    fn test_unsaved_entities_are_never_equal() {
        let a = Drug::new("Arsen Alb");
        let b = Drug::new("Arsen Alb");

        assert_ne!(a, b);
        assert_ne!(a, a.clone());
    }

    #[test]
    fn test_total_daily_dose() {
        let dosage = Dosage::new(
            Dose {
                quantity: 3,
                form: "Pill".into(),
            },
            2,
        );

        assert_eq!(dosage.total_daily_dose(), 6);
    }

    #[test]
    fn test_regimen_rendering() {
        let dosage = Dosage::new(
            Dose {
                quantity: 9,
                form: "Drops".into(),
            },
            7,
        );

        assert_eq!(dosage.regimen(), "9 Drops 7 times a day");
    }

    #[test]
    fn test_stops_on_derivation() {
        let t = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 10);
        assert_eq!(t.stops_on, date(2017, 3, 25));
    }

    #[test]
    fn test_usage_bounds_are_inclusive() {
        let t = treatment_of(saved_drug("d1", "Arsen Alb"), date(2020, 5, 1), 61);

        assert!(t.is_used_on(t.starts_on));
        assert!(t.is_used_on(date(2020, 6, 10)));
        assert!(t.is_used_on(t.stops_on));
    }

    #[test]
    fn test_not_used_outside_the_period() {
        let t = treatment_of(saved_drug("d1", "Arsen Alb"), date(2020, 5, 1), 61);

        assert!(!t.is_used_on(t.starts_on - chrono::Duration::days(1)));
        assert!(!t.is_used_on(t.stops_on + chrono::Duration::days(1)));
    }

    #[test]
    fn test_periodic_treatment_skips_pause_days() {
        let starts_on = date(2020, 5, 1);
        let mut t = treatment_of(saved_drug("d1", "Arsen Alb"), starts_on, 10);
        t.direction_mode = DirectionMode::Periodic {
            taken: 3,
            interval: 2,
        };

        assert!(t.is_used_on(starts_on));
        assert!(!t.is_used_on(starts_on + chrono::Duration::days(3)));
        assert!(t.is_used_on(starts_on + chrono::Duration::days(5)));
    }

    #[test]
    fn test_identical_ranges_on_the_same_drug_overlap() {
        let a = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 31);
        let b = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 31);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_identical_ranges_on_different_drugs_do_not_overlap() {
        let a = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 31);
        let b = treatment_of(saved_drug("d2", "Vocara"), date(2017, 3, 16), 31);

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_ranges_touching_on_one_day_overlap() {
        let a = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 10);
        // starts exactly on a's stops_on
        let b = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 25), 10);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_ranges_separated_by_one_day_do_not_overlap() {
        let a = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 10);
        let b = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 26), 10);

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_range_overlaps() {
        let outer = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 16), 31);
        let inner = treatment_of(saved_drug("d1", "Arsen Alb"), date(2017, 3, 20), 2);

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_unsaved_drugs_never_cause_overlap() {
        // Drug equality is identity-based, so drugs without ids compare
        // unequal and their treatments cannot collide.
        let a = treatment_of(Drug::new("Arsen Alb"), date(2017, 3, 16), 31);
        let b = treatment_of(Drug::new("Arsen Alb"), date(2017, 3, 16), 31);

        assert!(!a.overlaps(&b));
    }
}
