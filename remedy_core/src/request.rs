//! Raw prescribe-treatment request and its validation rules.
//!
//! A request is a flat map of string parameters, exactly as an outer
//! transport (HTTP form, CLI flags) would deliver them. Typed interpretation
//! happens later, in the orchestrator, after the rule set here has accepted
//! the raw values.

use crate::direction::{self, DirectionMode};
use crate::validation::{
    assert_truth_condition, check_date_format, check_integer_format, require_non_empty,
    require_non_zero, require_positive_number, RequestParameters, ValidationRule, Validator,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Request parameter keys
pub mod keys {
    pub const START_DATE: &str = "startDate";
    pub const PERIOD_AMOUNT: &str = "periodAmount";
    pub const PERIOD_UNIT: &str = "periodUnit";
    pub const DRUG_ID: &str = "drugId";
    pub const DOSAGE_ID: &str = "dosageId";
    pub const DIRECTION_MODE_TYPE: &str = "directionModeType";
    pub const DIRECTION_MODE_TAKEN: &str = "directionModeTaken";
    pub const DIRECTION_MODE_INTERVAL: &str = "directionModeInterval";
    pub const DIRECTION_MODE_DELTA: &str = "directionModeDelta";
    pub const DIRECTION_MODE_LIMIT: &str = "directionModeLimit";
}

/// Flat string-keyed input for the prescribe operation
#[derive(Clone, Debug, Default)]
pub struct PrescribeTreatmentRequest {
    parameters: HashMap<String, String>,
}

impl PrescribeTreatmentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(self, value: impl Into<String>) -> Self {
        self.set(keys::START_DATE, value)
    }

    pub fn period_amount(self, value: impl Into<String>) -> Self {
        self.set(keys::PERIOD_AMOUNT, value)
    }

    pub fn period_unit(self, value: impl Into<String>) -> Self {
        self.set(keys::PERIOD_UNIT, value)
    }

    pub fn drug_id(self, value: impl Into<String>) -> Self {
        self.set(keys::DRUG_ID, value)
    }

    pub fn dosage_id(self, value: impl Into<String>) -> Self {
        self.set(keys::DOSAGE_ID, value)
    }

    pub fn direction_mode_type(self, value: impl Into<String>) -> Self {
        self.set(keys::DIRECTION_MODE_TYPE, value)
    }

    pub fn direction_mode_taken(self, value: impl Into<String>) -> Self {
        self.set(keys::DIRECTION_MODE_TAKEN, value)
    }

    pub fn direction_mode_interval(self, value: impl Into<String>) -> Self {
        self.set(keys::DIRECTION_MODE_INTERVAL, value)
    }

    pub fn direction_mode_delta(self, value: impl Into<String>) -> Self {
        self.set(keys::DIRECTION_MODE_DELTA, value)
    }

    pub fn direction_mode_limit(self, value: impl Into<String>) -> Self {
        self.set(keys::DIRECTION_MODE_LIMIT, value)
    }

    /// Set an arbitrary parameter by key
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

impl RequestParameters for PrescribeTreatmentRequest {
    fn parameter(&self, attribute: &str) -> Option<&str> {
        self.parameters.get(attribute).map(String::as_str)
    }
}

static PRESCRIBE_VALIDATOR: Lazy<Validator<PrescribeTreatmentRequest>> =
    Lazy::new(build_validator);

/// The shared rule set for prescribe-treatment requests
pub fn validator() -> &'static Validator<PrescribeTreatmentRequest> {
    &PRESCRIBE_VALIDATOR
}

fn build_validator() -> Validator<PrescribeTreatmentRequest> {
    Validator::new()
        .label(keys::START_DATE, "Start Date")
        .label(keys::PERIOD_AMOUNT, "Amount of Treatment Period")
        .label(keys::PERIOD_UNIT, "Unit of Treatment Period")
        .label(keys::DRUG_ID, "Drug Id")
        .label(keys::DOSAGE_ID, "Dosage Id")
        .label(keys::DIRECTION_MODE_TYPE, "Direction Mode Type")
        .label(
            keys::DIRECTION_MODE_TAKEN,
            "Amount of Taken for the Periodical Direction",
        )
        .label(
            keys::DIRECTION_MODE_INTERVAL,
            "Amount of Interval for the Periodical Direction",
        )
        .label(
            keys::DIRECTION_MODE_DELTA,
            "Amount of Delta for the Decreasing Direction",
        )
        .label(
            keys::DIRECTION_MODE_LIMIT,
            "Amount of Limit for the Decreasing Direction",
        )
        .rule(
            ValidationRule::of(keys::START_DATE)
                .check(require_non_empty)
                .check(check_date_format),
        )
        .rule(
            ValidationRule::of(keys::PERIOD_AMOUNT)
                .check(require_non_empty)
                .check(check_integer_format)
                .check(require_positive_number)
                .check(require_non_zero),
        )
        .rule(ValidationRule::of(keys::PERIOD_UNIT).check(require_non_empty))
        .rule(ValidationRule::of(keys::DRUG_ID).check(require_non_empty))
        .rule(ValidationRule::of(keys::DOSAGE_ID).check(require_non_empty))
        .rule(direction_mode_rule())
}

/// The direction-mode rule tree.
///
/// The mode tag itself is optional: an absent tag later defaults to Daily in
/// the orchestrator, so only a present-but-unknown tag is rejected here.
/// Parameter sub-rules are guarded on the selected tag and are skipped
/// entirely when the tag is absent, unknown, or names another variant.
fn direction_mode_rule() -> ValidationRule<PrescribeTreatmentRequest> {
    ValidationRule::of(keys::DIRECTION_MODE_TYPE)
        .check(assert_truth_condition(DirectionMode::tag_exists))
        .subrule(
            ValidationRule::of(keys::DIRECTION_MODE_TAKEN)
                .precondition(|request: &PrescribeTreatmentRequest| {
                    tag_of(request) == Some(direction::PERIODIC_TAG)
                })
                .check(require_non_empty)
                .check(check_integer_format)
                .check(require_positive_number)
                .check(require_non_zero),
        )
        .subrule(
            ValidationRule::of(keys::DIRECTION_MODE_INTERVAL)
                .precondition(|request: &PrescribeTreatmentRequest| {
                    tag_of(request) == Some(direction::PERIODIC_TAG)
                })
                .check(require_non_empty)
                .check(check_integer_format)
                .check(require_positive_number)
                .check(require_non_zero),
        )
        .subrule(
            ValidationRule::of(keys::DIRECTION_MODE_DELTA)
                .precondition(|request: &PrescribeTreatmentRequest| {
                    tag_of(request) == Some(direction::DECREASING_TAG)
                })
                .check(check_integer_format),
        )
        .subrule(
            ValidationRule::of(keys::DIRECTION_MODE_LIMIT)
                .precondition(|request: &PrescribeTreatmentRequest| {
                    tag_of(request) == Some(direction::DECREASING_TAG)
                })
                .check(check_integer_format),
        )
}

fn tag_of(request: &PrescribeTreatmentRequest) -> Option<&str> {
    request.parameter(keys::DIRECTION_MODE_TYPE)
}
