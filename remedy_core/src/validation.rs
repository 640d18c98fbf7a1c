//! Composable validation rules for raw, string-keyed requests.
//!
//! A validator owns an ordered set of rules, each bound to one request
//! attribute. Rules carry ordered checks, an optional precondition over the
//! whole request, and nested sub-rules. The rule set is an immutable
//! specification; every `validate` call interprets it against one request
//! and returns a fresh outcome, so validators are safely shared and reused.
//!
//! Checks never panic and the engine never errors out: a failing check only
//! appends one human-readable message to the outcome.

use chrono::NaiveDate;
use std::collections::HashMap;

/// Read access to raw request parameters by attribute key.
///
/// An absent parameter and an empty one are different things: several checks
/// pass on absence (presence is its own rule) but fail on empty values.
pub trait RequestParameters {
    fn parameter(&self, attribute: &str) -> Option<&str>;
}

/// A single check: given the attribute's label and raw value, pass with
/// `None` or fail with one formatted error message.
type Check = Box<dyn Fn(&str, Option<&str>) -> Option<String> + Send + Sync>;

type Precondition<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// One validation rule bound to a request attribute
pub struct ValidationRule<R> {
    attribute: &'static str,
    checks: Vec<Check>,
    precondition: Option<Precondition<R>>,
    subrules: Vec<ValidationRule<R>>,
}

impl<R: RequestParameters> ValidationRule<R> {
    pub fn of(attribute: &'static str) -> Self {
        Self {
            attribute,
            checks: Vec::new(),
            precondition: None,
            subrules: Vec::new(),
        }
    }

    /// Append a check; checks run in the order they were added
    pub fn check(
        mut self,
        check: impl Fn(&str, Option<&str>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Guard the whole rule: when the precondition evaluates false against
    /// the request, the rule and its entire sub-rule subtree are skipped
    /// without producing errors.
    pub fn precondition(mut self, condition: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.precondition = Some(Box::new(condition));
        self
    }

    /// Nest a sub-rule, evaluated only when this rule ends non-violated
    pub fn subrule(mut self, subrule: ValidationRule<R>) -> Self {
        self.subrules.push(subrule);
        self
    }

    fn evaluate(
        &self,
        request: &R,
        labels: &HashMap<&'static str, &'static str>,
        errors: &mut Vec<String>,
    ) {
        if let Some(condition) = &self.precondition {
            if !condition(request) {
                return;
            }
        }

        let label = labels.get(self.attribute).copied().unwrap_or(self.attribute);
        let value = request.parameter(self.attribute);

        let mut violated = false;
        for check in &self.checks {
            if let Some(message) = check(label, value) {
                errors.push(message);
                violated = true;
            }
        }

        if !violated {
            for subrule in &self.subrules {
                subrule.evaluate(request, labels, errors);
            }
        }
    }
}

/// An ordered rule set plus the attribute-key → human-label mapping used
/// only for message formatting
pub struct Validator<R> {
    labels: HashMap<&'static str, &'static str>,
    rules: Vec<ValidationRule<R>>,
}

impl<R: RequestParameters> Validator<R> {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
            rules: Vec::new(),
        }
    }

    pub fn label(mut self, attribute: &'static str, label: &'static str) -> Self {
        self.labels.insert(attribute, label);
        self
    }

    pub fn rule(mut self, rule: ValidationRule<R>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Evaluate every top-level rule against `request`.
    ///
    /// Top-level rules are independent of each other: declaration order
    /// affects only the order of collected messages, never whether a
    /// sibling rule runs.
    pub fn validate(&self, request: &R) -> ValidationOutcome {
        let mut errors = Vec::new();
        for rule in &self.rules {
            rule.evaluate(request, &self.labels, &mut errors);
        }

        ValidationOutcome { errors }
    }
}

impl<R: RequestParameters> Default for Validator<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one validation run
#[derive(Clone, Debug)]
pub struct ValidationOutcome {
    errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All messages joined into a single line, for surfacing as one error
    pub fn joined(&self) -> String {
        self.errors.join("; ")
    }
}

// ============================================================================
// Standard checks
// ============================================================================

/// Fails when the value is absent or an empty string
pub fn require_non_empty(label: &str, value: Option<&str>) -> Option<String> {
    match value {
        None => Some(format!("'{}' must be present", label)),
        Some("") => Some(format!("'{}' must be present", label)),
        Some(_) => None,
    }
}

/// Fails when a present value is not an ISO calendar date (yyyy-MM-dd).
/// Absence is not this check's concern.
pub fn check_date_format(label: &str, value: Option<&str>) -> Option<String> {
    let value = value?;

    if value.parse::<NaiveDate>().is_err() {
        return Some(format!(
            "'{}' is malformed: '{}'. Accepted format is 'yyyy-MM-dd'",
            label, value
        ));
    }
    None
}

/// Fails when a present value is not a base-10 integer
pub fn check_integer_format(label: &str, value: Option<&str>) -> Option<String> {
    let value = value?;

    if value.parse::<i32>().is_err() {
        return Some(format!("'{}' is malformed: '{}'", label, value));
    }
    None
}

/// Fails when a present, parseable value is negative.
///
/// Parsing uses a wider integer than the format check so that input the
/// format check already reported never makes this check fail or panic;
/// unparsable input means the check simply does not apply.
pub fn require_positive_number(label: &str, value: Option<&str>) -> Option<String> {
    let value = value?;

    match value.parse::<i64>() {
        Ok(number) if number < 0 => Some(format!("'{}' must be a positive value", label)),
        _ => None,
    }
}

/// Fails when a present, parseable value is exactly zero
pub fn require_non_zero(label: &str, value: Option<&str>) -> Option<String> {
    let value = value?;

    match value.parse::<i64>() {
        Ok(0) => Some(format!("'{}' must be greater than zero", label)),
        _ => None,
    }
}

/// Build a check failing with a generic "illegal value" message when the
/// predicate rejects a present value
pub fn assert_truth_condition(
    predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
) -> impl Fn(&str, Option<&str>) -> Option<String> + Send + Sync + 'static {
    move |label, value| {
        let value = value?;

        if !predicate(value) {
            return Some(format!("'{}' has illegal value: '{}'", label, value));
        }
        None
    }
}
