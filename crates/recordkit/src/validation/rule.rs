use crate::{Attributes, Value};

use regex::Regex;
use std::{
    fmt,
    sync::{Arc, OnceLock},
};

/// A single check applied to one attribute.
///
/// Every rule except `presence`, `absence` and `acceptance` passes when the
/// value is null; combine with `presence` to reject missing values.
#[derive(Clone)]
pub struct Rule {
    check: Check,
    message: Option<String>,
}

#[derive(Clone)]
enum Check {
    Presence,
    Absence,
    Acceptance,
    Email,
    Format(Regex),
    Length(Length),
    Inclusion(Vec<Value>),
    Exclusion(Vec<Value>),
    Numericality(Numericality),
    Custom(Arc<CustomCheck>),
}

type CustomCheck = dyn Fn(&Value, &Attributes) -> bool + Send + Sync;

/// Bounds for [`Rule::length`], counted in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub equal: Option<usize>,
}

/// Constraints for [`Rule::numericality`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Numericality {
    pub integer: bool,
    pub greater_than: Option<f64>,
    pub less_than: Option<f64>,
    pub equal: Option<f64>,
    pub even: bool,
    pub odd: bool,
    pub positive: bool,
    pub negative: bool,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^.\s]+\.\S+$").expect("valid email pattern"))
}

impl Rule {
    /// The value must not be blank.
    pub fn presence() -> Rule {
        Rule::from(Check::Presence)
    }

    /// The value must be blank.
    pub fn absence() -> Rule {
        Rule::from(Check::Absence)
    }

    /// The value must be `true`, `1`, `"true"` or `"1"`.
    pub fn acceptance() -> Rule {
        Rule::from(Check::Acceptance)
    }

    pub fn email() -> Rule {
        Rule::from(Check::Email)
    }

    pub fn format(pattern: Regex) -> Rule {
        Rule::from(Check::Format(pattern))
    }

    pub fn length(length: Length) -> Rule {
        Rule::from(Check::Length(length))
    }

    pub fn inclusion(values: impl IntoIterator<Item = impl Into<Value>>) -> Rule {
        Rule::from(Check::Inclusion(values.into_iter().map(Into::into).collect()))
    }

    pub fn exclusion(values: impl IntoIterator<Item = impl Into<Value>>) -> Rule {
        Rule::from(Check::Exclusion(values.into_iter().map(Into::into).collect()))
    }

    pub fn numericality(numericality: Numericality) -> Rule {
        Rule::from(Check::Numericality(numericality))
    }

    /// A caller-supplied predicate over the value and the full attribute
    /// map. Returning `false` fails the rule.
    pub fn custom<F>(check: F) -> Rule
    where
        F: Fn(&Value, &Attributes) -> bool + Send + Sync + 'static,
    {
        Rule::from(Check::Custom(Arc::new(check)))
    }

    /// Replaces the default failure message.
    pub fn message(mut self, message: impl Into<String>) -> Rule {
        self.message = Some(message.into());
        self
    }

    /// Applies the rule, returning the failure message if it does not hold.
    pub(crate) fn check(
        &self,
        attribute: &str,
        value: &Value,
        attributes: &Attributes,
    ) -> Option<String> {
        let failure = match &self.check {
            Check::Presence => value.is_blank().then(|| format!("{attribute} must be present")),
            Check::Absence => (!value.is_blank()).then(|| format!("{attribute} must be absent")),
            Check::Acceptance => {
                (!is_accepted(value)).then(|| format!("{attribute} must be accepted"))
            }
            _ if value.is_null() => None,
            Check::Email => match value.as_str() {
                Some(s) if email_pattern().is_match(s) => None,
                _ => Some(format!(
                    "{attribute} must be formatted like an email address"
                )),
            },
            Check::Format(pattern) => match value.as_str() {
                Some(s) if pattern.is_match(s) => None,
                _ => Some(format!("{attribute} is not formatted correctly")),
            },
            Check::Length(length) => check_length(attribute, value, length),
            Check::Inclusion(values) => (!values.contains(value))
                .then(|| format!("{attribute} must be included in the list")),
            Check::Exclusion(values) => {
                values.contains(value).then(|| format!("{attribute} is reserved"))
            }
            Check::Numericality(numericality) => {
                check_numericality(attribute, value, numericality)
            }
            Check::Custom(check) => {
                (!check(value, attributes)).then(|| format!("{attribute} is invalid"))
            }
        };

        failure.map(|default| self.message.clone().unwrap_or(default))
    }
}

impl From<Check> for Rule {
    fn from(check: Check) -> Rule {
        Rule {
            check,
            message: None,
        }
    }
}

fn is_accepted(value: &Value) -> bool {
    match value {
        Value::Bool(accepted) => *accepted,
        Value::I64(n) => *n == 1,
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

fn check_length(attribute: &str, value: &Value, length: &Length) -> Option<String> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        _ => value.to_string().chars().count(),
    };

    if let Some(equal) = length.equal {
        if len != equal {
            return Some(format!("{attribute} must be exactly {equal} characters"));
        }
    }

    if let Some(min) = length.min {
        if len < min {
            return Some(format!("{attribute} must be at least {min} characters"));
        }
    }

    if let Some(max) = length.max {
        if len > max {
            return Some(format!(
                "{attribute} must not be more than {max} characters"
            ));
        }
    }

    None
}

fn check_numericality(
    attribute: &str,
    value: &Value,
    numericality: &Numericality,
) -> Option<String> {
    let number = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => value.as_f64(),
    };

    let Some(number) = number else {
        return Some(format!("{attribute} must be a number"));
    };

    let is_integer = number.fract() == 0.0;

    if numericality.integer && !is_integer {
        return Some(format!("{attribute} must be an integer"));
    }

    if let Some(bound) = numericality.greater_than {
        if number <= bound {
            return Some(format!("{attribute} must be greater than {bound}"));
        }
    }

    if let Some(bound) = numericality.less_than {
        if number >= bound {
            return Some(format!("{attribute} must be less than {bound}"));
        }
    }

    if let Some(expected) = numericality.equal {
        if number != expected {
            return Some(format!("{attribute} must equal {expected}"));
        }
    }

    if numericality.even && !(is_integer && number % 2.0 == 0.0) {
        return Some(format!("{attribute} must be even"));
    }

    if numericality.odd && !(is_integer && number.abs() % 2.0 == 1.0) {
        return Some(format!("{attribute} must be odd"));
    }

    if numericality.positive && number <= 0.0 {
        return Some(format!("{attribute} must be positive"));
    }

    if numericality.negative && number >= 0.0 {
        return Some(format!("{attribute} must be negative"));
    }

    None
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Rule");

        match &self.check {
            Check::Presence => dbg.field("check", &"presence"),
            Check::Absence => dbg.field("check", &"absence"),
            Check::Acceptance => dbg.field("check", &"acceptance"),
            Check::Email => dbg.field("check", &"email"),
            Check::Format(pattern) => dbg.field("format", &pattern.as_str()),
            Check::Length(length) => dbg.field("length", length),
            Check::Inclusion(values) => dbg.field("inclusion", values),
            Check::Exclusion(values) => dbg.field("exclusion", values),
            Check::Numericality(numericality) => dbg.field("numericality", numericality),
            Check::Custom(_) => dbg.field("check", &"custom"),
        };

        dbg.field("message", &self.message).finish()
    }
}
