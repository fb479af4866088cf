mod rule;
pub use rule::{Length, Numericality, Rule};

use crate::{Attributes, Error, ErrorBag, ErrorKey, Result, Value};

/// The declared rule set of an entity type, in declaration order.
///
/// ```ignore
/// Validations::new()
///     .validates("email", [Rule::presence(), Rule::email()])
///     .validates("name", [Rule::length(Length { max: Some(80), ..Length::default() })])
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validations {
    rules: Vec<(String, Vec<Rule>)>,
}

impl Validations {
    pub fn new() -> Validations {
        Validations::default()
    }

    pub fn validates(
        mut self,
        attribute: impl Into<String>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Validations {
        self.rules
            .push((attribute.into(), rules.into_iter().collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(attribute, _)| attribute.as_str())
    }

    /// Runs every rule against `attributes`, appending failures to `errors`.
    ///
    /// Returns `Ok(true)` when every rule passed. With `throw` set the first
    /// failure is recorded and then returned as a validation error; later
    /// rules are not evaluated.
    pub(crate) fn run(
        &self,
        attributes: &Attributes,
        errors: &mut ErrorBag,
        throw: bool,
    ) -> Result<bool> {
        let mut valid = true;

        for (attribute, rules) in &self.rules {
            let value = attributes.get(attribute).unwrap_or(&Value::Null);

            for rule in rules {
                let Some(message) = rule.check(attribute, value, attributes) else {
                    continue;
                };

                errors.add(ErrorKey::attribute(attribute), message.clone());
                valid = false;

                if throw {
                    return Err(Error::validation(attribute.clone(), message));
                }
            }
        }

        Ok(valid)
    }
}
