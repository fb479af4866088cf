use crate::{Error, ErrorKey};

use recordkit_core::driver::DriverErrorCode;

use regex::Regex;
use std::sync::OnceLock;

/// A storage failure that `save` reports through the error bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SaveError {
    NotFound,
    NullAttribute(String),
    MissingAttribute(String),
}

/// Which storage call failed; decides the not-found wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveOp {
    Create,
    Update,
}

impl SaveError {
    /// Classifies a failed create or update. Returns `None` for failures
    /// that are not one of the save-time kinds.
    ///
    /// Structured driver codes are used when present; otherwise the message
    /// is inspected.
    pub(crate) fn classify(err: &Error) -> Option<SaveError> {
        if err.is_record_not_found() {
            return Some(SaveError::NotFound);
        }

        if let Some(driver) = err.driver_error() {
            match driver.code() {
                DriverErrorCode::RecordNotFound => return Some(SaveError::NotFound),
                DriverErrorCode::NullConstraint { field } => {
                    return Some(SaveError::NullAttribute(field.clone()))
                }
                DriverErrorCode::MissingArgument { field } => {
                    return Some(SaveError::MissingAttribute(field.clone()))
                }
                DriverErrorCode::Other => return SaveError::from_message(driver.message()),
                _ => return None,
            }
        }

        SaveError::from_message(&err.root().to_string())
    }

    fn from_message(message: &str) -> Option<SaveError> {
        if message.contains("record not found") || message.contains("Record to update not found")
        {
            Some(SaveError::NotFound)
        } else if message.contains("must not be null") {
            argument_name(message).map(SaveError::NullAttribute)
        } else if message.contains("is missing") {
            argument_name(message).map(SaveError::MissingAttribute)
        } else {
            None
        }
    }

    /// Where the failure is recorded in the error bag.
    pub(crate) fn key(&self) -> ErrorKey {
        match self {
            SaveError::NullAttribute(attribute) => ErrorKey::attribute(attribute),
            SaveError::NotFound | SaveError::MissingAttribute(_) => ErrorKey::Base,
        }
    }

    /// Message recorded in the error bag.
    pub(crate) fn message(&self, model: &str, op: SaveOp) -> String {
        match self {
            SaveError::NotFound => self.to_error(model, op).to_string(),
            SaveError::NullAttribute(_) => "must not be null".to_string(),
            SaveError::MissingAttribute(attribute) => format!("{attribute} is missing"),
        }
    }

    /// The typed error raised in throw mode.
    pub(crate) fn to_error(&self, model: &str, op: SaveOp) -> Error {
        match (self, op) {
            (SaveError::NotFound, SaveOp::Update) => Error::record_to_update_not_found(model),
            (SaveError::NotFound, SaveOp::Create) => Error::record_not_found(model),
            (SaveError::NullAttribute(attribute), _) => Error::null_attribute(attribute.clone()),
            (SaveError::MissingAttribute(attribute), _) => {
                Error::missing_attribute(attribute.clone())
            }
        }
    }
}

/// Pulls the argument name out of a client message such as
/// "Argument `email` must not be null." or "email is missing".
fn argument_name(message: &str) -> Option<String> {
    static ARGUMENT: OnceLock<Regex> = OnceLock::new();
    let pattern = ARGUMENT.get_or_init(|| {
        Regex::new(r"Argument `?(\w+)`?|^`?(\w+)`? (?:must not be null|is missing)")
            .expect("valid argument pattern")
    });

    pattern
        .captures(message)
        .and_then(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|name| name.as_str().to_string())
}
