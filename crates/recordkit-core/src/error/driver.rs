use super::Error;

/// Structured failure reported by a query client.
///
/// Drivers set `code` whenever they can classify the failure. Clients that
/// only surface messages report [`DriverErrorCode::Other`] and the save path
/// falls back to inspecting the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    code: DriverErrorCode,
    message: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverErrorCode {
    /// The row targeted by `update`/`delete` does not exist.
    RecordNotFound,

    /// A non-nullable field was explicitly set to null.
    NullConstraint { field: String },

    /// A required field without a default was absent from a create payload.
    MissingArgument { field: String },

    /// The operation named a model the driver does not know.
    UnknownModel,

    /// The payload or filter named a field the model does not have.
    UnknownArgument { field: String },

    /// Anything else. Only the message is meaningful.
    Other,
}

impl DriverError {
    pub fn new(code: DriverErrorCode, message: impl Into<String>) -> DriverError {
        DriverError {
            code,
            message: message.into().into(),
        }
    }

    pub fn record_not_found(message: impl Into<String>) -> DriverError {
        DriverError::new(DriverErrorCode::RecordNotFound, message)
    }

    pub fn null_constraint(field: impl Into<String>, message: impl Into<String>) -> DriverError {
        DriverError::new(
            DriverErrorCode::NullConstraint {
                field: field.into(),
            },
            message,
        )
    }

    pub fn missing_argument(field: impl Into<String>, message: impl Into<String>) -> DriverError {
        DriverError::new(
            DriverErrorCode::MissingArgument {
                field: field.into(),
            },
            message,
        )
    }

    pub fn other(message: impl Into<String>) -> DriverError {
        DriverError::new(DriverErrorCode::Other, message)
    }

    pub fn code(&self) -> &DriverErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for DriverError {}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<DriverError> for Error {
    fn from(err: DriverError) -> Error {
        Error::driver(err)
    }
}

impl Error {
    /// Creates an error from a query client failure.
    pub fn driver(err: DriverError) -> Error {
        Error::from(super::ErrorKind::Driver(err))
    }

    /// Returns `true` if this error is a driver error.
    pub fn is_driver(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::Driver(_))
    }

    pub fn driver_error(&self) -> Option<&DriverError> {
        match self.root_kind() {
            super::ErrorKind::Driver(err) => Some(err),
            _ => None,
        }
    }
}
