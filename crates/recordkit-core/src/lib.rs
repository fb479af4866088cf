#[macro_use]
mod macros;

pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError, ValidationFailure};

pub mod schema;
pub use schema::{Datamodel, Reflection, Reflector, SchemaSource};

pub mod stmt;
pub use stmt::{Attributes, Value};

/// A Result type alias that uses recordkit's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
