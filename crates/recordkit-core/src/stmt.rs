//! Values exchanged between records and the query client.

mod attributes;
pub use attributes::{merge, Attributes};

mod value;
pub use value::Value;
