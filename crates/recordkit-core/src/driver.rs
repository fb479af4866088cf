pub mod operation;
pub use operation::{Direction, Operation, OrderBy, QueryOptions};

mod response;
pub use response::Response;

pub use crate::error::{DriverError, DriverErrorCode};

use crate::{async_trait, schema::Datamodel};

use std::fmt::Debug;

/// The query client a `Db` delegates storage to.
///
/// Every operation addresses a model by its storage accessor name and either
/// completes or fails with a [`DriverError`]-backed [`crate::Error`].
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register the datamodel with the driver. Called once when the `Db` is
    /// built, before any operation is executed.
    async fn register_schema(&mut self, schema: &Datamodel) -> crate::Result<()>;

    /// Execute a storage operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
