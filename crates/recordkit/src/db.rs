mod builder;
pub use builder::Builder;

use crate::{EntityType, Error, Result};

use recordkit_core::{
    driver::{Driver, Operation, Response},
    schema::Reflector,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) reflector: Reflector,
    pub(crate) entities: IndexMap<&'static str, Arc<EntityType>>,
}

/// A handle to the registered entity types and the query client backing
/// them. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Metadata for the registered entity type `name`.
    pub fn entity(&self, name: &str) -> Result<&Arc<EntityType>> {
        self.shared
            .entities
            .get(name)
            .ok_or_else(|| Error::invalid_schema(format!("model `{name}` is not registered")))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.shared.entities.values()
    }

    pub fn reflector(&self) -> &Reflector {
        &self.shared.reflector
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// Execute a storage operation against the driver.
    pub(crate) async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();
        let model = op.model().to_string();
        let name = op.name();

        log::debug!("exec; model={model}; op={name}");

        match self.shared.driver.exec(op).await {
            Ok(response) => Ok(response),
            Err(err) => {
                log::warn!("operation failed; model={model}; op={name}; error={err}");
                Err(err)
            }
        }
    }
}
