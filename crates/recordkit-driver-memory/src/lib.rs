mod filter;
mod store;
mod table;

use store::Store;

use recordkit_core::{
    async_trait, bail,
    driver::{Driver, Operation, Response},
    schema::Datamodel,
    Result,
};

use std::sync::{Mutex, PoisonError};

/// An in-process query client.
///
/// Rows live in memory, one table per model of the registered datamodel.
/// The driver enforces the constraints the datamodel declares: required
/// fields, unique fields, defaults and `@updatedAt` timestamps. Filters
/// support scalar operators, `AND`/`OR`/`NOT` and relation filters
/// (`some`/`every`/`none`, `is`/`isNot`), and implicit many-to-many links
/// are maintained through `connect`/`disconnect` writes.
#[derive(Debug, Default)]
pub struct Memory {
    store: Mutex<Option<Store>>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }
}

#[async_trait]
impl Driver for Memory {
    async fn register_schema(&mut self, schema: &Datamodel) -> Result<()> {
        log::debug!("registering schema; models={}", schema.models.len());

        let store = self.store.get_mut().unwrap_or_else(PoisonError::into_inner);
        *store = Some(Store::new(schema.clone()));
        Ok(())
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(store) = store.as_mut() else {
            bail!("memory driver has no registered schema");
        };

        store.exec(op)
    }
}
