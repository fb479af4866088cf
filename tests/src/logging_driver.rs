use recordkit::{
    driver::{Driver, Operation, Response},
    schema::Datamodel,
    Result,
};

use std::sync::{Arc, Mutex};

/// A driver wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[derive(Debug, Clone)]
pub struct DriverOp {
    pub operation: Operation,

    /// `None` when the operation failed
    pub response: Option<Response>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait::async_trait]
impl Driver for LoggingDriver {
    async fn register_schema(&mut self, schema: &Datamodel) -> Result<()> {
        self.inner.register_schema(schema).await
    }

    async fn exec(&self, operation: Operation) -> Result<Response> {
        let result = self.inner.exec(operation.clone()).await;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation,
                response: result.as_ref().ok().cloned(),
            });

        result
    }
}
