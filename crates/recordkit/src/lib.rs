pub mod db;
pub use db::Db;

mod entity;
pub use entity::EntityType;

mod model;
pub use model::{Model, RequiredModels};

mod options;
pub use options::{FindOptions, SaveOptions, ValidateOptions};

pub mod record;
pub use record::{ErrorBag, ErrorKey, Record};

pub mod relation;
pub use relation::RelationProxy;

mod save_error;

pub mod validation;
pub use validation::{Rule, Validations};

pub use recordkit_core::{
    attrs, bail, driver,
    driver::{Direction, Driver, QueryOptions},
    err, schema, stmt, Attributes, Error, Result, SchemaSource, Value,
};
