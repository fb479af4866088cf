//! Datamodel description and reflection over it.

mod datamodel;
pub use datamodel::{Datamodel, Field, FieldDefault, FieldKind, Model};

mod descriptor;
pub use descriptor::{AttributeDescriptor, BelongsTo, HasMany, HasOne, ManyToMany, Relation, ScalarKind};

mod name;
pub use name::storage_accessor;

mod reflect;
pub use reflect::{Reflection, Reflector};

mod source;
pub use source::{SchemaSource, DATAMODEL_ENV};
