use super::datamodel::{Field, FieldKind};

use serde::Serialize;

/// A scalar attribute of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: ScalarKind,
    pub nullable: bool,
    pub has_default: bool,
    pub is_id: bool,
    pub is_unique: bool,
    pub is_updated_at: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
    Int,
    BigInt,
    Float,
    Decimal,
    String,
    Boolean,
    DateTime,
    Json,
    Bytes,
    Enum(String),
    Unsupported(String),
}

/// One side of a relationship, from the point of view of the entity type
/// that declares the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Relation {
    HasMany(HasMany),
    ManyToMany(ManyToMany),
    HasOne(HasOne),
    BelongsTo(BelongsTo),
}

/// One-to-many: rows of `target` whose `foreign_key` equals this record's
/// `referenced_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HasMany {
    pub target: String,
    pub foreign_key: String,
    pub referenced_key: String,
}

/// Implicit many-to-many: rows of `target` whose `inverse` list contains
/// this record, matched on `referenced_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManyToMany {
    pub target: String,
    pub inverse: String,
    pub referenced_key: String,
}

/// The key-less side of a one-to-one: the single row of `target` whose
/// `foreign_key` equals this record's `referenced_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HasOne {
    pub target: String,
    pub foreign_key: String,
    pub referenced_key: String,
}

/// Many-to-one: the row of `target` whose `referenced_key` equals this
/// record's `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BelongsTo {
    pub target: String,
    pub foreign_key: String,
    pub referenced_key: String,
}

impl Relation {
    pub fn target(&self) -> &str {
        match self {
            Self::HasMany(rel) => &rel.target,
            Self::ManyToMany(rel) => &rel.target,
            Self::HasOne(rel) => &rel.target,
            Self::BelongsTo(rel) => &rel.target,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::HasMany(_) => "has_many",
            Self::ManyToMany(_) => "many_to_many",
            Self::HasOne(_) => "has_one",
            Self::BelongsTo(_) => "belongs_to",
        }
    }
}

impl AttributeDescriptor {
    pub(super) fn from_field(field: &Field) -> Self {
        AttributeDescriptor {
            name: field.name.clone(),
            kind: ScalarKind::from_field(field),
            nullable: !field.is_required,
            has_default: field.has_default_value,
            is_id: field.is_id,
            is_unique: field.is_unique,
            is_updated_at: field.is_updated_at,
        }
    }
}

impl ScalarKind {
    fn from_field(field: &Field) -> Self {
        if field.kind == FieldKind::Enum {
            return Self::Enum(field.ty.clone());
        }

        match field.ty.as_str() {
            "Int" => Self::Int,
            "BigInt" => Self::BigInt,
            "Float" => Self::Float,
            "Decimal" => Self::Decimal,
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "DateTime" => Self::DateTime,
            "Json" => Self::Json,
            "Bytes" => Self::Bytes,
            other => Self::Unsupported(other.to_string()),
        }
    }
}
