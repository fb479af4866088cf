use crate::{Error, Result};

use serde::{Deserialize, Serialize};

/// A declarative data-model description, in the shape of a DMMF datamodel
/// dump: models, their fields, and relation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datamodel {
    pub models: Vec<Model>,

    #[serde(default)]
    pub enums: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,

    /// Table name override, when the storage name differs from the model's.
    #[serde(default)]
    pub db_name: Option<String>,

    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,

    pub kind: FieldKind,

    /// Scalar type name (`Int`, `String`, ...), enum name, or related model
    /// name for `object` fields.
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub is_list: bool,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub is_id: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub has_default_value: bool,

    #[serde(default)]
    pub default: Option<FieldDefault>,

    #[serde(default)]
    pub is_updated_at: bool,

    #[serde(default)]
    pub relation_name: Option<String>,

    #[serde(default)]
    pub relation_from_fields: Vec<String>,

    #[serde(default)]
    pub relation_to_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Scalar,
    Object,
    Enum,
    Unsupported,
}

/// A field default: either a generator function (`autoincrement()`,
/// `now()`, `uuid()`, ...) or a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Function {
        name: String,
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },
    Literal(serde_json::Value),
}

impl Datamodel {
    /// Parses a datamodel from its JSON form.
    pub fn from_json(json: &str) -> Result<Datamodel> {
        serde_json::from_str(json)
            .map_err(|err| Error::from(err).context(crate::err!("failed to parse datamodel JSON")))
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    /// Finds a model by its storage accessor name.
    pub fn model_by_accessor(&self, accessor: &str) -> Option<&Model> {
        self.models
            .iter()
            .find(|model| super::storage_accessor(&model.name) == accessor)
    }
}

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields stored as columns: scalars and enums.
    pub fn scalar_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.is_relation())
    }

    pub fn id_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.is_id)
    }
}

impl Field {
    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Object
    }

    /// True when `other` is the opposite side of the same relation as `self`.
    pub fn pairs_with(&self, other: &Field, owner: &str) -> bool {
        if !other.is_relation() || other.ty != owner {
            return false;
        }

        match (&self.relation_name, &other.relation_name) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => true,
        }
    }

    pub fn default_function(&self) -> Option<&str> {
        match &self.default {
            Some(FieldDefault::Function { name, .. }) => Some(name),
            _ => None,
        }
    }
}
