use super::{
    AttributeDescriptor, BelongsTo, Datamodel, Field, HasMany, HasOne, ManyToMany, Model,
    Relation, SchemaSource,
};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Relationship and attribute metadata for one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    model: String,
    primary_key: Option<String>,
    attributes: IndexMap<String, AttributeDescriptor>,
    relations: IndexMap<String, Relation>,
}

/// Derives [`Reflection`]s from a schema source.
///
/// The datamodel is loaded on first use and each entity type is reflected at
/// most once; results are cached for the lifetime of the reflector.
#[derive(Debug)]
pub struct Reflector {
    source: SchemaSource,
    datamodel: OnceCell<Arc<Datamodel>>,
    cache: Mutex<HashMap<String, Arc<Reflection>>>,
}

impl Reflector {
    pub fn new(source: SchemaSource) -> Reflector {
        Reflector {
            source,
            datamodel: OnceCell::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn datamodel(&self) -> Result<&Arc<Datamodel>> {
        self.datamodel
            .get_or_try_init(|| async { self.source.load().await.map(Arc::new) })
            .await
    }

    pub async fn reflect(&self, model: &str) -> Result<Arc<Reflection>> {
        if let Some(reflection) = self.cached(model) {
            return Ok(reflection);
        }

        let datamodel = self.datamodel().await?;
        let reflection = Arc::new(Reflection::parse(datamodel, model)?);
        log::debug!(
            "reflected model; model={model}; attributes={}; relations={}",
            reflection.attributes.len(),
            reflection.relations.len()
        );

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cache
            .entry(model.to_string())
            .or_insert(reflection)
            .clone())
    }

    fn cached(&self, model: &str) -> Option<Arc<Reflection>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .cloned()
    }
}

impl Reflection {
    /// Reflects `name` out of `datamodel`.
    ///
    /// Relations are parsed before attributes so that every field taking part
    /// in a relationship is excluded from the scalar attributes. Foreign key
    /// scalars (`userId`) are attributes.
    pub fn parse(datamodel: &Datamodel, name: &str) -> Result<Reflection> {
        let model = datamodel.model(name).ok_or_else(|| {
            Error::invalid_schema(format!("model `{name}` is not in the datamodel"))
        })?;

        let mut relations = IndexMap::new();
        for field in model.fields.iter().filter(|field| field.is_relation()) {
            let relation = parse_relation(datamodel, model, field)?;
            relations.insert(field.name.clone(), relation);
        }

        let attributes = model
            .fields
            .iter()
            .filter(|field| !relations.contains_key(&field.name))
            .map(|field| (field.name.clone(), AttributeDescriptor::from_field(field)))
            .collect();

        Ok(Reflection {
            model: model.name.clone(),
            primary_key: model.id_fields().next().map(|field| field.name.clone()),
            attributes,
            relations,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The field the datamodel marks as the identifier, if any.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn attributes(&self) -> &IndexMap<String, AttributeDescriptor> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }

    /// Every relation, in declaration order.
    pub fn relations(&self) -> &IndexMap<String, Relation> {
        &self.relations
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn is_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Multi-valued relations: one-to-many and implicit many-to-many.
    pub fn has_many(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().filter_map(|(name, relation)| match relation {
            Relation::HasMany(_) | Relation::ManyToMany(_) => Some((name.as_str(), relation)),
            _ => None,
        })
    }

    pub fn belongs_to(&self) -> impl Iterator<Item = (&str, &BelongsTo)> {
        self.relations.iter().filter_map(|(name, relation)| match relation {
            Relation::BelongsTo(belongs_to) => Some((name.as_str(), belongs_to)),
            _ => None,
        })
    }

    pub fn has_one(&self) -> impl Iterator<Item = (&str, &HasOne)> {
        self.relations.iter().filter_map(|(name, relation)| match relation {
            Relation::HasOne(has_one) => Some((name.as_str(), has_one)),
            _ => None,
        })
    }
}

fn parse_relation(datamodel: &Datamodel, model: &Model, field: &Field) -> Result<Relation> {
    let target = datamodel.model(&field.ty).ok_or_else(|| {
        Error::invalid_schema(format!(
            "field `{}::{}` references model `{}`, which is not in the datamodel",
            model.name, field.name, field.ty
        ))
    })?;

    // A single-valued field holding the key pair is the owning side.
    if !field.is_list {
        if let Some(belongs_to) = key_pair(field) {
            let (foreign_key, referenced_key) = belongs_to;
            return Ok(Relation::BelongsTo(BelongsTo {
                target: target.name.clone(),
                foreign_key,
                referenced_key,
            }));
        }
    }

    // Every other relation takes its keys from the inverse field.
    let inverse = target
        .fields
        .iter()
        .filter(|other| !(target.name == model.name && other.name == field.name))
        .find(|other| field.pairs_with(other, &model.name))
        .ok_or_else(|| {
            Error::invalid_schema(format!(
                "field `{}::{}` has no inverse relation field on `{}`",
                model.name, field.name, target.name
            ))
        })?;

    if field.is_list && inverse.is_list {
        let referenced_key = model
            .id_fields()
            .next()
            .map(|id| id.name.clone())
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "field `{}::{}` is many-to-many but `{}` has no id field",
                    model.name, field.name, model.name
                ))
            })?;

        return Ok(Relation::ManyToMany(ManyToMany {
            target: target.name.clone(),
            inverse: inverse.name.clone(),
            referenced_key,
        }));
    }

    let (foreign_key, referenced_key) = key_pair(inverse).ok_or_else(|| {
        Error::invalid_schema(format!(
            "field `{}::{}` pairs with `{}::{}`, which declares no foreign key",
            model.name, field.name, target.name, inverse.name
        ))
    })?;

    Ok(if field.is_list {
        Relation::HasMany(HasMany {
            target: target.name.clone(),
            foreign_key,
            referenced_key,
        })
    } else {
        Relation::HasOne(HasOne {
            target: target.name.clone(),
            foreign_key,
            referenced_key,
        })
    })
}

/// The first `(fromField, toField)` pair a relation field declares.
fn key_pair(field: &Field) -> Option<(String, String)> {
    match (
        field.relation_from_fields.first(),
        field.relation_to_fields.first(),
    ) {
        (Some(from), Some(to)) => Some((from.clone(), to.clone())),
        _ => None,
    }
}
