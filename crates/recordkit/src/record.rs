mod errors;
pub use errors::{ErrorBag, ErrorKey};

use crate::{
    attrs,
    save_error::{SaveError, SaveOp},
    Attributes, Db, EntityType, Error, Model, RelationProxy, Result, SaveOptions, ValidateOptions,
    Value,
};

use recordkit_core::schema::Relation;

use indexmap::IndexSet;
use serde::{Serialize, Serializer};
use std::{fmt, marker::PhantomData, sync::Arc};

/// An instance of the entity type `M`.
///
/// The attribute map is the single source of truth: `get` and `set` read and
/// write it directly. Every attribute key has an accessor and an error list;
/// both are created when the record is constructed and again whenever the
/// map is replaced by storage.
pub struct Record<M> {
    entity: Arc<EntityType>,
    attributes: Attributes,
    accessors: IndexSet<String>,
    errors: ErrorBag,
    relations: bool,
    state: State,
    _model: PhantomData<fn() -> M>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    New,
    Persisted,
    Destroyed,
}

impl<M: Model> Record<M> {
    pub(crate) fn new(entity: Arc<EntityType>, attributes: Attributes) -> Record<M> {
        let mut record = Record {
            entity,
            attributes,
            accessors: IndexSet::new(),
            errors: ErrorBag::new(),
            relations: false,
            state: State::New,
            _model: PhantomData,
        };
        record.install_accessors();
        record
    }

    /// A record read back from storage, with relationship accessors.
    pub(crate) fn loaded(entity: Arc<EntityType>, attributes: Attributes) -> Record<M> {
        let mut record = Record::new(entity, attributes);
        record.install_relations();
        record.state = State::Persisted;
        record
    }

    pub(crate) fn install_relations(&mut self) {
        self.relations = true;
    }

    /// Creates an accessor and an error list for every attribute key that
    /// lacks one. Relationship names never become attribute accessors.
    fn install_accessors(&mut self) {
        let reflection = self.entity.reflection();

        for key in self.attributes.keys() {
            if reflection.is_relation(key) || self.accessors.contains(key) {
                continue;
            }

            self.accessors.insert(key.clone());
            self.errors.ensure(key);
        }
    }

    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Attribute names with an installed accessor, in installation order.
    pub fn accessors(&self) -> impl Iterator<Item = &str> {
        self.accessors.iter().map(String::as_str)
    }

    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessors.contains(name)
    }

    /// Reads an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Reads an attribute converted to `T`. An absent attribute fails with
    /// `MissingAttribute`.
    pub fn get_as<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        match self.attributes.get(name) {
            Some(value) => T::try_from(value.clone()),
            None => Err(Error::missing_attribute(name)),
        }
    }

    /// Writes an attribute, installing its accessor if needed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self.install_accessors();
        self
    }

    /// The primary key value, unless absent or null.
    pub fn primary_key(&self) -> Option<&Value> {
        self.attributes
            .get(self.entity.primary_key())
            .filter(|value| !value.is_null())
    }

    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Appends an error message. Discarded by the next `validate`.
    pub fn add_error(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        self.errors.add(key, message);
    }

    pub fn has_error(&self) -> bool {
        self.errors.has_error()
    }

    /// Re-runs validation and reports whether the record has no errors.
    pub fn is_valid(&mut self) -> bool {
        matches!(self.validate(ValidateOptions::default()), Ok(true)) && !self.has_error()
    }

    /// Clears every error list and runs the entity type's rules.
    ///
    /// Returns `Ok(true)` when every rule passed. With `throw`, the first
    /// failing rule is returned as a `Validation` error.
    pub fn validate(&mut self, options: ValidateOptions) -> Result<bool> {
        self.errors.clear();
        self.entity
            .validations()
            .run(&self.attributes, &mut self.errors, options.throw)
    }

    pub fn is_persisted(&self) -> bool {
        self.state == State::Persisted
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == State::Destroyed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            Err(Error::record_not_found(M::NAME).context("record was destroyed"))
        } else {
            Ok(())
        }
    }

    /// Validates and writes the record: an update when it has a primary key,
    /// a create otherwise.
    ///
    /// On success the attribute map is replaced by the stored row. A failed
    /// validation, a missing row, a null required column or an absent
    /// required column is recorded in the error bag and reported as
    /// `Ok(false)`, or raised when `options.throw` is set. Other storage
    /// failures are always returned as errors.
    pub async fn save(&mut self, db: &Db, options: SaveOptions) -> Result<bool> {
        self.ensure_live()?;

        if !self.validate(options.into())? {
            return Ok(false);
        }

        let (op, result) = match self.primary_key().cloned() {
            Some(id) => {
                let data = self.payload(true);
                (SaveOp::Update, self.entity.update(db, id, data).await)
            }
            None => {
                let data = self.payload(false);
                (SaveOp::Create, self.entity.create(db, data).await)
            }
        };

        match result {
            Ok(row) => {
                self.attributes = row;
                self.install_accessors();
                self.state = State::Persisted;
                Ok(true)
            }
            Err(err) => self.on_save_error(err, op, options),
        }
    }

    /// Merges `attributes` into the record, then saves it.
    pub async fn update(
        &mut self,
        db: &Db,
        attributes: Attributes,
        options: SaveOptions,
    ) -> Result<bool> {
        self.ensure_live()?;

        for (name, value) in attributes {
            self.attributes.insert(name, value);
        }
        self.install_accessors();

        self.save(db, options).await
    }

    /// Deletes the backing row. The record stays readable but can no longer
    /// be saved, updated or destroyed.
    pub async fn destroy(&mut self, db: &Db, options: SaveOptions) -> Result<bool> {
        self.ensure_live()?;

        let deleted = match self.primary_key().cloned() {
            Some(id) => self.entity.delete(db, id).await,
            None => Ok(None),
        };

        match deleted {
            Ok(Some(_)) => {
                self.state = State::Destroyed;
                Ok(true)
            }
            Ok(None) => self.on_save_error(Error::record_not_found(M::NAME), SaveOp::Create, options),
            Err(err) => self.on_save_error(err, SaveOp::Create, options),
        }
    }

    fn on_save_error(&mut self, err: Error, op: SaveOp, options: SaveOptions) -> Result<bool> {
        let Some(failure) = SaveError::classify(&err) else {
            return Err(err);
        };

        log::debug!(
            "save failed; model={}; op={op:?}; failure={failure:?}",
            M::NAME
        );

        self.errors
            .add(failure.key(), failure.message(M::NAME, op));

        if options.throw {
            Err(failure.to_error(M::NAME, op))
        } else {
            Ok(false)
        }
    }

    /// The create or update payload. Relationship keys are sent only when
    /// they hold a nested write such as `connect`; the primary key is left
    /// out of updates and dropped from creates when null.
    fn payload(&self, update: bool) -> Attributes {
        let reflection = self.entity.reflection();
        let primary_key = self.entity.primary_key();

        self.attributes
            .iter()
            .filter(|(name, value)| {
                if reflection.is_relation(name) {
                    return value.is_map();
                }
                if name.as_str() == primary_key {
                    return !update && !value.is_null();
                }
                true
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn relation(&self, name: &str) -> Result<&Relation> {
        if !self.relations {
            return Err(Error::unknown_relation_detail(
                M::NAME,
                name,
                "relationship accessors are installed by `build`",
            ));
        }

        self.entity.relation(name)
    }

    fn value(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or_default()
    }

    /// A proxy over the records on the many side of relationship `name`.
    ///
    /// Fails with `MissingRequiredRelatedType` when `M` does not require the
    /// target type.
    pub fn has_many<T: Model>(&self, name: &str) -> Result<RelationProxy<T>> {
        let relation = self.relation(name)?;
        verify_target::<M, T>(name, relation)?;

        match relation {
            Relation::HasMany(has_many) => {
                let constraint = attrs! {
                    has_many.foreign_key.as_str() => self.value(&has_many.referenced_key),
                };
                Ok(RelationProxy::new(constraint.clone(), constraint))
            }
            Relation::ManyToMany(many_to_many) => {
                let key = attrs! {
                    many_to_many.referenced_key.as_str() => self.value(&many_to_many.referenced_key),
                };
                let constraint = attrs! {
                    many_to_many.inverse.as_str() => attrs! { "some" => key.clone() },
                };
                let link = attrs! {
                    many_to_many.inverse.as_str() => attrs! { "connect" => vec![key] },
                };
                Ok(RelationProxy::new(constraint, link))
            }
            other => Err(wrong_kind::<M>(name, other, "has_many")),
        }
    }

    /// Resolves the single record relationship `name` points at. A null
    /// foreign key resolves to `None`.
    pub async fn belongs_to<T: Model>(&self, db: &Db, name: &str) -> Result<Option<Record<T>>> {
        let relation = self.relation(name)?;
        verify_target::<M, T>(name, relation)?;

        let Relation::BelongsTo(belongs_to) = relation else {
            return Err(wrong_kind::<M>(name, relation, "belongs_to"));
        };

        let foreign_key = self.value(&belongs_to.foreign_key);
        if foreign_key.is_null() {
            return Ok(None);
        }

        T::find_by(db, attrs! { belongs_to.referenced_key.as_str() => foreign_key }).await
    }

    /// Resolves the record on the other side of a one-to-one relationship
    /// whose key lives on the target.
    pub async fn has_one<T: Model>(&self, db: &Db, name: &str) -> Result<Option<Record<T>>> {
        let relation = self.relation(name)?;
        verify_target::<M, T>(name, relation)?;

        let Relation::HasOne(has_one) = relation else {
            return Err(wrong_kind::<M>(name, relation, "has_one"));
        };

        let referenced_key = self.value(&has_one.referenced_key);
        if referenced_key.is_null() {
            return Ok(None);
        }

        T::find_by(db, attrs! { has_one.foreign_key.as_str() => referenced_key }).await
    }
}

fn verify_target<M: Model, T: Model>(name: &str, relation: &Relation) -> Result<()> {
    if relation.target() == T::NAME {
        Ok(())
    } else {
        Err(Error::unknown_relation_detail(
            M::NAME,
            name,
            format!("it targets {}, not {}", relation.target(), T::NAME),
        ))
    }
}

fn wrong_kind<M: Model>(name: &str, relation: &Relation, expected: &str) -> Error {
    Error::unknown_relation_detail(
        M::NAME,
        name,
        format!("it is {}, not {expected}", relation.kind_name()),
    )
}

impl<M> Clone for Record<M> {
    fn clone(&self) -> Self {
        Record {
            entity: self.entity.clone(),
            attributes: self.attributes.clone(),
            accessors: self.accessors.clone(),
            errors: self.errors.clone(),
            relations: self.relations,
            state: self.state,
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Record<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("model", &self.entity.name())
            .field("attributes", &self.attributes)
            .field("errors", &self.errors)
            .field("state", &self.state)
            .finish()
    }
}

impl<M> Serialize for Record<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
