use crate::{model::RequiredModels, Db, Error, QueryOptions, Result, Validations, Value};

use recordkit_core::{
    driver::operation::{Create, Delete, FindFirst, FindMany, FindUnique, Update},
    schema::Relation,
    Attributes, Reflection,
};

use std::sync::Arc;

/// Runtime metadata for a registered [`Model`](crate::Model): the declared
/// settings plus the reflected attributes and relationships.
#[derive(Debug)]
pub struct EntityType {
    name: &'static str,
    primary_key: &'static str,
    accessor: String,
    validations: Validations,
    required: RequiredModels,
    reflection: Arc<Reflection>,
}

impl EntityType {
    pub(crate) fn new(
        name: &'static str,
        primary_key: &'static str,
        accessor: String,
        validations: Validations,
        required: RequiredModels,
        reflection: Arc<Reflection>,
    ) -> EntityType {
        EntityType {
            name,
            primary_key,
            accessor,
            validations,
            required,
            reflection,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    /// Storage accessor name passed to the query client.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    pub fn validations(&self) -> &Validations {
        &self.validations
    }

    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    pub fn requires(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn required_models(&self) -> &RequiredModels {
        &self.required
    }

    /// Looks up a relationship. Targets were checked against the required
    /// models when the `Db` was built.
    pub(crate) fn relation(&self, name: &str) -> Result<&Relation> {
        self.reflection
            .relation(name)
            .ok_or_else(|| Error::unknown_relation(self.name, name))
    }

    fn key(&self, id: Value) -> Attributes {
        let mut key = Attributes::new();
        key.insert(self.primary_key.to_string(), id);
        key
    }

    pub(crate) async fn find(&self, db: &Db, id: Value, filter: Attributes) -> Result<Attributes> {
        let row = if filter.is_empty() {
            db.exec(FindUnique {
                model: self.accessor.clone(),
                key: self.key(id),
            })
            .await?
            .into_row()?
        } else {
            let mut filter = filter;
            filter.insert(self.primary_key.to_string(), id);
            db.exec(FindFirst {
                model: self.accessor.clone(),
                filter,
            })
            .await?
            .into_row()?
        };

        row.ok_or_else(|| Error::record_not_found(self.name))
    }

    pub(crate) async fn find_first(
        &self,
        db: &Db,
        filter: Attributes,
    ) -> Result<Option<Attributes>> {
        db.exec(FindFirst {
            model: self.accessor.clone(),
            filter,
        })
        .await?
        .into_row()
    }

    pub(crate) async fn find_many(
        &self,
        db: &Db,
        filter: Attributes,
        options: QueryOptions,
    ) -> Result<Vec<Attributes>> {
        db.exec(FindMany {
            model: self.accessor.clone(),
            filter,
            options,
        })
        .await?
        .into_rows()
    }

    pub(crate) async fn create(&self, db: &Db, data: Attributes) -> Result<Attributes> {
        let row = db
            .exec(Create {
                model: self.accessor.clone(),
                data,
            })
            .await?
            .into_row()?;

        row.ok_or_else(|| crate::err!("driver returned no row for create; model={}", self.name))
    }

    pub(crate) async fn update(&self, db: &Db, id: Value, data: Attributes) -> Result<Attributes> {
        let row = db
            .exec(Update {
                model: self.accessor.clone(),
                key: self.key(id),
                data,
            })
            .await?
            .into_row()?;

        row.ok_or_else(|| Error::record_to_update_not_found(self.name))
    }

    pub(crate) async fn delete(&self, db: &Db, id: Value) -> Result<Option<Attributes>> {
        db.exec(Delete {
            model: self.accessor.clone(),
            key: self.key(id),
        })
        .await?
        .into_row()
    }
}
