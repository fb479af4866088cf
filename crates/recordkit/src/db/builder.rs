use super::{Db, Shared};
use crate::{model::RequiredModels, EntityType, Error, Model, Result, Validations};

use recordkit_core::{
    driver::Driver,
    schema::{Reflection, Reflector, SchemaSource},
};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Entity types in registration order
    models: Vec<ModelDef>,

    /// Where the datamodel is loaded from. Falls back to
    /// `SchemaSource::from_env()` when unset.
    source: Option<SchemaSource>,
}

/// What a `Model` implementation declares, captured at registration.
#[derive(Debug)]
struct ModelDef {
    name: &'static str,
    primary_key: &'static str,
    accessor: String,
    validations: Validations,
    required: RequiredModels,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.push(ModelDef {
            name: M::NAME,
            primary_key: M::PRIMARY_KEY,
            accessor: M::db_accessor(),
            validations: M::validations(),
            required: RequiredModels::of::<M>(),
        });
        self
    }

    pub fn schema(&mut self, source: impl Into<SchemaSource>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    /// Loads the datamodel, reflects every registered type and hands the
    /// datamodel to `driver`.
    ///
    /// Fails when a registered type is missing from the datamodel, when its
    /// primary key is not one of its attributes, when one of its
    /// relationships targets a type it does not require, or when a required
    /// type was never registered.
    pub async fn build(&mut self, mut driver: impl Driver) -> Result<Db> {
        let source = match self.source.clone() {
            Some(source) => source,
            None => SchemaSource::from_env()?,
        };

        let reflector = Reflector::new(source);
        let datamodel = reflector.datamodel().await?.clone();

        let mut entities = IndexMap::new();

        for def in &self.models {
            if entities.contains_key(def.name) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` is registered more than once",
                    def.name
                )));
            }

            let reflection = reflector.reflect(def.name).await?;
            self.verify(def, &reflection)?;

            let entity = EntityType::new(
                def.name,
                def.primary_key,
                def.accessor.clone(),
                def.validations.clone(),
                def.required.clone(),
                reflection,
            );

            entities.insert(def.name, Arc::new(entity));
        }

        for def in &self.models {
            for required in def.required.iter() {
                if !entities.contains_key(required) {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` requires `{required}`, which is not registered",
                        def.name
                    )));
                }
            }
        }

        driver.register_schema(&datamodel).await?;

        log::debug!("built db; models={}", entities.len());

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                reflector,
                entities,
            }),
        })
    }

    fn verify(&self, def: &ModelDef, reflection: &Reflection) -> Result<()> {
        if reflection.attribute(def.primary_key).is_none() {
            return Err(Error::invalid_schema(format!(
                "primary key `{}` is not an attribute of model `{}`",
                def.primary_key, def.name
            )));
        }

        for (name, relation) in reflection.relations() {
            if !def.required.contains(relation.target()) {
                return Err(Error::missing_required_related_type(
                    def.name,
                    name,
                    relation.target(),
                ));
            }
        }

        Ok(())
    }
}
