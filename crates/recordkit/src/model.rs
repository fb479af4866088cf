use crate::{
    Attributes, Db, FindOptions, QueryOptions, Record, Result, SaveOptions, Validations, Value,
};

use recordkit_core::schema::storage_accessor;

/// An entity type.
///
/// Implementors declare the type's name in the datamodel, its primary key,
/// its validation rules and the related types it may resolve relationships
/// against. Attributes and relationships are reflected from the datamodel
/// when the type is registered with a [`Db`].
///
/// ```ignore
/// struct Post;
///
/// impl Model for Post {
///     const NAME: &'static str = "Post";
///
///     fn required_models(models: &mut RequiredModels) {
///         models.require::<User>();
///     }
/// }
///
/// let post = Post::find(&db, 1).await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait Model: Sized + Send + Sync + 'static {
    /// Name of the model in the datamodel.
    const NAME: &'static str;

    /// Attribute holding the primary key.
    const PRIMARY_KEY: &'static str = "id";

    /// Explicit storage accessor. Defaults to the lower camel case name.
    const ACCESSOR: Option<&'static str> = None;

    fn validations() -> Validations {
        Validations::new()
    }

    /// Declares the types this type's relationships may target.
    fn required_models(_models: &mut RequiredModels) {}

    /// Name the query client knows this type by.
    fn db_accessor() -> String {
        match Self::ACCESSOR {
            Some(accessor) => accessor.to_string(),
            None => storage_accessor(Self::NAME),
        }
    }

    /// Constructs a record holding `attributes` without relationship
    /// accessors. Does not touch storage.
    fn new(db: &Db, attributes: Attributes) -> Result<Record<Self>> {
        Ok(Record::new(db.entity(Self::NAME)?.clone(), attributes))
    }

    /// Constructs a record and installs its relationship accessors. Does not
    /// touch storage.
    fn build(db: &Db, attributes: Attributes) -> Result<Record<Self>> {
        let mut record = Self::new(db, attributes)?;
        record.install_relations();
        Ok(record)
    }

    /// Finds a record by primary key, failing with `RecordNotFound` when no
    /// row matches.
    async fn find(db: &Db, id: impl Into<Value>) -> Result<Record<Self>> {
        Self::find_with(db, id, FindOptions::default()).await
    }

    async fn find_with(
        db: &Db,
        id: impl Into<Value>,
        options: FindOptions,
    ) -> Result<Record<Self>> {
        let entity = db.entity(Self::NAME)?;
        let row = entity.find(db, id.into(), options.filter).await?;
        Ok(Record::loaded(entity.clone(), row))
    }

    /// Returns the first record matching `filter`, if any.
    async fn find_by(db: &Db, filter: Attributes) -> Result<Option<Record<Self>>> {
        let entity = db.entity(Self::NAME)?;
        let row = entity.find_first(db, filter).await?;
        Ok(row.map(|row| Record::loaded(entity.clone(), row)))
    }

    async fn first(db: &Db, filter: Attributes) -> Result<Option<Record<Self>>> {
        Self::find_by(db, filter).await
    }

    /// Returns every record matching `filter`, in storage order.
    #[doc(alias = "where")]
    async fn filter(db: &Db, filter: Attributes) -> Result<Vec<Record<Self>>> {
        Self::filter_with(db, filter, QueryOptions::default()).await
    }

    async fn filter_with(
        db: &Db,
        filter: Attributes,
        options: QueryOptions,
    ) -> Result<Vec<Record<Self>>> {
        let entity = db.entity(Self::NAME)?;
        let rows = entity.find_many(db, filter, options).await?;
        Ok(rows
            .into_iter()
            .map(|row| Record::loaded(entity.clone(), row))
            .collect())
    }

    async fn all(db: &Db) -> Result<Vec<Record<Self>>> {
        Self::filter(db, Attributes::new()).await
    }

    /// Builds a record and saves it.
    ///
    /// When saving fails in collect mode the unsaved record is returned with
    /// its error bag populated.
    async fn create(db: &Db, attributes: Attributes) -> Result<Record<Self>> {
        Self::create_with(db, attributes, SaveOptions::default()).await
    }

    async fn create_with(
        db: &Db,
        attributes: Attributes,
        options: SaveOptions,
    ) -> Result<Record<Self>> {
        let mut record = Self::build(db, attributes)?;
        record.save(db, options).await?;
        Ok(record)
    }
}

/// Collects the related types a model declares it depends on.
#[derive(Debug, Default, Clone)]
pub struct RequiredModels {
    names: Vec<&'static str>,
}

impl RequiredModels {
    pub fn require<M: Model>(&mut self) -> &mut Self {
        if !self.names.contains(&M::NAME) {
            self.names.push(M::NAME);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|required| *required == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    pub(crate) fn of<M: Model>() -> RequiredModels {
        let mut models = RequiredModels::default();
        M::required_models(&mut models);
        models
    }
}
