use crate::{
    stmt::merge, Attributes, Db, FindOptions, Model, QueryOptions, Record, Result, SaveOptions,
    Value,
};

use std::{fmt, marker::PhantomData};

/// The records of `M` on the other side of a multi-valued relationship.
///
/// Every query is scoped by the relation's constraint and every created
/// record carries the relation's link. Both are merged over caller input, so
/// a caller can never detach a query or a new record from the parent.
pub struct RelationProxy<M> {
    /// Filter selecting the related rows, e.g. `{ userId: 1 }`
    constraint: Attributes,

    /// Payload attaching a new row to the parent. Equal to the constraint
    /// for one-to-many; a `connect` write for many-to-many.
    link: Attributes,

    _model: PhantomData<fn() -> M>,
}

impl<M: Model> RelationProxy<M> {
    pub(crate) fn new(constraint: Attributes, link: Attributes) -> RelationProxy<M> {
        RelationProxy {
            constraint,
            link,
            _model: PhantomData,
        }
    }

    pub fn constraint(&self) -> &Attributes {
        &self.constraint
    }

    pub fn link(&self) -> &Attributes {
        &self.link
    }

    fn scope(&self, filter: Attributes) -> Attributes {
        merge(&filter, &self.constraint)
    }

    pub async fn all(&self, db: &Db) -> Result<Vec<Record<M>>> {
        M::filter(db, self.constraint.clone()).await
    }

    #[doc(alias = "where")]
    pub async fn filter(&self, db: &Db, filter: Attributes) -> Result<Vec<Record<M>>> {
        M::filter(db, self.scope(filter)).await
    }

    pub async fn filter_with(
        &self,
        db: &Db,
        filter: Attributes,
        options: QueryOptions,
    ) -> Result<Vec<Record<M>>> {
        M::filter_with(db, self.scope(filter), options).await
    }

    /// Finds a related record by primary key. A record of `M` that exists
    /// but is not related fails with `RecordNotFound`.
    pub async fn find(&self, db: &Db, id: impl Into<Value>) -> Result<Record<M>> {
        M::find_with(db, id, FindOptions::filter(self.constraint.clone())).await
    }

    pub async fn find_by(&self, db: &Db, filter: Attributes) -> Result<Option<Record<M>>> {
        M::find_by(db, self.scope(filter)).await
    }

    pub async fn first(&self, db: &Db, filter: Attributes) -> Result<Option<Record<M>>> {
        M::first(db, self.scope(filter)).await
    }

    /// Creates a record linked to the parent.
    pub async fn create(&self, db: &Db, attributes: Attributes) -> Result<Record<M>> {
        M::create(db, merge(&attributes, &self.link)).await
    }

    pub async fn create_with(
        &self,
        db: &Db,
        attributes: Attributes,
        options: SaveOptions,
    ) -> Result<Record<M>> {
        M::create_with(db, merge(&attributes, &self.link), options).await
    }

    /// Builds an unsaved record linked to the parent.
    pub fn build(&self, db: &Db, attributes: Attributes) -> Result<Record<M>> {
        M::build(db, merge(&attributes, &self.link))
    }
}

impl<M> Clone for RelationProxy<M> {
    fn clone(&self) -> Self {
        RelationProxy {
            constraint: self.constraint.clone(),
            link: self.link.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for RelationProxy<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationProxy")
            .field("constraint", &self.constraint)
            .field("link", &self.link)
            .finish()
    }
}
