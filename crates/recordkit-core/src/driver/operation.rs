use crate::stmt::Attributes;

/// A single storage call issued to the query client.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    FindMany(FindMany),
    FindFirst(FindFirst),
    FindUnique(FindUnique),
    Create(Create),
    Update(Update),
    Delete(Delete),
}

/// Returns every row matching `filter`, in storage order unless `options`
/// asks for an ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct FindMany {
    pub model: String,
    pub filter: Attributes,
    pub options: QueryOptions,
}

/// Returns the first row matching `filter`, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FindFirst {
    pub model: String,
    pub filter: Attributes,
}

/// Returns the row identified by a unique `key`, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FindUnique {
    pub model: String,
    pub key: Attributes,
}

/// Inserts a row, returning it with storage-computed fields filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub model: String,
    pub data: Attributes,
}

/// Updates the row identified by `key`, returning the updated row.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub model: String,
    pub key: Attributes,
    pub data: Attributes,
}

/// Deletes the row identified by `key`, returning the deleted row.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub model: String,
    pub key: Attributes,
}

/// Options forwarded untouched with `FindMany`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub order_by: Vec<OrderBy>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Operation {
    /// Storage accessor of the model the operation targets.
    pub fn model(&self) -> &str {
        match self {
            Self::FindMany(op) => &op.model,
            Self::FindFirst(op) => &op.model,
            Self::FindUnique(op) => &op.model,
            Self::Create(op) => &op.model,
            Self::Update(op) => &op.model,
            Self::Delete(op) => &op.model,
        }
    }

    /// Client-side operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FindMany(_) => "findMany",
            Self::FindFirst(_) => "findFirst",
            Self::FindUnique(_) => "findUnique",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

impl QueryOptions {
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }
}

impl From<FindMany> for Operation {
    fn from(value: FindMany) -> Self {
        Self::FindMany(value)
    }
}

impl From<FindFirst> for Operation {
    fn from(value: FindFirst) -> Self {
        Self::FindFirst(value)
    }
}

impl From<FindUnique> for Operation {
    fn from(value: FindUnique) -> Self {
        Self::FindUnique(value)
    }
}

impl From<Create> for Operation {
    fn from(value: Create) -> Self {
        Self::Create(value)
    }
}

impl From<Update> for Operation {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}

impl From<Delete> for Operation {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
