use crate::{stmt::Attributes, Error, Result};

/// What a driver returns for an [`Operation`](super::Operation).
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `FindMany`
    Rows(Vec<Attributes>),

    /// `FindFirst`, `FindUnique`, `Create`, `Update` and `Delete`
    Row(Option<Attributes>),
}

impl Response {
    pub fn rows(rows: Vec<Attributes>) -> Self {
        Self::Rows(rows)
    }

    pub fn row(row: Attributes) -> Self {
        Self::Row(Some(row))
    }

    pub fn empty() -> Self {
        Self::Row(None)
    }

    pub fn into_rows(self) -> Result<Vec<Attributes>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Row(_) => Err(Error::from_args(format_args!(
                "expected rows from driver, got a single row"
            ))),
        }
    }

    pub fn into_row(self) -> Result<Option<Attributes>> {
        match self {
            Self::Row(row) => Ok(row),
            Self::Rows(_) => Err(Error::from_args(format_args!(
                "expected a single row from driver, got rows"
            ))),
        }
    }
}
