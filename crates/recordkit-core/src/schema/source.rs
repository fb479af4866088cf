use super::Datamodel;
use crate::{Error, Result};

use std::path::PathBuf;

/// Environment variable naming the datamodel JSON file used by
/// [`SchemaSource::from_env`].
pub const DATAMODEL_ENV: &str = "RECORDKIT_DATAMODEL";

/// Where the datamodel description comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// A datamodel JSON file, read when the datamodel is first needed.
    File(PathBuf),

    /// Datamodel JSON held in memory.
    Json(String),

    /// An already-parsed datamodel.
    Datamodel(Datamodel),
}

impl SchemaSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn json(json: impl Into<String>) -> Self {
        Self::Json(json.into())
    }

    /// Reads the datamodel path from the `RECORDKIT_DATAMODEL` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(DATAMODEL_ENV) {
            Some(path) => Ok(Self::File(path.into())),
            None => Err(Error::invalid_schema(format!(
                "no schema source configured and `{DATAMODEL_ENV}` is not set"
            ))),
        }
    }

    pub async fn load(&self) -> Result<Datamodel> {
        match self {
            Self::File(path) => {
                log::debug!("loading datamodel; path={}", path.display());
                let json = tokio::fs::read_to_string(path).await.map_err(|err| {
                    Error::from(err).context(crate::err!(
                        "failed to read datamodel; path={}",
                        path.display()
                    ))
                })?;
                Datamodel::from_json(&json)
            }
            Self::Json(json) => Datamodel::from_json(json),
            Self::Datamodel(datamodel) => Ok(datamodel.clone()),
        }
    }
}

impl From<Datamodel> for SchemaSource {
    fn from(value: Datamodel) -> Self {
        Self::Datamodel(value)
    }
}
