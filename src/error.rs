use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::data::dataset::DatasetError;
use crate::data::reference::CatalogueError;
use crate::wiki::WikiError;

/// Top-level error of a generation run. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Wiki(#[from] WikiError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write report {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
