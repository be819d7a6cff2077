//! Run settings: built-in defaults, optionally overridden by `outfitter.yaml`
//! (or the file named in `OUTFITTER_CONFIG`) and then by environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::assets::DEFAULT_OUTPUT_ROOT;
use crate::data::dataset::DEFAULT_DATASET_PATH;
use crate::data::reference::DEFAULT_OUTFITS_XML_PATH;
use crate::outfit::{DEFAULT_OUTFITS_JSON_PATH, DEFAULT_WIKI_BASE_URL};
use crate::wiki::{DEFAULT_API_URL, DEFAULT_USER_AGENT};

pub const DEFAULT_CONFIG_PATH: &str = "outfitter.yaml";
pub const DEFAULT_OUTFITTER_PAGE: &str = "NPC Outfitter Codes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Local TibiaWiki SQLite dataset.
    pub dataset_path: PathBuf,
    /// Reference outfit catalogue.
    pub outfits_xml_path: PathBuf,
    /// Appearance map written by the outfit run and read by the NPC run.
    pub outfits_json_path: PathBuf,
    /// Root folder for generated NPC files.
    pub output_dir: PathBuf,
    pub outfitter_page: String,
    pub api_url: String,
    /// Prefix for root-relative outfiter links.
    pub wiki_base_url: String,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            outfits_xml_path: PathBuf::from(DEFAULT_OUTFITS_XML_PATH),
            outfits_json_path: PathBuf::from(DEFAULT_OUTFITS_JSON_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            outfitter_page: DEFAULT_OUTFITTER_PAGE.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            wiki_base_url: DEFAULT_WIKI_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file if it exists, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            env::var("OUTFITTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let settings = Self::from_yaml_file(&config_path)?.unwrap_or_default();
        Ok(settings.with_env_overrides(|key| env::var(key).ok()))
    }

    /// `Ok(None)` when the file does not exist. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(Some(settings))
    }

    /// Apply `OUTFITTER_*` overrides read through `lookup`. Empty values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(value) = get("OUTFITTER_DB") {
            self.dataset_path = PathBuf::from(value);
        }
        if let Some(value) = get("OUTFITTER_OUTFITS_XML") {
            self.outfits_xml_path = PathBuf::from(value);
        }
        if let Some(value) = get("OUTFITTER_OUTPUT_JSON") {
            self.outfits_json_path = PathBuf::from(value);
        }
        if let Some(value) = get("OUTFITTER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(value);
        }
        if let Some(value) = get("OUTFITTER_API_URL") {
            self.api_url = value;
        }
        self
    }
}
