//! User configuration at ~/.config/icalkit/config.toml
//!
//! Every field is optional. `ICALKIT_*` environment variables override the
//! file, and command-line flags override both.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{IcalKitError, IcalKitResult};
use crate::merger::{DuplicateHandling, MergeOptions};
use crate::splitter::{DEFAULT_CHUNK_SIZE, SortOrder, SplitOptions};

static DEFAULT_OUTPUT_DIR: &str = ".";

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcalKitConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub sort_by: SortOrder,

    #[serde(default)]
    pub duplicates: DuplicateHandling,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name_pattern: Option<String>,

    /// Where `split` writes chunks, `~` is expanded
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// tracing filter directive, e.g. "info" or "icalkit_core=debug"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for IcalKitConfig {
    fn default() -> Self {
        IcalKitConfig {
            chunk_size: default_chunk_size(),
            sort_by: SortOrder::default(),
            duplicates: DuplicateHandling::default(),
            file_name_pattern: None,
            output_dir: default_output_dir(),
            log_level: None,
        }
    }
}

impl IcalKitConfig {
    pub fn config_path() -> IcalKitResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IcalKitError::Config("Could not determine config directory".into()))?
            .join("icalkit");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file is not an error.
    pub fn load() -> IcalKitResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> IcalKitResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("ICALKIT"))
            .build()
            .map_err(|e| IcalKitError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| IcalKitError::Config(e.to_string()))
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned())
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            chunk_size: self.chunk_size,
            sort_by: self.sort_by,
            file_name_pattern: self.file_name_pattern.clone(),
        }
    }

    pub fn merge_options(&self, calendar_name: Option<String>) -> MergeOptions {
        MergeOptions {
            duplicates: self.duplicates,
            calendar_name,
        }
    }

    pub fn to_toml(&self) -> IcalKitResult<String> {
        toml::to_string_pretty(self).map_err(|e| IcalKitError::Config(e.to_string()))
    }
}
