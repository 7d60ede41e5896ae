use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_BRONZE_PATH, DEFAULT_GOLD_PATH, DEFAULT_SILVER_PATH, DEFAULT_TAP_URL,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::error::{LayerError, Result};
use crate::pipeline::processing::{GoldPolicy, SchemaMapping};

/// Catalog shipped with the crate, used when no config file is given.
const BUILTIN_CATALOG: &str = include_str!("../catalogs/lamost_mrs.toml");

/// Everything one catalog needs to go from bronze to gold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub paths: LayerPaths,
    #[serde(default)]
    pub silver: SchemaMapping,
    #[serde(default)]
    pub gold: GoldPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Short name, used in logs
    pub name: String,
    /// Registry identifier, e.g. `J/ApJS/266/14`
    pub registry_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub tap_url: String,
    pub timeout_seconds: u64,
    /// Fetch this table instead of the first one the registry lists
    pub table: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tap_url: DEFAULT_TAP_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            table: None,
        }
    }
}

/// One file per layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPaths {
    pub bronze: PathBuf,
    pub silver: PathBuf,
    pub gold: PathBuf,
}

impl Default for LayerPaths {
    fn default() -> Self {
        Self {
            bronze: PathBuf::from(DEFAULT_BRONZE_PATH),
            silver: PathBuf::from(DEFAULT_SILVER_PATH),
            gold: PathBuf::from(DEFAULT_GOLD_PATH),
        }
    }
}

impl LayerPaths {
    /// Anchor relative paths at `root`; absolute paths are left alone.
    pub fn resolved_against(&self, root: &Path) -> Self {
        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        Self {
            bronze: anchor(&self.bronze),
            silver: anchor(&self.silver),
            gold: anchor(&self.gold),
        }
    }
}

impl Config {
    /// Load a catalog config. Relative layer paths are taken relative to the
    /// directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LayerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config = Self::from_toml(&content)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        config.paths = config.paths.resolved_against(root);
        Ok(config)
    }

    /// The catalog compiled into the binary, paths relative to `data_root`.
    pub fn builtin(data_root: &Path) -> Result<Self> {
        let mut config = Self::from_toml(BUILTIN_CATALOG)?;
        config.paths = config.paths.resolved_against(data_root);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.registry_id.trim().is_empty() {
            return Err(LayerError::Config("catalog.registry_id is empty".into()));
        }

        let paths = [&self.paths.bronze, &self.paths.silver, &self.paths.gold];
        let distinct: HashSet<_> = paths.iter().collect();
        if distinct.len() != paths.len() {
            return Err(LayerError::Config(
                "bronze, silver and gold paths must be distinct".into(),
            ));
        }

        if let Some(keep) = &self.silver.keep {
            if keep.is_empty() {
                return Err(LayerError::Config("silver.keep is empty".into()));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = keep.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(LayerError::Config(format!(
                    "silver.keep lists '{}' twice",
                    dup
                )));
            }
        }

        self.gold.validate()
    }
}
