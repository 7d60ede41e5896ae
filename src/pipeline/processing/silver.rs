use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayerError, Result};
use crate::pipeline::table::Table;

/// Per-catalog schema mapping from raw registry columns to the silver schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMapping {
    /// Source column name -> standardized name. Every key must exist in bronze.
    #[serde(default)]
    pub rename: HashMap<String, String>,
    /// Post-rename columns to keep, in output order. `None` keeps everything.
    #[serde(default)]
    pub keep: Option<Vec<String>>,
}

impl SchemaMapping {
    pub fn new<I, K, V>(rename: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rename: rename
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            keep: None,
        }
    }

    pub fn with_keep<S: Into<String>>(mut self, keep: impl IntoIterator<Item = S>) -> Self {
        self.keep = Some(keep.into_iter().map(Into::into).collect());
        self
    }

    /// The silver name for a bronze column.
    pub fn target_name<'a>(&'a self, source: &'a str) -> &'a str {
        self.rename.get(source).map(String::as_str).unwrap_or(source)
    }

    /// Names the silver table will carry for the given bronze header.
    pub fn output_columns(&self, bronze_columns: &[String]) -> Vec<String> {
        match &self.keep {
            Some(keep) => keep.clone(),
            None => bronze_columns
                .iter()
                .map(|c| self.target_name(c).to_string())
                .collect(),
        }
    }
}

/// Rename bronze headers onto the silver schema and apply the keep-list.
pub fn silver_transform(bronze: &Table, mapping: &SchemaMapping) -> Result<Table> {
    // Sorted so the reported column is stable across runs
    let mut sources: Vec<&String> = mapping.rename.keys().collect();
    sources.sort();
    for source in sources {
        if bronze.column_index(source).is_none() {
            return Err(LayerError::MissingColumn(source.clone()));
        }
    }

    let renamed = bronze.with_renamed_columns(|c| mapping.target_name(c).to_string())?;
    debug!(
        "Renamed {} of {} columns",
        mapping.rename.len(),
        bronze.columns().len()
    );

    match &mapping.keep {
        Some(keep) => renamed.select(keep),
        None => Ok(renamed),
    }
}
