//! Gold layer: derived date, spectral class columns and the composite key.

pub mod spectral;
pub mod timestamp;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{
    CLASS_COLUMN, DEFAULT_CLASSIFICATION_COLUMN, DEFAULT_DATE_COLUMN, DEFAULT_IDENTIFIER_SOURCE,
    DEFAULT_KEY_SEPARATOR, IDENTIFIER_COLUMN, LUMINOSITY_CLASS_COLUMN, SUBCLASS_COLUMN,
};
use crate::error::{LayerError, Result};
use crate::pipeline::table::Table;

pub use spectral::{first_letter_class, split_spectral_class, SpectralClass};
pub use timestamp::{epoch_to_date, parse_epoch_seconds};

/// How the `identifier` column is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyPolicy {
    /// `YYYYMMDD` of the epoch date, separator, raw identifier.
    DatePrefixed {
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// Raw identifier followed by the raw date text, nothing in between.
    RecordConcat,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        KeyPolicy::DatePrefixed {
            separator: default_separator(),
        }
    }
}

fn default_separator() -> String {
    DEFAULT_KEY_SEPARATOR.to_string()
}

/// How the classification string becomes class columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassSplit {
    /// `class`, `subclass` and `luminosity_class` from the spectral pattern.
    #[default]
    Pattern,
    /// `class` only, the first character of the code.
    FirstLetter,
}

/// What to do with a date cell that is not a usable epoch value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFailure {
    /// Abort the stage with `InvalidTimestamp`.
    #[default]
    Fail,
    /// Leave the date (and the date part of the key) empty and keep going.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldPolicy {
    pub date_column: String,
    pub identifier_column: String,
    pub classification_column: String,
    pub key: KeyPolicy,
    pub class_split: ClassSplit,
    pub on_invalid_timestamp: TimestampFailure,
}

impl Default for GoldPolicy {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            identifier_column: DEFAULT_IDENTIFIER_SOURCE.to_string(),
            classification_column: DEFAULT_CLASSIFICATION_COLUMN.to_string(),
            key: KeyPolicy::default(),
            class_split: ClassSplit::default(),
            on_invalid_timestamp: TimestampFailure::default(),
        }
    }
}

impl GoldPolicy {
    /// Derived columns placed at the front of the gold table.
    pub fn derived_columns(&self) -> Vec<&'static str> {
        match self.class_split {
            ClassSplit::Pattern => vec![
                IDENTIFIER_COLUMN,
                CLASS_COLUMN,
                SUBCLASS_COLUMN,
                LUMINOSITY_CLASS_COLUMN,
            ],
            ClassSplit::FirstLetter => vec![IDENTIFIER_COLUMN, CLASS_COLUMN],
        }
    }

    /// Raw source columns moved to the end of the gold table.
    pub fn trailing_columns(&self) -> Vec<&str> {
        let mut tail: Vec<&str> = Vec::with_capacity(3);
        for c in [
            self.classification_column.as_str(),
            self.identifier_column.as_str(),
            self.date_column.as_str(),
        ] {
            if !tail.contains(&c) {
                tail.push(c);
            }
        }
        tail
    }

    /// Source columns must not share a name with a derived column, or the
    /// derived values would overwrite the raw ones.
    pub fn validate(&self) -> Result<()> {
        let derived = self.derived_columns();
        for (field, value) in [
            ("date_column", &self.date_column),
            ("identifier_column", &self.identifier_column),
            ("classification_column", &self.classification_column),
        ] {
            if value.trim().is_empty() {
                return Err(LayerError::Config(format!("gold.{} is empty", field)));
            }
            if derived.contains(&value.as_str()) {
                return Err(LayerError::Config(format!(
                    "gold.{} '{}' collides with a derived column",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GoldOutput {
    pub table: Table,
    /// Rows whose date was replaced by an empty string.
    pub invalid_timestamp_rows: Vec<usize>,
}

/// Derive the gold table from a silver table.
pub fn gold_transform(silver: &Table, policy: &GoldPolicy) -> Result<GoldOutput> {
    policy.validate()?;
    let classification = silver.column_values(&policy.classification_column)?;
    let raw_ids = silver.column_values(&policy.identifier_column)?;
    let raw_dates = silver.column_values(&policy.date_column)?;

    let mut invalid_timestamp_rows = Vec::new();
    let mut table = silver.clone();

    let identifiers: Vec<String> = match &policy.key {
        KeyPolicy::DatePrefixed { separator } => {
            let mut dates = Vec::with_capacity(raw_dates.len());
            let mut keys = Vec::with_capacity(raw_dates.len());
            for (row, (raw, id)) in raw_dates.iter().zip(&raw_ids).enumerate() {
                match epoch_to_date(raw) {
                    Some(date) => {
                        dates.push(date.format("%Y-%m-%d").to_string());
                        keys.push(format!("{}{}{}", date.format("%Y%m%d"), separator, id));
                    }
                    None => match policy.on_invalid_timestamp {
                        TimestampFailure::Fail => {
                            return Err(LayerError::InvalidTimestamp {
                                row,
                                value: raw.to_string(),
                            });
                        }
                        TimestampFailure::Empty => {
                            invalid_timestamp_rows.push(row);
                            dates.push(String::new());
                            keys.push(format!("{}{}", separator, id));
                        }
                    },
                }
            }
            table.set_column(&policy.date_column, dates)?;
            keys
        }
        KeyPolicy::RecordConcat => raw_ids
            .iter()
            .zip(&raw_dates)
            .map(|(id, date)| format!("{}{}", id, date))
            .collect(),
    };
    table.set_column(IDENTIFIER_COLUMN, identifiers)?;

    match policy.class_split {
        ClassSplit::Pattern => {
            let split: Vec<SpectralClass> = classification
                .iter()
                .map(|code| split_spectral_class(code))
                .collect();
            let unmatched = split.iter().filter(|s| s.class.is_empty()).count();
            if unmatched > 0 {
                debug!("{} classification codes did not match the spectral pattern", unmatched);
            }
            let mut classes = Vec::with_capacity(split.len());
            let mut subclasses = Vec::with_capacity(split.len());
            let mut luminosity = Vec::with_capacity(split.len());
            for s in split {
                classes.push(s.class);
                subclasses.push(s.subclass);
                luminosity.push(s.luminosity_class);
            }
            table.set_column(CLASS_COLUMN, classes)?;
            table.set_column(SUBCLASS_COLUMN, subclasses)?;
            table.set_column(LUMINOSITY_CLASS_COLUMN, luminosity)?;
        }
        ClassSplit::FirstLetter => {
            let classes = classification.iter().map(|c| first_letter_class(c)).collect();
            table.set_column(CLASS_COLUMN, classes)?;
        }
    }

    if !invalid_timestamp_rows.is_empty() {
        warn!(
            "{} rows had unusable values in '{}', left empty",
            invalid_timestamp_rows.len(),
            policy.date_column
        );
    }

    let order = gold_column_order(table.columns(), policy);
    Ok(GoldOutput {
        table: table.select(&order)?,
        invalid_timestamp_rows,
    })
}

/// Derived columns, then the remaining columns in prior order, then the raw sources.
fn gold_column_order(columns: &[String], policy: &GoldPolicy) -> Vec<String> {
    let head: Vec<&str> = policy.derived_columns();
    let tail: Vec<&str> = policy.trailing_columns();
    let middle = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !head.contains(c) && !tail.contains(c));

    head.iter()
        .copied()
        .chain(middle)
        .chain(tail.iter().copied())
        .map(str::to_string)
        .collect()
}
