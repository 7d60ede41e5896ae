use std::path::Path;

use tracing::info;

use super::{instrumented, Stage};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::{gold_transform, GoldPolicy};
use crate::pipeline::{storage, Layer, StageReport};

/// Silver file -> gold file with derived identifier and class columns
pub struct GoldStep<'a> {
    policy: &'a GoldPolicy,
    input: &'a Path,
    output: &'a Path,
}

impl<'a> GoldStep<'a> {
    pub fn new(policy: &'a GoldPolicy, input: &'a Path, output: &'a Path) -> Self {
        Self {
            policy,
            input,
            output,
        }
    }
}

impl Stage for GoldStep<'_> {
    fn execute(&self) -> Result<StageReport> {
        instrumented(Layer::Gold, || {
            let silver = storage::read_table(self.input)?;
            metrics::stage::rows_read(Layer::Gold.as_str(), silver.row_count());
            info!(
                "Loaded {} rows from {} (key {:?}, class split {:?})",
                silver.row_count(),
                self.input.display(),
                self.policy.key,
                self.policy.class_split
            );

            let gold = gold_transform(&silver, self.policy)?;
            let mut warnings = Vec::new();
            if let Some(first) = gold.invalid_timestamp_rows.first() {
                metrics::stage::timestamps_emptied(gold.invalid_timestamp_rows.len());
                warnings.push(format!(
                    "{} rows had unusable '{}' values (first at row {}); date left empty",
                    gold.invalid_timestamp_rows.len(),
                    self.policy.date_column,
                    first
                ));
            }

            let sha256 = storage::write_table(self.output, &gold.table)?;
            metrics::stage::rows_written(Layer::Gold.as_str(), gold.table.row_count());

            Ok(StageReport {
                stage: Layer::Gold,
                rows_in: silver.row_count(),
                rows_out: gold.table.row_count(),
                columns: gold.table.columns().to_vec(),
                output: self.output.to_path_buf(),
                sha256,
                warnings,
            })
        })
    }

    fn layer(&self) -> Layer {
        Layer::Gold
    }
}
