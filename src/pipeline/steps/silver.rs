use std::path::Path;

use tracing::info;

use super::{instrumented, Stage};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::{silver_transform, SchemaMapping};
use crate::pipeline::{storage, Layer, StageReport};

/// Bronze file -> silver file through the catalog's schema mapping
pub struct SilverStep<'a> {
    mapping: &'a SchemaMapping,
    input: &'a Path,
    output: &'a Path,
}

impl<'a> SilverStep<'a> {
    pub fn new(mapping: &'a SchemaMapping, input: &'a Path, output: &'a Path) -> Self {
        Self {
            mapping,
            input,
            output,
        }
    }
}

impl Stage for SilverStep<'_> {
    fn execute(&self) -> Result<StageReport> {
        instrumented(Layer::Silver, || {
            let bronze = storage::read_table(self.input)?;
            metrics::stage::rows_read(Layer::Silver.as_str(), bronze.row_count());
            info!(
                "Loaded {} rows x {} columns from {}",
                bronze.row_count(),
                bronze.columns().len(),
                self.input.display()
            );

            let silver = silver_transform(&bronze, self.mapping)?;
            let sha256 = storage::write_table(self.output, &silver)?;
            metrics::stage::rows_written(Layer::Silver.as_str(), silver.row_count());

            Ok(StageReport {
                stage: Layer::Silver,
                rows_in: bronze.row_count(),
                rows_out: silver.row_count(),
                columns: silver.columns().to_vec(),
                output: self.output.to_path_buf(),
                sha256,
                warnings: Vec::new(),
            })
        })
    }

    fn layer(&self) -> Layer {
        Layer::Silver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_renames_and_writes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("starB.csv");
        let output = dir.path().join("silver").join("starS.csv");
        fs::write(&input, "recno,subClass,Teff\n1,G2V,5778\n2,M,\n").unwrap();

        let mapping = SchemaMapping::new([("subClass", "full_class"), ("Teff", "effective_temperature")]);
        let report = SilverStep::new(&mapping, &input, &output).execute().unwrap();

        assert_eq!(report.rows_in, 2);
        assert_eq!(report.rows_out, 2);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "recno,full_class,effective_temperature\n1,G2V,5778\n2,M,\n"
        );
    }

    #[test]
    fn test_failure_leaves_previous_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("starB.csv");
        let output = dir.path().join("starS.csv");
        fs::write(&input, "recno\n1\n").unwrap();
        fs::write(&output, "previous\n").unwrap();

        let mapping = SchemaMapping::new([("subClass", "full_class")]);
        let err = SilverStep::new(&mapping, &input, &output).execute().unwrap_err();
        assert!(matches!(err, LayerError::MissingColumn(_)));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
    }
}
