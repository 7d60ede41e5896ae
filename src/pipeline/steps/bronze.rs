use std::path::Path;

use tracing::{debug, info};

use super::{instrumented, Stage};
use crate::app::ports::CatalogRegistry;
use crate::error::{LayerError, Result};
use crate::observability::metrics;
use crate::pipeline::{storage, Layer, StageReport};

/// Fetches the raw catalog table and stores it verbatim
pub struct BronzeStep<'a> {
    registry: &'a dyn CatalogRegistry,
    catalog_id: &'a str,
    table: Option<&'a str>,
    output: &'a Path,
}

impl<'a> BronzeStep<'a> {
    pub fn new(
        registry: &'a dyn CatalogRegistry,
        catalog_id: &'a str,
        table: Option<&'a str>,
        output: &'a Path,
    ) -> Self {
        Self {
            registry,
            catalog_id,
            table,
            output,
        }
    }

    /// The configured table, or the first one the registry lists.
    fn resolve_table(&self) -> Result<String> {
        if let Some(table) = self.table {
            debug!("Using configured table {}", table);
            return Ok(table.to_string());
        }
        let tables = self.registry.list_tables(self.catalog_id)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| LayerError::Registry {
                message: format!("Catalog {} has no tables", self.catalog_id),
            })
    }
}

impl Stage for BronzeStep<'_> {
    fn execute(&self) -> Result<StageReport> {
        instrumented(Layer::Bronze, || {
            let table_name = self.resolve_table()?;
            info!("Fetching {} from catalog {}", table_name, self.catalog_id);
            let table = self.registry.select_all(&table_name)?;
            metrics::stage::rows_read(Layer::Bronze.as_str(), table.row_count());

            let sha256 = storage::write_table(self.output, &table)?;
            metrics::stage::rows_written(Layer::Bronze.as_str(), table.row_count());

            Ok(StageReport {
                stage: Layer::Bronze,
                rows_in: table.row_count(),
                rows_out: table.row_count(),
                columns: table.columns().to_vec(),
                output: self.output.to_path_buf(),
                sha256,
                warnings: Vec::new(),
            })
        })
    }

    fn layer(&self) -> Layer {
        Layer::Bronze
    }
}
