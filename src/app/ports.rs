use crate::error::Result;
use crate::pipeline::table::Table;

/// Remote registry holding the raw catalog tables (bronze side).
pub trait CatalogRegistry {
    /// Table names published under a catalog identifier, in registry order.
    fn list_tables(&self, catalog_id: &str) -> Result<Vec<String>>;

    /// Every row and column of one table.
    fn select_all(&self, table_name: &str) -> Result<Table>;
}
