use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::app::ports::CatalogRegistry;
use crate::error::{LayerError, Result};
use crate::observability::metrics;
use crate::pipeline::table::Table;

/// Blocking client for an IVOA TAP service (VizieR by default).
///
/// Queries go to the synchronous endpoint and ask for CSV back, which is
/// parsed straight into a [`Table`].
pub struct TapRegistry {
    client: Client,
    tap_url: String,
}

impl TapRegistry {
    pub fn new(tap_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("stellar-layers/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            tap_url: tap_url.trim_end_matches('/').to_string(),
        })
    }

    fn sync_url(&self) -> String {
        format!("{}/sync", self.tap_url)
    }

    /// Run one ADQL query and return the CSV result as a table.
    pub fn query(&self, adql: &str) -> Result<Table> {
        debug!("TAP query: {}", adql);
        let started = Instant::now();
        let params = [
            ("REQUEST", "doQuery"),
            ("LANG", "ADQL"),
            ("FORMAT", "csv"),
            ("QUERY", adql),
        ];
        let resp = self
            .client
            .post(self.sync_url())
            .form(&params)
            .send()
            .map_err(|e| {
                metrics::registry::request_error();
                LayerError::Http(e)
            })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = resp.bytes()?;

        if !status.is_success() {
            metrics::registry::request_error();
            let head: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            return Err(LayerError::Registry {
                message: format!("TAP service returned {}: {}", status, head.trim()),
            });
        }
        // VOTable errors come back with 200 and an XML body
        if content_type.contains("xml") {
            metrics::registry::request_error();
            return Err(LayerError::Registry {
                message: format!("TAP service returned {} instead of CSV", content_type),
            });
        }

        metrics::registry::request_success(body.len(), started.elapsed());
        Table::from_csv_reader(body.as_ref())
    }
}

/// Escape a value for use inside an ADQL string literal.
fn adql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quote a table name as an ADQL delimited identifier.
fn adql_identifier(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Ordered so "first table" means the same table on every run.
pub(crate) fn table_list_query(catalog_id: &str) -> String {
    format!(
        "SELECT table_name FROM TAP_SCHEMA.tables WHERE table_name LIKE '{}/%' \
         ORDER BY table_name",
        adql_string(catalog_id)
    )
}

pub(crate) fn select_all_query(table_name: &str) -> String {
    format!("SELECT * FROM {}", adql_identifier(table_name))
}

impl CatalogRegistry for TapRegistry {
    fn list_tables(&self, catalog_id: &str) -> Result<Vec<String>> {
        let table = self.query(&table_list_query(catalog_id))?;
        let names: Vec<String> = table
            .column_values("table_name")?
            .into_iter()
            .map(str::to_string)
            .collect();
        info!("Catalog {} publishes {} tables", catalog_id, names.len());
        Ok(names)
    }

    fn select_all(&self, table_name: &str) -> Result<Table> {
        let table = self.query(&select_all_query(table_name))?;
        info!(
            "Fetched {} rows x {} columns from {}",
            table.row_count(),
            table.columns().len(),
            table_name
        );
        Ok(table)
    }
}
