use std::fs;
use std::path::Path;

use anyhow::Result;
use stellar_layers::app::ports::CatalogRegistry;
use stellar_layers::{Config, Layer, LayerPipeline, PipelineConfig, Table};
use tempfile::tempdir;

/// Serves one fixed table, the way the TAP service would.
struct StaticRegistry {
    table: Table,
}

impl CatalogRegistry for StaticRegistry {
    fn list_tables(&self, catalog_id: &str) -> stellar_layers::Result<Vec<String>> {
        Ok(vec![format!("{}/table1", catalog_id)])
    }

    fn select_all(&self, _table_name: &str) -> stellar_layers::Result<Table> {
        Ok(self.table.clone())
    }
}

const BRONZE: &str = "\
recno,Obs_Date,subClass,Teff,[Fe/H],Gmag
1,2011-10-24,G2V,5778,0.01,12.3
2,2011-10-24,M,3100,,14.0
3,2012-01-05,K5III,4100,-0.25,
4,2012-01-05,sdB,,,15.2
";

const CATALOG: &str = r#"
[catalog]
name = "star"
registry_id = "J/ApJS/266/14"

[paths]
bronze = "data/bronze/starB.csv"
silver = "data/silver/starS.csv"
gold = "data/gold/starG.csv"

[silver.rename]
Obs_Date = "observation_date"
subClass = "full_class"
Teff = "effective_temperature"
"[Fe/H]" = "metallicity_fe_h"
Gmag = "gaia_g_magnitude"

[gold]
date_column = "observation_date"
identifier_column = "recno"
classification_column = "full_class"
class_split = "pattern"

[gold.key]
kind = "record_concat"
"#;

fn write_catalog(root: &Path) -> Result<Config> {
    let path = root.join("catalog.toml");
    fs::write(&path, CATALOG)?;
    Ok(Config::load(&path)?)
}

fn pipeline(config: Config) -> Result<LayerPipeline> {
    let table = Table::from_csv_reader(BRONZE.as_bytes())?;
    Ok(LayerPipeline::new(config, Box::new(StaticRegistry { table })))
}

#[test]
fn test_full_pipeline_from_registry_to_gold() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = pipeline(write_catalog(dir.path())?)?;

    let reports = pipeline.run(&PipelineConfig::full())?;
    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_eq!(report.rows_in, 4);
        assert_eq!(report.rows_out, 4);
    }

    let bronze = fs::read_to_string(&pipeline.config().paths.bronze)?;
    assert_eq!(bronze, BRONZE);

    let silver = fs::read_to_string(&pipeline.config().paths.silver)?;
    assert!(silver.starts_with(
        "recno,observation_date,full_class,effective_temperature,metallicity_fe_h,gaia_g_magnitude\n"
    ));

    let gold = fs::read_to_string(&pipeline.config().paths.gold)?;
    let lines: Vec<&str> = gold.lines().collect();
    assert_eq!(
        lines[0],
        "identifier,class,subclass,luminosity_class,effective_temperature,metallicity_fe_h,\
         gaia_g_magnitude,full_class,recno,observation_date"
    );
    assert_eq!(lines[1], "12011-10-24,G,G2,V,5778,0.01,12.3,G2V,1,2011-10-24");
    assert_eq!(lines[2], "22011-10-24,M,M,,3100,,14.0,M,2,2011-10-24");
    assert_eq!(lines[3], "32012-01-05,K,K5,III,4100,-0.25,,K5III,3,2012-01-05");
    // Letters only: the whole code is the class
    assert_eq!(lines[4], "42012-01-05,sdB,sdB,,,,15.2,sdB,4,2012-01-05");
    Ok(())
}

#[test]
fn test_keep_list_controls_silver_columns() -> Result<()> {
    let dir = tempdir()?;
    let catalog = CATALOG.replace(
        "[silver.rename]",
        "[silver]\nkeep = [\"full_class\", \"recno\", \"observation_date\"]\n\n[silver.rename]",
    );
    let path = dir.path().join("keep.toml");
    fs::write(&path, catalog)?;
    let pipeline = pipeline(Config::load(&path)?)?;

    let reports = pipeline.run(&PipelineConfig::full())?;
    let silver = &reports[1];
    assert_eq!(silver.stage, Layer::Silver);
    assert_eq!(silver.columns, vec!["full_class", "recno", "observation_date"]);

    let gold = &reports[2];
    assert_eq!(
        gold.columns,
        vec![
            "identifier",
            "class",
            "subclass",
            "luminosity_class",
            "full_class",
            "recno",
            "observation_date"
        ]
    );
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = pipeline(write_catalog(dir.path())?)?;

    let first = pipeline.run(&PipelineConfig::full())?;
    let gold_bytes = fs::read(&pipeline.config().paths.gold)?;
    let second = pipeline.run(&PipelineConfig::refine_only())?;

    assert_eq!(first[1].sha256, second[0].sha256);
    assert_eq!(first[2].sha256, second[1].sha256);
    assert_eq!(gold_bytes, fs::read(&pipeline.config().paths.gold)?);
    Ok(())
}

#[test]
fn test_missing_bronze_file_is_io_error() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = pipeline(write_catalog(dir.path())?)?;
    let err = pipeline.run(&PipelineConfig::single(Layer::Silver)).unwrap_err();
    assert!(matches!(err, stellar_layers::LayerError::Io(_)));
    assert!(!pipeline.config().paths.silver.exists());
    Ok(())
}

#[test]
fn test_eclipsing_binary_catalog_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("lamost_eb.toml");
    fs::write(
        &path,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/catalogs/lamost_eb.toml")),
    )?;
    let config = Config::load(&path)?;

    let mut columns: Vec<String> = config.silver.rename.keys().cloned().collect();
    columns.sort();
    let row = columns
        .iter()
        .map(|c| match c.as_str() {
            "LAMOST" => "J0001".to_string(),
            "Date" => "1609459200".to_string(),
            "subCl" => "K5III".to_string(),
            _ => "1".to_string(),
        })
        .collect();
    let table = Table::new(columns, vec![row])?;
    let pipeline = LayerPipeline::new(config, Box::new(StaticRegistry { table }));

    let reports = pipeline.run(&PipelineConfig::full())?;
    assert_eq!(reports[1].columns.len(), 19);

    let gold = &reports[2];
    assert_eq!(&gold.columns[..5], &["identifier", "class", "subclass", "luminosity_class", "recno"]);
    assert_eq!(&gold.columns[gold.columns.len() - 3..], &["full_class", "lamost", "date"]);
    assert_eq!(gold.columns.len(), 4 + 19);

    let written = fs::read_to_string(&pipeline.config().paths.gold)?;
    let line = written.lines().nth(1).unwrap_or_default();
    assert!(line.starts_with("20210101_J0001,K,K5,III,"));
    assert!(line.ends_with(",K5III,J0001,2021-01-01"));
    Ok(())
}
