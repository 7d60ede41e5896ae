use tracing::info;

use super::steps::{BronzeStep, GoldStep, SilverStep, Stage};
use super::{Layer, PipelineConfig, StageReport};
use crate::app::ports::CatalogRegistry;
use crate::config::Config;
use crate::error::Result;

/// Runs the layer stages of one catalog in order.
pub struct LayerPipeline {
    config: Config,
    registry: Box<dyn CatalogRegistry>,
}

impl LayerPipeline {
    pub fn new(config: Config, registry: Box<dyn CatalogRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The stage that produces `layer`, wired to this catalog's paths.
    pub fn stage(&self, layer: Layer) -> Box<dyn Stage + '_> {
        let paths = &self.config.paths;
        match layer {
            Layer::Bronze => Box::new(BronzeStep::new(
                self.registry.as_ref(),
                &self.config.catalog.registry_id,
                self.config.registry.table.as_deref(),
                &paths.bronze,
            )),
            Layer::Silver => Box::new(SilverStep::new(
                &self.config.silver,
                &paths.bronze,
                &paths.silver,
            )),
            Layer::Gold => Box::new(GoldStep::new(&self.config.gold, &paths.silver, &paths.gold)),
        }
    }

    /// Run every step of `plan`, stopping at the first failure.
    pub fn run(&self, plan: &PipelineConfig) -> Result<Vec<StageReport>> {
        plan.validate()?;
        info!(
            "Running '{}' for catalog {} ({})",
            plan.name, self.config.catalog.name, self.config.catalog.registry_id
        );

        let mut reports = Vec::with_capacity(plan.steps.len());
        for layer in &plan.steps {
            let report = self.stage(*layer).execute()?;
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;
    use crate::pipeline::Table;
    use std::fs;
    use tempfile::tempdir;

    struct Unreachable;

    impl CatalogRegistry for Unreachable {
        fn list_tables(&self, _catalog_id: &str) -> Result<Vec<String>> {
            Err(LayerError::Registry {
                message: "offline".into(),
            })
        }

        fn select_all(&self, _table_name: &str) -> Result<Table> {
            Err(LayerError::Registry {
                message: "offline".into(),
            })
        }
    }

    fn config(root: &std::path::Path) -> Config {
        let mut config = Config::from_toml(
            r#"
            [catalog]
            name = "star"
            registry_id = "J/test"

            [silver]
            rename = { obs_time = "date", lamost_id = "lamost", sp = "full_class" }
            "#,
        )
        .unwrap();
        config.paths = config.paths.resolved_against(root);
        config
    }

    #[test]
    fn test_refine_runs_silver_then_gold() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(config.paths.bronze.parent().unwrap()).unwrap();
        fs::write(
            &config.paths.bronze,
            "lamost_id,obs_time,sp,snr\nA1,1609459200,K5III,40.1\n",
        )
        .unwrap();

        let pipeline = LayerPipeline::new(config, Box::new(Unreachable));
        let reports = pipeline.run(&PipelineConfig::refine_only()).unwrap();
        assert_eq!(
            reports.iter().map(|r| r.stage).collect::<Vec<_>>(),
            vec![Layer::Silver, Layer::Gold]
        );
        assert_eq!(
            fs::read_to_string(&pipeline.config().paths.gold).unwrap(),
            "identifier,class,subclass,luminosity_class,snr,full_class,lamost,date\n\
             20210101_A1,K,K5,III,40.1,K5III,A1,2021-01-01\n"
        );
    }

    #[test]
    fn test_failure_stops_later_stages() {
        let dir = tempdir().unwrap();
        let pipeline = LayerPipeline::new(config(dir.path()), Box::new(Unreachable));
        let err = pipeline.run(&PipelineConfig::full()).unwrap_err();
        assert!(matches!(err, LayerError::Registry { .. }));
        assert!(!pipeline.config().paths.silver.exists());
        assert!(!pipeline.config().paths.gold.exists());
    }
}
