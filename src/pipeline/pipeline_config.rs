use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Layer;
use crate::error::{LayerError, Result};

/// Which layers one invocation builds, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub steps: Vec<Layer>,
}

impl PipelineConfig {
    /// Fetch from the registry and refine all the way to gold
    pub fn full() -> Self {
        Self {
            name: "full".to_string(),
            description: "Fetch bronze from the registry, then build silver and gold".to_string(),
            steps: vec![Layer::Bronze, Layer::Silver, Layer::Gold],
        }
    }

    /// Rebuild silver and gold from the bronze file already on disk
    pub fn refine_only() -> Self {
        Self {
            name: "refine".to_string(),
            description: "Build silver and gold from an existing bronze file".to_string(),
            steps: vec![Layer::Silver, Layer::Gold],
        }
    }

    /// Run exactly one layer
    pub fn single(layer: Layer) -> Self {
        Self {
            name: layer.as_str().to_string(),
            description: format!("Build the {} layer only", layer),
            steps: vec![layer],
        }
    }

    /// A scheduled dependency must run before the layer that reads it.
    /// Unscheduled dependencies are expected to be on disk already.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(LayerError::Pipeline(
                "Pipeline must have at least one step".to_string(),
            ));
        }

        let scheduled: HashSet<Layer> = self.steps.iter().copied().collect();
        if scheduled.len() != self.steps.len() {
            return Err(LayerError::Pipeline(format!(
                "Pipeline '{}' schedules a layer more than once",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            for dep in step.dependencies() {
                if scheduled.contains(&dep) && !seen.contains(&dep) {
                    return Err(LayerError::Pipeline(format!(
                        "Step '{}' depends on '{}' which appears later in the pipeline",
                        step, dep
                    )));
                }
            }
            seen.insert(*step);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        PipelineConfig::full().validate().unwrap();
        PipelineConfig::refine_only().validate().unwrap();
        for layer in [Layer::Bronze, Layer::Silver, Layer::Gold] {
            PipelineConfig::single(layer).validate().unwrap();
        }
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let config = PipelineConfig {
            name: "backwards".into(),
            description: String::new(),
            steps: vec![Layer::Gold, Layer::Silver],
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'gold' depends on 'silver'"));
    }

    #[test]
    fn test_empty_and_repeated_are_rejected() {
        let mut config = PipelineConfig::single(Layer::Silver);
        config.steps.clear();
        assert!(config.validate().is_err());

        config.steps = vec![Layer::Silver, Layer::Silver];
        assert!(config.validate().is_err());
    }
}
