// Layer pipeline: table model, storage, transforms and the stages that run them

pub mod orchestrator;
pub mod pipeline_config;
pub mod processing;
pub mod steps;
pub mod storage;
pub mod table;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::{BRONZE_LAYER, GOLD_LAYER, SILVER_LAYER};

pub use orchestrator::LayerPipeline;
pub use pipeline_config::PipelineConfig;
pub use steps::Stage;
pub use table::Table;

/// The three refinement layers, in data-flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Bronze => BRONZE_LAYER,
            Layer::Silver => SILVER_LAYER,
            Layer::Gold => GOLD_LAYER,
        }
    }

    /// Layers whose output this layer reads.
    pub fn dependencies(&self) -> Vec<Layer> {
        match self {
            Layer::Bronze => vec![],
            Layer::Silver => vec![Layer::Bronze],
            Layer::Gold => vec![Layer::Silver],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one stage run
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Layer,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns: Vec<String>,
    pub output: PathBuf,
    /// sha256 of the file as written; equal digests mean byte-identical output
    pub sha256: String,
    pub warnings: Vec<String>,
}
