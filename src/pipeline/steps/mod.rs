use std::time::Instant;

use tracing::{error, info, info_span};

use super::{Layer, StageReport};
use crate::error::Result;
use crate::observability::metrics;

/// Common trait for all layer stages
pub trait Stage {
    /// Read the input layer, transform it and write the output layer
    fn execute(&self) -> Result<StageReport>;

    /// The layer this stage produces
    fn layer(&self) -> Layer;
}

/// Wrap a stage body with its span, timing and success/failure metrics.
pub(crate) fn instrumented<F>(layer: Layer, body: F) -> Result<StageReport>
where
    F: FnOnce() -> Result<StageReport>,
{
    let span = info_span!("stage", layer = %layer);
    let _enter = span.enter();
    let started = Instant::now();

    match body() {
        Ok(report) => {
            metrics::stage::completed(layer.as_str(), started.elapsed());
            info!(
                rows_in = report.rows_in,
                rows_out = report.rows_out,
                sha256 = %report.sha256,
                "Wrote {}",
                report.output.display()
            );
            Ok(report)
        }
        Err(e) => {
            metrics::stage::failed(layer.as_str());
            error!("Stage failed: {}", e);
            Err(e)
        }
    }
}

pub mod bronze;
pub mod gold;
pub mod silver;

pub use bronze::BronzeStep;
pub use gold::GoldStep;
pub use silver::SilverStep;
