use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use stellar_layers::infra::TapRegistry;
use stellar_layers::observability::init_logging;
use stellar_layers::{Config, Layer, LayerPipeline, PipelineConfig, StageReport};

#[derive(Parser)]
#[command(name = "stellar-layers")]
#[command(about = "Bronze/silver/gold layering for astronomical catalog tables")]
#[command(version)]
struct Cli {
    /// Catalog config (TOML). Defaults to the built-in LAMOST catalog
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory that relative paths of the built-in catalog are resolved against
    #[arg(long, global = true, default_value = ".")]
    data_root: PathBuf,

    /// Print stage reports as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the raw catalog table from the registry
    Bronze,
    /// Map the bronze file onto the standardized schema
    Silver,
    /// Derive identifier and class columns from the silver file
    Gold,
    /// Run the layers in order
    Run {
        /// Reuse the bronze file on disk instead of querying the registry
        #[arg(long)]
        skip_bronze: bool,
    },
}

fn print_reports(reports: &[StageReport]) {
    for report in reports {
        println!("\n📊 {} layer:", report.stage);
        println!("   Rows in: {}", report.rows_in);
        println!("   Rows out: {}", report.rows_out);
        println!("   Columns: {}", report.columns.len());
        println!("   Output file: {}", report.output.display());
        println!("   sha256: {}", report.sha256);
        if !report.warnings.is_empty() {
            println!("\n⚠️  Warnings:");
            for warning in &report.warnings {
                println!("   - {}", warning);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = init_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading catalog config {}", path.display()))?,
        None => Config::builtin(&cli.data_root).context("loading built-in catalog config")?,
    };
    info!(
        "Catalog {} ({}): bronze={} silver={} gold={}",
        config.catalog.name,
        config.catalog.registry_id,
        config.paths.bronze.display(),
        config.paths.silver.display(),
        config.paths.gold.display()
    );

    let registry = TapRegistry::new(&config.registry.tap_url, config.registry.timeout_seconds)
        .context("building registry client")?;
    let pipeline = LayerPipeline::new(config, Box::new(registry));

    let plan = match cli.command {
        Commands::Bronze => PipelineConfig::single(Layer::Bronze),
        Commands::Silver => PipelineConfig::single(Layer::Silver),
        Commands::Gold => PipelineConfig::single(Layer::Gold),
        Commands::Run { skip_bronze: true } => PipelineConfig::refine_only(),
        Commands::Run { skip_bronze: false } => PipelineConfig::full(),
    };

    let reports = pipeline
        .run(&plan)
        .with_context(|| format!("pipeline '{}' failed", plan.name))?;

    let warning_count: usize = reports.iter().map(|r| r.warnings.len()).sum();
    if warning_count > 0 {
        warn!("{} warnings across {} stages", warning_count, reports.len());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
        println!("\n✅ Pipeline '{}' completed", plan.name);
    }
    Ok(())
}
