use anyhow::Context;
use bridge::model::ReportModel;
use bridge::server::{bind_address, HttpBridge};
use clap::Parser;
use log::info;
use report::OutputFormat;
use spectrocore::telemetry::MetricsRecorder;
use spectrocore::CalibrationEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod ingest;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Beer's-law spectrophotometry calculator")]
struct Args {
    /// Load a workflow config from YAML; flags below override it
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Headerless CSV of `concentration,absorbance` standards
    #[arg(long)]
    standards: Option<PathBuf>,
    /// Headerless CSV of `label,absorbance` (or bare absorbance) samples
    #[arg(long)]
    samples: Option<PathBuf>,
    /// Headerless CSV of `gram,absorbansi` rows for the manual-curve mode
    #[arg(long)]
    mass_readings: Option<PathBuf>,
    /// Intercept (b) of a manually entered curve
    #[arg(long, allow_hyphen_values = true)]
    intercept: Option<f64>,
    /// Slope (m) of a manually entered curve
    #[arg(long, allow_hyphen_values = true)]
    slope: Option<f64>,
    /// Read unparseable CSV cells as 0.0 instead of failing
    #[arg(long, default_value_t = false)]
    lenient: bool,
    /// Append the rendered report to this file
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Keep an HTTP bridge alive for calibration requests
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    let workflow_config = base.override_with(WorkflowConfig::from_args(
        args.standards,
        args.samples,
        args.mass_readings,
        args.intercept,
        args.slope,
        args.lenient,
        args.report,
    ));

    let metrics = Arc::new(MetricsRecorder::new());
    let engine = Arc::new(CalibrationEngine::with_metrics(metrics.clone()));
    let bridge = HttpBridge::new(engine.clone(), metrics.clone());

    if workflow_config.has_inputs() || !args.serve {
        let runner = Runner::new(workflow_config.clone(), engine);
        let result = runner.execute()?;
        let rendered = report::render(&result, args.format)?;
        println!("{}", rendered);

        bridge.publish(&ReportModel::from(&result));

        if let Some(path) = &workflow_config.report_path {
            report::append_to_log(path, &rendered)?;
            info!("report appended to {}", path.display());
        }
    }

    if args.serve {
        bridge.spawn(bind_address(args.port))?;
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let snapshot = metrics.snapshot();
        info!(
            "shutting down after {} fits, {} samples, {} errors",
            snapshot.fits, snapshot.samples, snapshot.errors
        );
    }

    Ok(())
}
