use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::PresentationModel;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{ScenarioSection, WorkflowConfig};
use workflow::report::ScenarioReport;
use workflow::runner::Runner;

mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Coordinated-turn scenario and radar measurement simulator"
)]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Integration step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Scenario horizon in seconds
    #[arg(long)]
    t_final: Option<f64>,
    /// Seed for measurement noise; omitted means a fresh seed per run
    #[arg(long)]
    seed: Option<u64>,
    /// Zero every noise sigma for deterministic output
    #[arg(long, default_value_t = false)]
    disable_noise: bool,
    /// Where the trajectory interchange CSV is written and read back
    #[arg(long)]
    interchange: Option<PathBuf>,
    /// Write all datasets and the run summary as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the presentation bridge alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn resolve_config(args: &Args) -> anyhow::Result<WorkflowConfig> {
    let mut config = match args.workflow.as_ref() {
        Some(path) => WorkflowConfig::load(path)?,
        None => {
            let defaults = ScenarioSection::default();
            WorkflowConfig::from_args(
                args.dt.unwrap_or(defaults.dt),
                args.t_final.unwrap_or(defaults.t_final),
                args.seed,
                args.disable_noise,
            )
        }
    };
    if let Some(dt) = args.dt {
        config.scenario.dt = dt;
    }
    if let Some(t_final) = args.t_final {
        config.scenario.t_final = t_final;
    }
    if args.seed.is_some() {
        config.measurement.seed = args.seed;
    }
    if args.disable_noise {
        config.measurement.disable_noise = true;
    }
    if let Some(path) = args.interchange.as_ref() {
        config.interchange_path = path.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = resolve_config(&args)?;
    let runner = Runner::new(workflow_config);
    let result = runner.execute().context("running scenario workflow")?;

    println!(
        "Scenario -> {} truth samples, {} interchange rows, {} channels, {} servo rows",
        result.truth.samples.len(),
        result.summary.interchange_rows,
        result.channels.len(),
        result.servo.len()
    );
    for channel in &result.summary.channels {
        println!(
            "  {:<16} period {:>4}: {:>5} valid / {:>5} rows, residual rms r={:.3} m b={:.4} deg e={:.4} deg",
            channel.name,
            channel.period,
            channel.valid,
            channel.rows,
            channel.range_residual_rms,
            channel.bearing_residual_rms,
            channel.elevation_residual_rms
        );
    }

    if let Some(path) = args.report.as_ref() {
        ScenarioReport::from_result(&result).write(path)?;
        println!("Report written to {}", path.display());
    }

    let gui_bridge = GuiBridge::new();
    gui_bridge.publish(PresentationModel::new(
        result.datasets,
        result.summary.radar_relative,
    ))?;

    if args.serve {
        let _server = gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
