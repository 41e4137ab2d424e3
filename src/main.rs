mod analysis;
mod app;
mod cli;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod report;
mod state;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use app::UniformityViewerApp;
use cli::Args;
use config::{RunConfig, RunPaths};
use report::RunReport;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = RunConfig::from_args(&args);

    if args.view {
        return run_viewer(&args, config);
    }

    let paths = RunPaths::resolve(&args)?;
    let outcome = pipeline::run(&paths.manifest, &paths.data_dir, &config)?;

    if let Some(report) = &args.report {
        RunReport::new(&outcome).write(report)?;
    }

    let grid = outcome.into_grid()?;
    data::export::write_grid(&grid, &paths.output)?;
    Ok(())
}

fn run_viewer(args: &Args, config: RunConfig) -> Result<()> {
    let mut state = AppState::new(config);
    if let (Some(manifest), Some(data_dir)) = (&args.manifest, &args.data_dir) {
        state.run(manifest, data_dir);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Profilm Uniformity – Peak Inspection",
        options,
        Box::new(move |_cc| Ok(Box::new(UniformityViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
