mod app;
mod color;
mod config;
mod control;
mod data;
mod error;
mod export;
mod figure;
mod reactive;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::GapminderApp;
use config::{Args, DashboardConfig};
use state::Shared;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = DashboardConfig::resolve(&args)?;

    // No session may start without the table.
    let dataset = data::loader::load_file(&config.dataset)
        .with_context(|| format!("dataset {} could not be loaded", config.dataset.display()))?;
    log::info!(
        "Loaded {} observations, years {:?}, continents {:?}",
        dataset.len(),
        dataset.available_years(),
        dataset.continents()
    );

    let shared = Shared::new(
        Arc::new(dataset),
        config.default_year,
        config.year_step,
        config.chart.clone(),
        config.animation.clone(),
    )
    .ok_or(error::DatasetError::Empty)?;
    log::info!(
        "Year control {}..={} step {}, default {}",
        shared.control.min,
        shared.control.max,
        shared.control.step,
        shared.control.default
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gapminder – Live Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(GapminderApp::new(shared)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
