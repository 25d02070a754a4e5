mod app;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use app::CutterChartApp;
use config::AppConfig;
use data::loader::load_catalogs;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("reading configuration")?;
    log::info!(
        "Loading {:?} catalogs from {}",
        config.version,
        config.workbook.display()
    );

    // Without its catalogs the viewer has nothing to show.
    let catalogs = load_catalogs(&config.workbook, config.version)
        .with_context(|| format!("loading catalogs from {}", config.workbook.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;
    let state = AppState::new(Arc::new(catalogs), config.workbook.clone())
        .context("catalog workbook contains no brands")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([700.0, 420.0]),
        ..Default::default()
    };

    let logo = config.logo.clone();
    eframe::run_native(
        "Practical Tools Cutter Correlation Chart",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(CutterChartApp::new(state, logo)))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}
