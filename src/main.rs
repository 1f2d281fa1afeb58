#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod app;
mod config;
mod error;
mod kanban;
mod layout;
mod model;
mod ui;

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{ConfigPaths, Session, Settings};

fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!("warn,taskflow={level}", level = log_level);
    let env_filter = EnvFilter::try_new(filter_string).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
}

/// Settings and session from disk; problems fall back to defaults.
fn load_config() -> (Settings, Session, Option<ConfigPaths>) {
    let paths = match ConfigPaths::discover() {
        Ok(paths) => Some(paths),
        Err(e) => {
            tracing::warn!("No config directory, using defaults: {}", e);
            None
        }
    };
    let settings = paths
        .as_ref()
        .map(|p| {
            Settings::load_from(&p.settings).unwrap_or_else(|e| {
                tracing::warn!("Failed to load settings from {:?}: {}", p.settings, e);
                Settings::default()
            })
        })
        .unwrap_or_default()
        .with_env_overrides();
    let session = paths
        .as_ref()
        .map(|p| {
            Session::load_from(&p.session).unwrap_or_else(|e| {
                tracing::warn!("Failed to load session from {:?}: {}", p.session, e);
                Session::default()
            })
        })
        .unwrap_or_default();
    (settings, session, paths)
}

fn main() -> eframe::Result<()> {
    init_tracing();
    let (settings, session, paths) = load_config();
    tracing::info!(api = %settings.base_url(), authenticated = session.is_authenticated(), "starting TaskFlow");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 480.0])
            .with_title("TaskFlow"),
        ..Default::default()
    };

    eframe::run_native(
        "TaskFlow",
        options,
        Box::new(move |cc| {
            let app = app::TaskFlowApp::new(cc, settings, session, paths)?;
            Ok(Box::new(app))
        }),
    )
}
