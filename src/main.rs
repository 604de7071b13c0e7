//! Urban Mobility Dashboard
//!
//! A GUI application for exploring urban mobility trip data.

use anyhow::Context;
use eframe::egui;
use log::info;
use tokio::runtime::Runtime;

use mobility_dashboard::api::ApiClient;
use mobility_dashboard::app::{Dashboard, DashboardApp};
use mobility_dashboard::config::{DashboardConfig, Preferences};
use mobility_dashboard::plotting::{renderer_for, ChartTheme};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_default().context("failed to load configuration")?;
    let preferences = Preferences::load_default();
    info!("Using API at {} with the {:?} renderer", config.api_base, config.renderer);

    let client = ApiClient::from_config(&config).context("failed to create API client")?;
    let renderer = renderer_for(config.renderer, ChartTheme::for_theme(preferences.theme));

    // Initialize the Tokio runtime
    let rt = Runtime::new().context("failed to start async runtime")?;
    let mut dashboard = Dashboard::new(client, renderer, &config, preferences.theme, rt.handle().clone())
        .with_preferences_path(Preferences::default_path());

    rt.block_on(async {
        dashboard.load_initial();

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 860.0])
                .with_min_inner_size([900.0, 600.0])
                .with_title("Urban Mobility Dashboard"),
            ..Default::default()
        };

        eframe::run_native(
            "Urban Mobility Dashboard",
            options,
            Box::new(|_cc| Ok(Box::new(DashboardApp::new(dashboard)) as Box<dyn eframe::App>)),
        )
        .map_err(|e| anyhow::anyhow!("error running application: {}", e))
    })
}
