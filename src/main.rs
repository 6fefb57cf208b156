#![windows_subsystem = "windows"]

use anyhow::Result;
use druid::{AppLauncher, WindowDesc};
use log::info;

mod app;
mod capture;
mod config;
mod error;
mod metadata;
mod notice;
mod persist;
mod preview;
mod selection;
mod selection_logic;
mod state;
mod ui;

use app::CaptureApp;
use capture::XcapGrabber;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = CaptureApp::new(Box::new(XcapGrabber));
    let window = WindowDesc::new(ui::build_root(app))
        .title(config::WINDOW_TITLE)
        .window_size(config::WINDOW_SIZE);

    info!("starting {}", config::WINDOW_TITLE);
    AppLauncher::with_window(window).launch(AppState::default())?;
    Ok(())
}
