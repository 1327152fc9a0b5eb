//! ImageLab — main entry point.
//!
//! Sets up logging (console + rolling file in the app data directory),
//! restores persisted application state, spawns the I/O worker, and hands
//! control to eframe.

use imagelab_rs::config::{self, AppState};
use imagelab_rs::frontend::ImageLabApp;
use imagelab_rs::io::IoBridge;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging. The file layer writes to the app data directory;
    // the guard must outlive the app so buffered lines are flushed.
    let _log_guard = init_logging();

    tracing::info!("Starting ImageLab");

    // Load application state (recent images, preferences)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing_images();

    // Spawn the I/O worker thread
    let (io, io_handle) = IoBridge::spawn();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("ImageLab"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "ImageLab",
        native_options,
        Box::new(|cc| Ok(Box::new(ImageLabApp::new(cc, io, app_state)))),
    );

    tracing::info!("Shutting down...");
    if io_handle.join().is_err() {
        tracing::warn!("I/O worker exited abnormally");
    }

    result
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,imagelab_rs=debug"));

    match config::ensure_app_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "imagelab.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        Err(e) => {
            // No data directory: log to the console only.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            tracing::warn!("file logging disabled: {e}");
            None
        }
    }
}
