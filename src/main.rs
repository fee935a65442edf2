use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tui_portfolio::config::AppConfig;
use tui_portfolio::internal::prefs::PrefStore;
use tui_portfolio::internal::ui::app::App;
use tui_portfolio::tui;

/// File logging for the interactive session. The returned guard must stay
/// alive for the worker to flush.
fn init_logging(config: &AppConfig) -> WorkerGuard {
    let log_dir = config
        .logging
        .log_directory
        .clone()
        .unwrap_or_else(|| "logs".to_string());
    let file_appender = tracing_appender::rolling::daily(log_dir, "tui-portfolio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured filter
    let filter = match std::env::var("RUST_LOG") {
        Ok(env_filter) => EnvFilter::new(env_filter),
        Err(_) => EnvFilter::new(config.logging.filter_string()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .compact()
        .init();

    guard
}

fn init_console_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();

    let terminal = match tui::init() {
        Ok(terminal) => terminal,
        Err(e) => {
            // No alternate screen to protect, log to the console instead
            init_console_logging();
            tracing::error!("Failed to initialize terminal: {}", e);
            eprintln!("Failed to initialize terminal: {}", e);
            return Err(e);
        }
    };

    let _guard = init_logging(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Session started");

    let mut app = App::with_config(config, PrefStore::open());
    let result = app.run(terminal).await;

    // Leave the terminal usable before reporting anything
    tui::restore()?;
    if let Err(e) = &result {
        eprintln!("Application error: {:?}", e);
    }
    result
}
