use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory log files are written to: `<config dir>/dashboard/logs`
pub fn logs_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(anyhow::anyhow!("Could not find config directory"))?
        .join("dashboard");
    Ok(config_dir.join("logs"))
}

/// Initialize tracing with file-based logging
/// Logs are written to ~/.config/dashboard/logs/dashboard-YYYY-MM-DD-HH-MM-SS.log
pub fn init_logging() -> Result<PathBuf> {
    let logs_dir = logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    let log_filename = log_file_name(Local::now());
    let log_path = logs_dir.join(&log_filename);

    // Stdout belongs to the prompt, so logs only go to the file
    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO, can be overridden with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    // The writer flushes until the guard drops; keep it for the whole process
    std::mem::forget(guard);

    Ok(log_path)
}

fn log_file_name(now: chrono::DateTime<Local>) -> String {
    format!("dashboard-{}.log", now.format("%Y-%m-%d-%H-%M-%S"))
}
