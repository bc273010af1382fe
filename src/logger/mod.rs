//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - `env_logger` initialisation with a timestamped format
//! - Startup banner and farewell on stdout
//! - Access logging in Common Log Format
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;
use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;

/// Log target for access lines; these are printed without the record prefix
pub const ACCESS_TARGET: &str = "access";

/// Initialize the logger with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &LoggingConfig) {
    let env = Env::default().default_filter_or(config.level.as_str());

    let result = Builder::from_env(env)
        .format(|buf, record| {
            if record.target() == ACCESS_TARGET {
                return writeln!(buf, "{}", record.args());
            }
            writeln!(
                buf,
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%:z"),
                record.level(),
                record.module_path().unwrap_or_default(),
                record.args()
            )
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("[WARN] Logger already initialized: {e}");
    }
}

/// Print the startup banner
///
/// Goes to stdout regardless of the log filter.
pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("======================================");
    println!("Serving HTTP on http://localhost:{}", addr.port());
    println!("Listening on: {addr}");
    println!("Directory: {}", root.display());
    println!("Open http://localhost:{} in your browser", addr.port());
    println!("Press Ctrl+C to stop the server");
    println!("======================================");
}

pub fn log_shutdown() {
    println!("\nServer stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    log::error!("{message}");
}

pub fn log_warning(message: &str) {
    log::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    log::info!(target: ACCESS_TARGET, "{}", entry.format_common());
}
