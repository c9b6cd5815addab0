use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Diagnostics go to stderr; stdout is reserved for the identity listing.
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("crt_identities=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("crt_identities=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Append-only plain-text log of fatal errors.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn format_entry(at: DateTime<Local>, message: &str) -> String {
        format!("[{}] ERROR: {}", at.format(TIMESTAMP_FORMAT), message)
    }

    /// Write the entry to stderr and append it to the log file.
    ///
    /// An unopenable log file is not itself an error; the stderr line is
    /// still written.
    pub fn record(&self, message: &str) -> String {
        let entry = Self::format_entry(Local::now(), message);
        eprintln!("{}", entry);

        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", entry) {
                    tracing::debug!("Failed to append to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => tracing::debug!("Failed to open {}: {}", self.path.display(), e),
        }

        entry
    }
}
