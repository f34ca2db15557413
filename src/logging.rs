//! Tracing setup.
//!
//! The menu owns the terminal while it runs, so log output never goes to
//! stdout or stderr. Logging is off unless a log file is given, either
//! explicitly or through `LIVEMENU_LOG`. The filter comes from `RUST_LOG`
//! and defaults to `info`.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "LIVEMENU_LOG";

const DEFAULT_FILTER: &str = "info";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Where logs should go: the explicit path, else `LIVEMENU_LOG`.
pub fn log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(LOG_FILE_ENV).map(PathBuf::from))
}

/// Install the global subscriber once. Later calls are no-ops.
///
/// Returns whether logging is active after the call.
pub fn init_tracing(explicit: Option<&Path>) -> io::Result<bool> {
    init_tracing_at(log_path(explicit))
}

fn init_tracing_at(path: Option<PathBuf>) -> io::Result<bool> {
    if TRACING_INIT.get().is_some() {
        return Ok(true);
    }
    let Some(path) = path else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    TRACING_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_thread_names(true)
            .finish();
        // Another subscriber may already be installed by an embedding app.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // One test owns the process-wide subscriber so the steps run in order.
    #[test]
    fn init_is_off_without_path_then_opens_file_once() {
        let dir = TempDir::new().unwrap();

        assert!(!init_tracing_at(None).unwrap());
        assert!(TRACING_INIT.get().is_none());

        let unreachable = dir.path().join("missing").join("menu.log");
        assert!(init_tracing_at(Some(unreachable)).is_err());
        assert!(TRACING_INIT.get().is_none());

        let path = dir.path().join("menu.log");
        assert!(init_tracing_at(Some(path.clone())).unwrap());
        assert!(path.exists());

        // Already active: later calls report logging on, whatever they pass.
        assert!(init_tracing_at(None).unwrap());
        let other = dir.path().join("other.log");
        assert!(init_tracing_at(Some(other.clone())).unwrap());
        assert!(!other.exists());
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/explicit.log");
        assert_eq!(log_path(Some(path)), Some(path.to_path_buf()));
    }
}
