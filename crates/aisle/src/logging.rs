//! File logging through `tracing-subscriber`.
//!
//! The terminal belongs to the UI, so logs only go to a file, and only when
//! one is named. `RUST_LOG` takes precedence over the `-v` count.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber writing to `path`.
///
/// Does nothing when `path` is `None`. Returns `false` when a subscriber was
/// already installed.
pub fn init(path: Option<&Path>, verbosity: u8) -> std::io::Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "info");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(7), "trace");
    }

    #[test]
    fn no_file_means_no_subscriber() {
        assert!(!init(None, 2).unwrap());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("aisle.log");
        assert!(init(Some(&path), 0).is_err());
    }
}
