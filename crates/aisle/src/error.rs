use crate::config::ConfigError;
use crate::location::LocationError;
use crate::store::StoreError;
use aisle_runtime::ProgramError;

/// Everything that can stop the application from starting or finishing.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid --at location: {0}")]
    Location(#[from] LocationError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to open log file {path}: {source}")]
    Logging {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Program(#[from] ProgramError),
}
