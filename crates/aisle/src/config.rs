//! TOML configuration.
//!
//! Every key is optional. A missing file is not an error; a file that exists
//! but does not parse, or holds values the engine cannot work with, is.
//!
//! ```toml
//! [api]
//! base_url = "https://dummyjson.com/"
//! page_size = 20
//!
//! [ui]
//! row_height = 1
//! overscan = 4
//! query_debounce_ms = 300
//! resize_debounce_ms = 300
//! fps = 60
//! mouse = true
//! theme = "dark"
//!
//! [cache]
//! retain_keys = 8
//! stale_after_secs = 120
//!
//! [state]
//! file = "/tmp/aisle-location.toml"
//! ```

use crate::cli::Cli;
use aisle_widgets::ThemeKind;
use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com/";
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api: ApiSettings,
    pub ui: UiSettings,
    pub cache: CacheSettings,
    pub state: StateSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub base_url: String,
    pub page_size: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    pub row_height: usize,
    pub overscan: usize,
    pub query_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    pub fps: u32,
    pub mouse: bool,
    pub theme: ThemeName,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            row_height: 1,
            overscan: 4,
            query_debounce_ms: 300,
            resize_debounce_ms: 300,
            fps: 60,
            mouse: true,
            theme: ThemeName::Dark,
        }
    }
}

impl UiSettings {
    pub fn query_debounce(&self) -> Duration {
        Duration::from_millis(self.query_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl From<ThemeName> for ThemeKind {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => ThemeKind::Dark,
            ThemeName::Light => ThemeKind::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Recently abandoned result sets kept for instant return. 0 disables.
    pub retain_keys: usize,
    pub stale_after_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            retain_keys: 8,
            stale_after_secs: 120,
        }
    }
}

impl CacheSettings {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateSettings {
    /// Where the last position is kept. Defaults to the platform state dir.
    pub file: Option<PathBuf>,
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "aisle")
}

/// `<config_dir>/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Settings {
    /// Read `path`, or the default location when `None`. A file that does
    /// not exist yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            tracing::debug!("no config directory, using defaults");
            return Ok(Self::default());
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let settings = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "loaded config");
                settings.validate()?;
                Ok(settings)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(url) = &cli.api_url {
            self.api.base_url.clone_from(url);
        }
        if let Some(size) = cli.page_size {
            self.api.page_size = size;
        }
        if let Some(theme) = cli.theme {
            self.ui.theme = theme;
        }
        if cli.no_mouse {
            self.ui.mouse = false;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.page_size == 0 {
            return Err(ConfigError::Invalid("api.page_size must be at least 1".into()));
        }
        if self.ui.row_height == 0 {
            return Err(ConfigError::Invalid("ui.row_height must be at least 1".into()));
        }
        self.api.base_url()?;
        Ok(())
    }
}

impl ApiSettings {
    /// The base URL, always ending in `/` so relative joins stay under it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            ConfigError::Invalid(format!("api.base_url {:?}: {err}", self.base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "api.base_url {:?} cannot be a base URL",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [api]
            page_size = 50

            [ui]
            theme = "light"
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.page_size, 50);
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.ui.theme, ThemeName::Light);
        assert_eq!(settings.ui.query_debounce(), Duration::from_millis(300));
        assert_eq!(settings.cache, CacheSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("[api]\npagesize = 3\n").is_err());
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let mut settings = Settings::default();
        settings.api.page_size = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_row_height_is_invalid() {
        let mut settings = Settings::default();
        settings.ui.row_height = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = ApiSettings {
            base_url: "http://localhost:8080/v1".into(),
            page_size: 20,
        };
        assert_eq!(api.base_url().unwrap().as_str(), "http://localhost:8080/v1/");
    }

    #[test]
    fn bad_base_url_is_invalid() {
        let api = ApiSettings {
            base_url: "not a url".into(),
            page_size: 20,
        };
        assert!(api.base_url().is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_is_read_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nrow_height = 0\n").unwrap();
        assert!(matches!(Settings::load(Some(&path)), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "[ui\n").unwrap();
        assert!(matches!(Settings::load(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn cli_overrides_file() {
        let mut settings = Settings::default();
        let cli = Cli::parse_from(["aisle", "--page-size", "5", "--theme", "light", "--no-mouse"]);
        settings.apply_cli(&cli).unwrap();
        assert_eq!(settings.api.page_size, 5);
        assert_eq!(settings.ui.theme, ThemeName::Light);
        assert!(!settings.ui.mouse);
    }
}
