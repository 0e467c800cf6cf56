//! Layered configuration for miraikit tools.
//!
//! Sources are merged in this order, each overriding the previous one:
//!
//! ```text
//! MiraikitConfig::default()
//!   <- miraikit.<profile>.toml   (only when present next to a base file candidate)
//!   <- miraikit.toml | config.toml
//!   <- MIRAIKIT_* environment    (nested keys split on `__`)
//!   <- ConfigLoader::merge(..)
//! ```
//!
//! TOML files need the default `toml-config` feature, YAML files
//! (`miraikit.yaml`, `miraikit.yml`, `config.yaml`, `config.yml`) the
//! `yaml-config` feature. When both are enabled each format is searched on
//! its own. Without explicit search paths the current directory and
//! `<config dir>/miraikit` are searched.
//!
//! ```rust,ignore
//! use miraikit_runtime::config::ConfigLoader;
//!
//! // MIRAIKIT_DECODE__CLOCK=utc overrides whatever the file says
//! let config = ConfigLoader::new().profile("prod").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::MiraikitConfig;

/// Prefix of environment variables read by the loader.
pub const ENV_PREFIX: &str = "MIRAIKIT_";

/// Name of the subdirectory searched inside the user config directory.
const APP_DIR: &str = "miraikit";

/// Base file names per enabled format, most preferred first.
fn base_names() -> Vec<&'static [&'static str]> {
    let mut formats: Vec<&'static [&'static str]> = Vec::new();
    #[cfg(feature = "toml-config")]
    formats.push(&["miraikit.toml", "config.toml"]);
    #[cfg(feature = "yaml-config")]
    formats.push(&["miraikit.yaml", "miraikit.yml", "config.yaml", "config.yml"]);
    formats
}

/// Selects which `miraikit.<profile>.*` overlay files are read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// `development`, also `dev`.
    #[default]
    Development,
    /// `production`, also `prod`.
    Production,
    /// Any other name, lowercased.
    Custom(String),
}

impl Profile {
    /// The name used in overlay file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `MIRAIKIT_PROFILE`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var(format!("{ENV_PREFIX}PROFILE"))
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }

    /// Returns the overlay path for `base`: `dir/miraikit.toml` becomes
    /// `dir/miraikit.<profile>.toml`.
    fn overlay(&self, base: &Path) -> Option<PathBuf> {
        let stem = base.file_stem()?.to_str()?;
        let ext = base.extension()?.to_str()?;
        Some(base.with_file_name(format!("{stem}.{}.{ext}", self.as_str())))
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for a [`MiraikitConfig`] merged from files, environment and code.
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .file("deploy/miraikit.toml")
///     .merge(overrides)
///     .load()?;
/// ```
pub struct ConfigLoader {
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with the profile from `MIRAIKIT_PROFILE` and env
    /// overrides enabled.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the profile by name.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search. Replaces the default search paths.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Searches the current directory.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Searches `<config dir>/miraikit`.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join(APP_DIR)),
            None => self,
        }
    }

    /// Reads exactly this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Applies `MIRAIKIT_*` overrides. On by default.
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Ignores `MIRAIKIT_*` variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers `config` over every other source.
    ///
    /// Fields left at their default still override file and env values.
    pub fn merge(mut self, config: MiraikitConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Merges all sources and extracts the configuration.
    pub fn load(self) -> ConfigResult<MiraikitConfig> {
        let mut figment = Figment::from(Serialized::defaults(MiraikitConfig::default()));

        let files = match &self.config_file {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => vec![path.clone()],
            None => self.discover_files(),
        };
        for path in &files {
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_file(figment, path)?;
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Applying environment overrides");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let config: MiraikitConfig = figment.merge(self.overrides).extract()?;
        debug!(
            profile = %self.profile,
            files = files.len(),
            level = %config.logging.level,
            clock = ?config.decode.clock,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join(APP_DIR)))
            .collect()
    }

    /// Lists the files to merge, in merge order.
    ///
    /// Per format, candidates are tried directory by directory; an existing
    /// overlay is taken for every candidate tried, and the first existing
    /// base file ends the search for that format.
    fn discover_files(&self) -> Vec<PathBuf> {
        let dirs = self.search_dirs();
        let mut files = Vec::new();

        'format: for names in base_names() {
            for dir in &dirs {
                for name in names {
                    let base = dir.join(name);
                    if let Some(overlay) = self.profile.overlay(&base).filter(|p| p.is_file()) {
                        files.push(overlay);
                    }
                    if base.is_file() {
                        files.push(base);
                        continue 'format;
                    }
                }
            }
        }

        if files.is_empty() {
            debug!(dirs = ?dirs, "No configuration file found, using defaults");
        }
        files
    }
}

/// Merges one file, picking the provider from its extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Loads configuration from the default locations with env overrides.
pub fn load_config() -> ConfigResult<MiraikitConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path` with env overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<MiraikitConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, LogLevel, LogOutput};
    use figment::Jail;
    use miraikit_core::Clock;

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config, MiraikitConfig::default());
            assert_eq!(config.logging.level.as_str(), "info");
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("Development"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }

    #[test]
    fn test_profile_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("MIRAIKIT_PROFILE", "production");
            assert_eq!(Profile::from_env(), Profile::Production);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_discover_files_order() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            jail.create_file("miraikit.dev.toml", "")?;
            jail.create_file("miraikit.development.toml", "")?;
            jail.create_file("config.development.toml", "")?;

            let loader = ConfigLoader::new()
                .profile("dev")
                .search_path(jail.directory())
                .without_env();
            let names: Vec<_> = loader
                .discover_files()
                .iter()
                .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
                .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
                .collect();

            assert_eq!(
                names,
                [
                    "miraikit.development.toml",
                    "config.development.toml",
                    "config.toml"
                ]
            );
            Ok(())
        });
    }

    #[test]
    fn test_profile_overlay_path() {
        let overlay = Profile::Production.overlay(Path::new("/etc/miraikit/config.yml"));
        assert_eq!(
            overlay,
            Some(PathBuf::from("/etc/miraikit/config.production.yml"))
        );
        assert_eq!(Profile::Development.overlay(Path::new("/etc/miraikit")), None);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_file_and_profile_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "miraikit.toml",
                r#"
                [logging]
                level = "debug"

                [decode]
                clock = "utc"
                "#,
            )?;
            jail.create_file(
                "miraikit.production.toml",
                r#"
                [logging]
                level = "warn"
                format = "pretty"
                "#,
            )?;

            let config = ConfigLoader::new()
                .profile("production")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            // The main file is merged after the profile file.
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.format, LogFormat::Pretty);
            assert_eq!(config.decode.clock, Clock::Utc);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("miraikit.toml", "[logging]\nlevel = \"debug\"\n")?;
            jail.set_env("MIRAIKIT_LOGGING__LEVEL", "error");
            jail.set_env("MIRAIKIT_DECODE__STRICT_EVENTS", "true");
            jail.set_env("MIRAIKIT_LOGGING__FILTERS__MIRAIKIT_MIRAI", "trace");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.logging.level, LogLevel::Error);
            assert!(config.decode.strict_events);
            assert_eq!(
                config.logging.filters.get("miraikit_mirai").map(String::as_str),
                Some("trace")
            );
            Ok(())
        });
    }

    #[test]
    fn test_programmatic_merge() {
        Jail::expect_with(|jail| {
            let mut overrides = MiraikitConfig::default();
            overrides.logging.output = LogOutput::Stdout;
            overrides.decode.color = false;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .merge(overrides)
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.logging.output, LogOutput::Stdout);
            assert!(!config.decode.color);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_errors() {
        Jail::expect_with(|jail| {
            let missing = ConfigLoader::new()
                .file(jail.directory().join("missing.toml"))
                .without_env()
                .load();
            assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

            jail.create_file("miraikit.ini", "level = debug")?;
            let unsupported = ConfigLoader::new()
                .file(jail.directory().join("miraikit.ini"))
                .without_env()
                .load();
            assert!(matches!(
                unsupported,
                Err(ConfigError::UnsupportedFormat(ref ext)) if ext == "ini"
            ));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_bad_value_fails_extraction() {
        Jail::expect_with(|jail| {
            jail.create_file("miraikit.toml", "[decode]\nclock = \"mars\"\n")?;
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }

    #[cfg(feature = "yaml-config")]
    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            let mut written = MiraikitConfig::default();
            written.logging.level = LogLevel::Trace;
            written.decode.clock = Clock::Utc;
            let yaml = serde_yaml::to_string(&written).map_err(|e| e.to_string())?;
            jail.create_file("miraikit.yaml", &yaml)?;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config, written);
            Ok(())
        });
    }
}
