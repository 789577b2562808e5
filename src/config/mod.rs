#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, InsertArgs, SearchArgs};
pub use toml_config::FileConfig;

use crate::core::export::ExportFormat;
use crate::core::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_filename, validate_path, validate_positive_number, validate_url, Validate,
};

pub const DEFAULT_CONFIG_FILE: &str = "tenant-finder.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:80";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = ".";

/// Flag values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub output_path: Option<String>,
    pub export_filename: Option<String>,
    pub verbose: bool,
    pub log_format: Option<LogFormat>,
}

/// Effective configuration: defaults, then the config file, then flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub output_path: String,
    pub export_filename: Option<String>,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            export_filename: None,
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }
}

impl Settings {
    pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Settings::default();

        let file_log_format = match file.logging.format.as_deref() {
            Some(format) => Some(format.parse::<LogFormat>().map_err(|reason| {
                FinderError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason,
                }
            })?),
            None => None,
        };

        Ok(Settings {
            base_url: overrides
                .base_url
                .or(file.server.base_url)
                .unwrap_or(defaults.base_url),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file.server.timeout_seconds)
                .unwrap_or(defaults.timeout_seconds),
            output_path: overrides
                .output_path
                .or(file.export.output_path)
                .unwrap_or(defaults.output_path),
            export_filename: overrides.export_filename.or(file.export.filename),
            verbose: overrides.verbose || file.logging.verbose.unwrap_or(false),
            log_format: overrides
                .log_format
                .or(file_log_format)
                .unwrap_or(defaults.log_format),
        })
    }

    /// Reads `path` when given, else `tenant-finder.toml` if it exists.
    pub fn load(config_path: Option<&str>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(FileConfig::from_file(path)?),
            None if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(FileConfig::from_file(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };
        Self::resolve(file, overrides)
    }

    pub fn export_filename_for(&self, format: ExportFormat) -> &str {
        self.export_filename
            .as_deref()
            .unwrap_or_else(|| format.default_filename())
    }
}

#[cfg(feature = "cli")]
impl From<&CliConfig> for Overrides {
    fn from(cli: &CliConfig) -> Self {
        let (output_path, export_filename) = match &cli.command {
            Command::Search(args) => (args.output_dir.clone(), args.filename.clone()),
            Command::Insert(_) => (None, None),
        };
        Overrides {
            base_url: cli.base_url.clone(),
            timeout_seconds: cli.timeout,
            output_path,
            export_filename,
            verbose: cli.verbose,
            log_format: cli.log_format,
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("server.base_url", &self.base_url)?;
        validate_positive_number("server.timeout_seconds", self.timeout_seconds, 1)?;
        validate_path("export.output_path", &self.output_path)?;
        if let Some(filename) = &self.export_filename {
            validate_filename("export.filename", filename)?;
        }
        Ok(())
    }
}
