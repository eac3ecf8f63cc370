use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use beacon_dedup::{DeduplicationConfig, DeduplicationConfigError};
use beacon_event_schema::protocol::{Level, Object, User};
use beacon_log::{LogConfig, LogFormat, LogLevel};
use beacon_sampling::SamplingConfig;
use serde::{Deserialize, Serialize};

/// The name of the config file within a configuration folder.
const CONFIG_FILE_NAME: &str = "config.yml";

/// Defines the source of a config error.
#[derive(Debug, Default)]
enum ConfigErrorSource {
    /// An error occurring independently.
    #[default]
    None,
    /// An error originating from a configuration file.
    File(PathBuf),
    /// An error originating in a field override, such as a CLI parameter.
    FieldOverride(String),
}

/// Indicates config related errors.
#[derive(Debug)]
pub struct ConfigError {
    source: ConfigErrorSource,
    kind: ConfigErrorKind,
    inner: Option<Box<dyn Error + Send + Sync>>,
}

impl ConfigError {
    #[inline]
    fn wrap<E>(inner: E, kind: ConfigErrorKind) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            source: ConfigErrorSource::None,
            kind,
            inner: Some(Box::new(inner)),
        }
    }

    #[inline]
    fn for_field<E>(inner: E, field: &'static str) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::wrap(inner, ConfigErrorKind::InvalidValue).field(field)
    }

    #[inline]
    fn file<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.source = ConfigErrorSource::File(p.as_ref().to_path_buf());
        self
    }

    #[inline]
    fn field(mut self, name: &'static str) -> Self {
        self.source = ConfigErrorSource::FieldOverride(name.to_owned());
        self
    }

    /// Returns the error kind of the error.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ConfigErrorSource::None => write!(f, "{}", self.kind),
            ConfigErrorSource::File(file_name) => {
                write!(f, "{} (file {})", self.kind, file_name.display())
            }
            ConfigErrorSource::FieldOverride(name) => write!(f, "{} (field {})", self.kind, name),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Indicates config related errors.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum ConfigErrorKind {
    /// Failed to open the file.
    #[error("could not open config file")]
    CouldNotOpenFile,
    /// Failed to serialize the configuration.
    #[error("could not write config file")]
    CouldNotWriteFile,
    /// Parsing YAML failed.
    #[error("could not parse yaml config file")]
    BadYaml,
    /// Parsing JSON failed.
    #[error("could not parse json config file")]
    BadJson,
    /// Invalid config value.
    #[error("invalid config value")]
    InvalidValue,
}

/// Overrides of configuration values, such as from CLI parameters.
#[derive(Debug, Default)]
pub struct OverridableConfig {
    /// The log level.
    pub log_level: Option<String>,
    /// The log format.
    pub log_format: Option<String>,
    /// The sample rate for error events.
    pub error_sample_rate: Option<String>,
    /// The sample rate for all other events.
    pub performance_sample_rate: Option<String>,
}

/// Initial contents of the client scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// The user attached to every event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Tags attached to every event.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Extra data attached to every event.
    #[serde(skip_serializing_if = "Object::is_empty")]
    pub extra: Object,
    /// The level of events that do not specify one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
}

/// Controls event deduplication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deduplication {
    /// Whether deduplication runs at all.
    pub enabled: bool,
    /// Cache size and time window.
    #[serde(flatten)]
    pub config: DeduplicationConfig,
}

impl Default for Deduplication {
    fn default() -> Self {
        Self {
            enabled: true,
            config: DeduplicationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ConfigValues {
    logging: LogConfig,
    scope: ScopeConfig,
    deduplication: Deduplication,
    #[serde(skip_serializing_if = "Option::is_none")]
    sampling: Option<SamplingConfig>,
}

impl ConfigValues {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.deduplication.enabled && self.deduplication.config.max_cache_size == 0 {
            return Err(ConfigError::for_field(
                DeduplicationConfigError::ZeroCapacity,
                "deduplication.maxCacheSize",
            ));
        }

        if let Some(ref sampling) = self.sampling {
            sampling
                .validate()
                .map_err(|e| ConfigError::for_field(e, "sampling"))?;
        }

        Ok(())
    }
}

/// Config struct.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    values: ConfigValues,
    path: PathBuf,
}

impl Config {
    /// Loads a config from a file or from a configuration folder.
    ///
    /// A folder must contain a `config.yml`. Files with a `.json` extension are parsed as JSON,
    /// everything else as YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut path = path.as_ref().to_path_buf();
        if path.is_dir() {
            path.push(CONFIG_FILE_NAME);
        }

        let file = fs::File::open(&path)
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotOpenFile).file(&path))?;
        let reader = io::BufReader::new(file);

        let values: ConfigValues = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_reader(reader)
                .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadJson).file(&path))?,
            _ => serde_yaml::from_reader(reader)
                .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadYaml).file(&path))?,
        };

        values.validate()?;

        Ok(Config { values, path })
    }

    /// Creates a config from a JSON value.
    ///
    /// This is mostly useful for tests.
    pub fn from_json_value(value: serde_json::Value) -> Result<Config, ConfigError> {
        let values: ConfigValues = serde_json::from_value(value)
            .map_err(|err| ConfigError::wrap(err, ConfigErrorKind::BadJson))?;
        values.validate()?;

        Ok(Config {
            values,
            path: PathBuf::new(),
        })
    }

    /// Overrides configuration with values from other sources, such as command line parameters.
    pub fn apply_override(
        &mut self,
        overrides: OverridableConfig,
    ) -> Result<&mut Self, ConfigError> {
        let logging = &mut self.values.logging;

        if let Some(level) = overrides.log_level {
            logging.level = level
                .parse::<LogLevel>()
                .map_err(|err| ConfigError::for_field(err, "log_level"))?;
        }

        if let Some(format) = overrides.log_format {
            logging.format = format
                .parse::<LogFormat>()
                .map_err(|err| ConfigError::for_field(err, "log_format"))?;
        }

        let rates = (overrides.error_sample_rate, overrides.performance_sample_rate);
        if rates.0.is_some() || rates.1.is_some() {
            let mut sampling = self.values.sampling.unwrap_or(SamplingConfig {
                error_sample_rate: 1.0,
                performance_sample_rate: 1.0,
            });

            if let Some(rate) = rates.0 {
                sampling.error_sample_rate = rate
                    .parse()
                    .map_err(|err| ConfigError::for_field(err, "error_sample_rate"))?;
            }

            if let Some(rate) = rates.1 {
                sampling.performance_sample_rate = rate
                    .parse()
                    .map_err(|err| ConfigError::for_field(err, "performance_sample_rate"))?;
            }

            sampling
                .validate()
                .map_err(|err| ConfigError::for_field(err, "sampling"))?;
            self.values.sampling = Some(sampling);
        }

        Ok(self)
    }

    /// Returns the path of the loaded config file, if any.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the logging configuration.
    pub fn logging(&self) -> &LogConfig {
        &self.values.logging
    }

    /// Returns the initial scope contents.
    pub fn scope(&self) -> &ScopeConfig {
        &self.values.scope
    }

    /// Returns `true` if deduplication is enabled.
    pub fn deduplication_enabled(&self) -> bool {
        self.values.deduplication.enabled
    }

    /// Returns the deduplication configuration.
    pub fn deduplication(&self) -> &DeduplicationConfig {
        &self.values.deduplication.config
    }

    /// Returns the sampling configuration, if sampling is enabled.
    pub fn sampling(&self) -> Option<&SamplingConfig> {
        self.values.sampling.as_ref()
    }

    /// Dumps the effective configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.values)
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotWriteFile))
    }
}
