use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use twentyq_core::game::config::EngineConfig;

const DEFAULT_ROUNDS: usize = 1;
const DEFAULT_FLIP_RATE: f64 = 0.1;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    pub responders: Vec<ResponderConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.sessions.validate()?;
        self.engine.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_responders(&mut self.responders)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// How many sessions to play and how to seed them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionsConfig {
    pub seed: Option<u64>,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
}

impl SessionsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "sessions.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

/// Guessing policy under test. Omitted fields use the engine defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineSection {
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: i32,
    #[serde(default = "default_min_questions")]
    pub min_questions: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            confirm_threshold: default_confirm_threshold(),
            min_questions: default_min_questions(),
        }
    }
}

impl EngineSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.confirm_threshold <= 0 {
            return Err(ValidationError::InvalidField {
                field: "engine.confirm_threshold".to_string(),
                message: "confirm threshold must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.confirm_threshold, self.min_questions)
    }
}

fn default_confirm_threshold() -> i32 {
    EngineConfig::default().confirm_threshold
}

fn default_min_questions() -> usize {
    EngineConfig::default().min_questions_before_guess
}

/// Definition of a simulated player.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResponderConfig {
    pub name: String,
    pub kind: ResponderKindConfig,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl ResponderConfig {
    pub fn flip_rate(&self) -> Result<f64, ValidationError> {
        let Some(raw) = self.params.get("flip_rate") else {
            return Ok(DEFAULT_FLIP_RATE);
        };
        let rate = raw.as_f64().ok_or_else(|| ValidationError::InvalidField {
            field: format!("responders[{}].params.flip_rate", self.name),
            message: "flip_rate must be a number".to_string(),
        })?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ValidationError::InvalidField {
                field: format!("responders[{}].params.flip_rate", self.name),
                message: "flip_rate must lie between 0 and 1".to_string(),
            });
        }
        Ok(rate)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponderKindConfig {
    Oracle,
    Noisy,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_responders(responders: &mut [ResponderConfig]) -> Result<(), ValidationError> {
    if responders.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "responders".to_string(),
            message: "at least one responder must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for responder in responders.iter_mut() {
        if responder.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "responders.name".to_string(),
                message: "responder name must not be empty".to_string(),
            });
        }

        if !responder.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("responders[{}].name", responder.name),
                message: "responder name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(responder.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "responders".to_string(),
                message: format!("responder name '{}' defined more than once", responder.name),
            });
        }

        if responder.params.is_null() {
            responder.params = serde_yaml::Value::Mapping(Default::default());
        }

        if responder.kind == ResponderKindConfig::Noisy {
            responder.flip_rate()?;
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
