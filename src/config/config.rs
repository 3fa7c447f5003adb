use crate::config::poll_interval::PollInterval;
use crate::model::{ModelVersionArn, StartRequest, WaitSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WaitConfig {
    poll_interval: PollInterval,
    max_attempts: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        let defaults = WaitSettings::default();
        Self {
            poll_interval: PollInterval::from_secs(defaults.poll_interval.as_secs()),
            max_attempts: defaults.max_attempts,
        }
    }
}

impl WaitConfig {
    fn settings(&self) -> WaitSettings {
        WaitSettings {
            poll_interval: self.poll_interval.duration(),
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    project_arn: String,
    model_arn: String,
    version_name: Option<String>,
    min_inference_units: i32,
    region: Option<String>,
    wait: WaitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_arn: String::new(),
            model_arn: String::new(),
            version_name: None,
            min_inference_units: 1,
            region: None,
            wait: WaitConfig::default(),
        }
    }
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Default, Clone, Debug)]
pub struct ConfigOverrides {
    pub project_arn: Option<String>,
    pub model_arn: Option<String>,
    pub version_name: Option<String>,
    pub min_inference_units: Option<i32>,
    pub region: Option<String>,
    pub poll_interval: Option<PollInterval>,
    pub max_attempts: Option<u32>,
}

/// Configuration after overrides and derivations, ready to run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub request: StartRequest,
    pub region: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config: {0}")]
    Confy(#[from] confy::ConfyError),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Cannot derive the version name from model ARN {0}, set version_name")]
    VersionName(String),
    #[error("wait.max_attempts must be at least 1")]
    NoAttempts,
    #[error("Model {model_arn} does not belong to project {project_arn}")]
    ProjectMismatch {
        model_arn: String,
        project_arn: String,
    },
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Config> {
        match Config::load(path) {
            Ok(cfg) => Some(cfg),
            Err(message) => {
                error!("Failed to load configuration: {}", message);
                None
            }
        }
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        if path.exists() {
            let cfg: Self = confy::load_path(path)?;
            Ok(cfg)
        } else {
            debug!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Ok(Config::default())
        }
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(project_arn) = overrides.project_arn {
            self.project_arn = project_arn;
        }
        if let Some(model_arn) = overrides.model_arn {
            self.model_arn = model_arn;
        }
        if overrides.version_name.is_some() {
            self.version_name = overrides.version_name;
        }
        if let Some(min_inference_units) = overrides.min_inference_units {
            self.min_inference_units = min_inference_units;
        }
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if let Some(poll_interval) = overrides.poll_interval {
            self.wait.poll_interval = poll_interval;
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.wait.max_attempts = max_attempts;
        }
        self
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let project_arn = self.project_arn.trim();
        let model_arn = self.model_arn.trim();
        if project_arn.is_empty() {
            return Err(ConfigError::Missing("project_arn"));
        }
        if model_arn.is_empty() {
            return Err(ConfigError::Missing("model_arn"));
        }
        if self.wait.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        let parsed = ModelVersionArn::parse(model_arn);
        match &parsed {
            Some(arn) if !arn.belongs_to(project_arn) => {
                return Err(ConfigError::ProjectMismatch {
                    model_arn: model_arn.to_string(),
                    project_arn: project_arn.to_string(),
                });
            }
            Some(_) => {}
            None => warn!("Model ARN {} is not in the expected format", model_arn),
        }

        let version_name = match self.version_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => parsed
                .as_ref()
                .map(|arn| arn.version_name.clone())
                .ok_or_else(|| ConfigError::VersionName(model_arn.to_string()))?,
        };
        if let Some(arn) = &parsed
            && arn.version_name != version_name
        {
            warn!(
                "Version name {} differs from the one in model ARN ({})",
                version_name, arn.version_name
            );
        }

        let region = self
            .region
            .clone()
            .or_else(|| parsed.map(|arn| arn.region));

        Ok(ResolvedConfig {
            request: StartRequest {
                project_arn: project_arn.to_string(),
                model_arn: model_arn.to_string(),
                version_name,
                min_inference_units: self.min_inference_units,
                wait: self.wait.settings(),
            },
            region,
        })
    }
}
