use crate::config::config::ConfigOverrides;
use crate::config::poll_interval::PollInterval;
use clap::Parser;
use std::path::PathBuf;

/// Start a Rekognition Custom Labels model version and wait until it runs.
#[derive(Parser, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v for debug, -vv for trace)"
    )]
    pub verbose: u8,

    /// Path to the YAML configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "CONFIG_PATH",
        default_value = "config.yaml",
        help = "Configuration file path"
    )]
    pub config_path: PathBuf,

    /// ARN of the project owning the model
    #[arg(long, value_name = "ARN")]
    pub project_arn: Option<String>,

    /// ARN of the model version to start
    #[arg(long, value_name = "ARN")]
    pub model_arn: Option<String>,

    /// Version name, derived from the model ARN when omitted
    #[arg(long)]
    pub version_name: Option<String>,

    /// Minimum number of inference units to provision
    #[arg(long, value_name = "UNITS")]
    pub min_inference_units: Option<i32>,

    /// AWS region, derived from the model ARN when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// Delay between status polls, e.g. 30s or 1m
    #[arg(long, value_name = "INTERVAL")]
    pub poll_interval: Option<PollInterval>,

    /// Number of status polls before giving up
    #[arg(long, value_name = "COUNT")]
    pub max_attempts: Option<u32>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_arn: self.project_arn.clone(),
            model_arn: self.model_arn.clone(),
            version_name: self.version_name.clone(),
            min_inference_units: self.min_inference_units,
            region: self.region.clone(),
            poll_interval: self.poll_interval,
            max_attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "rekognition_model_starter",
            "-vv",
            "--model-arn",
            "model",
            "--min-inference-units",
            "2",
            "--poll-interval",
            "1m",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_path, PathBuf::from("config.yaml"));

        let overrides = cli.overrides();
        assert_eq!(overrides.model_arn.as_deref(), Some("model"));
        assert_eq!(overrides.project_arn, None);
        assert_eq!(overrides.min_inference_units, Some(2));
        assert_eq!(
            overrides.poll_interval.map(|interval| interval.duration()),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn rejects_bad_interval() {
        assert!(
            Cli::try_parse_from(["rekognition_model_starter", "--poll-interval", "soon"]).is_err()
        );
    }
}
