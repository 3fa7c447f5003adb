use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

static MODEL_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>[^:]+):rekognition:(?P<region>[^:]+):(?P<account>\d{12}):project/(?P<project>[^/]+)/version/(?P<version>[^/]+)/\d+$",
    )
    .expect("hard‑coded regex should always compile")
});

static PROJECT_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>[^:]+):rekognition:(?P<region>[^:]+):(?P<account>\d{12}):project/(?P<project>[^/]+)/\d+$",
    )
    .expect("hard‑coded regex should always compile")
});

/// Lifecycle status of a project version as reported by Rekognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelVersionStatus {
    TrainingInProgress,
    TrainingCompleted,
    TrainingFailed,
    Starting,
    Running,
    Failed,
    Stopping,
    Stopped,
    Deleting,
    CopyingInProgress,
    CopyingCompleted,
    CopyingFailed,
    Deprecated,
    Expired,
    Unknown(String),
}

impl ModelVersionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ModelVersionStatus::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModelVersionStatus::Failed)
    }
}

impl From<&str> for ModelVersionStatus {
    fn from(value: &str) -> Self {
        match value {
            "TRAINING_IN_PROGRESS" => Self::TrainingInProgress,
            "TRAINING_COMPLETED" => Self::TrainingCompleted,
            "TRAINING_FAILED" => Self::TrainingFailed,
            "STARTING" => Self::Starting,
            "RUNNING" => Self::Running,
            "FAILED" => Self::Failed,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "DELETING" => Self::Deleting,
            "COPYING_IN_PROGRESS" => Self::CopyingInProgress,
            "COPYING_COMPLETED" => Self::CopyingCompleted,
            "COPYING_FAILED" => Self::CopyingFailed,
            "DEPRECATED" => Self::Deprecated,
            "EXPIRED" => Self::Expired,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl Display for ModelVersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ModelVersionStatus::TrainingInProgress => "TRAINING_IN_PROGRESS",
            ModelVersionStatus::TrainingCompleted => "TRAINING_COMPLETED",
            ModelVersionStatus::TrainingFailed => "TRAINING_FAILED",
            ModelVersionStatus::Starting => "STARTING",
            ModelVersionStatus::Running => "RUNNING",
            ModelVersionStatus::Failed => "FAILED",
            ModelVersionStatus::Stopping => "STOPPING",
            ModelVersionStatus::Stopped => "STOPPED",
            ModelVersionStatus::Deleting => "DELETING",
            ModelVersionStatus::CopyingInProgress => "COPYING_IN_PROGRESS",
            ModelVersionStatus::CopyingCompleted => "COPYING_COMPLETED",
            ModelVersionStatus::CopyingFailed => "COPYING_FAILED",
            ModelVersionStatus::Deprecated => "DEPRECATED",
            ModelVersionStatus::Expired => "EXPIRED",
            ModelVersionStatus::Unknown(other) => other,
        };
        write!(f, "{}", str)
    }
}

/// One entry of a `DescribeProjectVersions` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVersionDescription {
    pub status: ModelVersionStatus,
    pub status_message: String,
    pub version_arn: Option<String>,
    pub min_inference_units: Option<i32>,
}

impl ModelVersionDescription {
    pub fn new(status: impl Into<ModelVersionStatus>, status_message: impl ToString) -> Self {
        Self {
            status: status.into(),
            status_message: status_message.to_string(),
            version_arn: None,
            min_inference_units: None,
        }
    }
}

/// Components of a model version ARN, e.g.
/// `arn:aws:rekognition:us-east-1:123456789012:project/my-project/version/my-version/1651937613900`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVersionArn {
    pub partition: String,
    pub region: String,
    pub account: String,
    pub project_name: String,
    pub version_name: String,
}

impl ModelVersionArn {
    pub fn parse(arn: &str) -> Option<Self> {
        let caps = MODEL_ARN.captures(arn)?;
        Some(Self {
            partition: caps["partition"].to_string(),
            region: caps["region"].to_string(),
            account: caps["account"].to_string(),
            project_name: caps["project"].to_string(),
            version_name: caps["version"].to_string(),
        })
    }

    /// Whether `project_arn` names the project that owns this version.
    /// Project ARNs that cannot be parsed are not judged.
    pub fn belongs_to(&self, project_arn: &str) -> bool {
        let Some(caps) = PROJECT_ARN.captures(project_arn) else {
            return true;
        };
        caps["partition"] == self.partition
            && caps["region"] == self.region
            && caps["account"] == self.account
            && caps["project"] == self.project_name
    }
}

/// Everything needed for one start attempt.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub project_arn: String,
    pub model_arn: String,
    pub version_name: String,
    pub min_inference_units: i32,
    pub wait: WaitSettings,
}

/// Polling behaviour of the running-state waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub poll_interval: std::time::Duration,
    pub max_attempts: u32,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval: std::time::Duration::from_secs(30),
            max_attempts: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "arn:aws:rekognition:us-east-1:650528715408:project/construction-object-recognition-v3/version/constr-obj-rek-1000_v4-v2/1651937613900";
    const PROJECT: &str =
        "arn:aws:rekognition:us-east-1:650528715408:project/construction-object-recognition-v3/1651935590277";

    #[test]
    fn status_names_are_symmetric() {
        for name in ["RUNNING", "STARTING", "FAILED", "TRAINING_COMPLETED", "EXPIRED"] {
            let status = ModelVersionStatus::from(name);
            assert!(!matches!(status, ModelVersionStatus::Unknown(_)));
            assert_eq!(status.to_string(), name);
        }
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = ModelVersionStatus::from("HIBERNATING");
        assert_eq!(status, ModelVersionStatus::Unknown("HIBERNATING".to_string()));
        assert_eq!(status.to_string(), "HIBERNATING");
        assert!(!status.is_running());
    }

    #[test]
    fn parses_model_arn() {
        let arn = ModelVersionArn::parse(MODEL).unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account, "650528715408");
        assert_eq!(arn.project_name, "construction-object-recognition-v3");
        assert_eq!(arn.version_name, "constr-obj-rek-1000_v4-v2");
        assert!(arn.belongs_to(PROJECT));
    }

    #[test]
    fn detects_foreign_project() {
        let arn = ModelVersionArn::parse(MODEL).unwrap();
        assert!(!arn.belongs_to(
            "arn:aws:rekognition:us-east-1:650528715408:project/other-project/1651935590277"
        ));
        assert!(!arn.belongs_to(
            "arn:aws:rekognition:eu-west-1:650528715408:project/construction-object-recognition-v3/1651935590277"
        ));
    }

    #[test]
    fn rejects_project_arn_as_model_arn() {
        assert!(ModelVersionArn::parse(PROJECT).is_none());
        assert!(ModelVersionArn::parse("not-an-arn").is_none());
    }
}
