use crate::app_error::RekognitionError;
use crate::model::{ModelVersionDescription, ModelVersionStatus, WaitSettings};
use tokio::time::sleep;
use tracing::{debug, error};

/// Remote operations on custom-label model versions.
pub trait ModelVersionRepository {
    /// Requests the version to start. Returns as soon as the request is
    /// accepted, with the status reported by the service if any.
    async fn start_model_version(
        &self,
        model_arn: &str,
        min_inference_units: i32,
    ) -> Result<Option<ModelVersionStatus>, RekognitionError>;

    async fn describe_model_versions(
        &self,
        project_arn: &str,
        version_name: &str,
    ) -> Result<Vec<ModelVersionDescription>, RekognitionError>;

    /// Polls until every described version is `RUNNING`. Stops early when one
    /// of them is `FAILED` or when describing fails. Describes at least once,
    /// even when `max_attempts` is 0.
    async fn wait_until_running(
        &self,
        project_arn: &str,
        version_name: &str,
        wait: WaitSettings,
    ) -> Result<(), RekognitionError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let descriptions = self
                .describe_model_versions(project_arn, version_name)
                .await?;

            if let Some(failed) = descriptions.iter().find(|d| d.status.is_failed()) {
                error!(
                    "Model version {} failed to start: {}",
                    version_name, failed.status_message
                );
                return Err(RekognitionError::StartFailed {
                    version_name: version_name.to_string(),
                    message: failed.status_message.clone(),
                });
            }

            if !descriptions.is_empty() && descriptions.iter().all(|d| d.status.is_running()) {
                debug!("Model version {} running after {} polls", version_name, attempt);
                return Ok(());
            }

            if attempt >= wait.max_attempts {
                return Err(RekognitionError::Timeout {
                    version_name: version_name.to_string(),
                    attempts: attempt,
                    waited: wait.poll_interval * attempt.saturating_sub(1),
                });
            }

            debug!(
                "Model version {} not running yet (poll {}/{}): {:?}",
                version_name,
                attempt,
                wait.max_attempts,
                descriptions
                    .iter()
                    .map(|d| d.status.to_string())
                    .collect::<Vec<_>>()
            );
            sleep(wait.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays one describe response per poll; the last one repeats.
    struct ScriptedDescribe {
        responses: Mutex<VecDeque<Result<Vec<ModelVersionDescription>, RekognitionError>>>,
        polls: Mutex<u32>,
    }

    impl ScriptedDescribe {
        fn new(
            responses: Vec<Result<Vec<ModelVersionDescription>, RekognitionError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                polls: Mutex::new(0),
            }
        }

        fn polls(&self) -> u32 {
            *self.polls.lock().unwrap()
        }
    }

    impl ModelVersionRepository for ScriptedDescribe {
        async fn start_model_version(
            &self,
            _model_arn: &str,
            _min_inference_units: i32,
        ) -> Result<Option<ModelVersionStatus>, RekognitionError> {
            Ok(Some(ModelVersionStatus::Starting))
        }

        async fn describe_model_versions(
            &self,
            _project_arn: &str,
            _version_name: &str,
        ) -> Result<Vec<ModelVersionDescription>, RekognitionError> {
            *self.polls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            }
        }
    }

    fn fast(max_attempts: u32) -> WaitSettings {
        WaitSettings {
            poll_interval: Duration::ZERO,
            max_attempts,
        }
    }

    fn described(status: &str) -> Vec<ModelVersionDescription> {
        vec![ModelVersionDescription::new(status, format!("{status} message"))]
    }

    #[tokio::test]
    async fn returns_once_running() {
        let repo = ScriptedDescribe::new(vec![
            Ok(described("STARTING")),
            Ok(described("STARTING")),
            Ok(described("RUNNING")),
        ]);
        repo.wait_until_running("project", "v1", fast(10)).await.unwrap();
        assert_eq!(repo.polls(), 3);
    }

    #[tokio::test]
    async fn failed_status_stops_polling() {
        let repo = ScriptedDescribe::new(vec![
            Ok(described("STARTING")),
            Ok(described("FAILED")),
        ]);
        let err = repo
            .wait_until_running("project", "v1", fast(10))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RekognitionError::StartFailed {
                version_name: "v1".to_string(),
                message: "FAILED message".to_string(),
            }
        );
        assert_eq!(repo.polls(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let repo = ScriptedDescribe::new(vec![Ok(described("STARTING"))]);
        let err = repo
            .wait_until_running("project", "v1", fast(4))
            .await
            .unwrap_err();
        assert!(matches!(err, RekognitionError::Timeout { attempts: 4, .. }));
        assert_eq!(repo.polls(), 4);
    }

    #[tokio::test]
    async fn empty_result_keeps_polling() {
        let repo = ScriptedDescribe::new(vec![Ok(vec![]), Ok(described("RUNNING"))]);
        repo.wait_until_running("project", "v1", fast(3)).await.unwrap();
        assert_eq!(repo.polls(), 2);
    }

    #[tokio::test]
    async fn every_version_must_be_running() {
        let repo = ScriptedDescribe::new(vec![Ok(vec![
            ModelVersionDescription::new("RUNNING", "ok"),
            ModelVersionDescription::new("STARTING", "starting"),
        ])]);
        let err = repo
            .wait_until_running("project", "v1", fast(2))
            .await
            .unwrap_err();
        assert!(matches!(err, RekognitionError::Timeout { .. }));
    }

    #[tokio::test]
    async fn describe_error_aborts_wait() {
        let repo = ScriptedDescribe::new(vec![
            Ok(described("STARTING")),
            Err(RekognitionError::Transient("connection reset".to_string())),
        ]);
        let err = repo
            .wait_until_running("project", "v1", fast(10))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RekognitionError::Transient("connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn zero_attempts_still_describes_once() {
        let repo = ScriptedDescribe::new(vec![Ok(described("STARTING"))]);
        let err = repo
            .wait_until_running("project", "v1", fast(0))
            .await
            .unwrap_err();
        assert!(matches!(err, RekognitionError::Timeout { attempts: 1, .. }));
        assert_eq!(repo.polls(), 1);
    }
}
