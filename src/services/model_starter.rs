use crate::app_error::{RekognitionError, Stage, StartModelError};
use crate::model::{ModelVersionDescription, StartRequest};
use crate::repositories::model_version_repository::ModelVersionRepository;
use std::io::Write;
use tracing::{debug, error, info, warn};

pub struct ModelStarter<R> {
    repository: R,
}

impl<R: ModelVersionRepository> ModelStarter<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Starts the model version, waits for it to run and returns its
    /// descriptions.
    pub async fn start_model(
        &self,
        request: &StartRequest,
    ) -> Result<Vec<ModelVersionDescription>, StartModelError> {
        validate(request).map_err(|source| StartModelError {
            stage: Stage::Start,
            source,
        })?;

        let status = self
            .repository
            .start_model_version(&request.model_arn, request.min_inference_units)
            .await
            .map_err(|source| StartModelError {
                stage: Stage::Start,
                source,
            })?;
        info!(
            "Start accepted for {} (status: {})",
            request.version_name,
            status.map_or_else(|| "unknown".to_string(), |status| status.to_string())
        );

        self.repository
            .wait_until_running(&request.project_arn, &request.version_name, request.wait)
            .await
            .map_err(|source| StartModelError {
                stage: Stage::Wait,
                source,
            })?;

        self.repository
            .describe_model_versions(&request.project_arn, &request.version_name)
            .await
            .map_err(|source| StartModelError {
                stage: Stage::Describe,
                source,
            })
    }

    /// Runs [`Self::start_model`] and writes a human readable report to
    /// `out`. Failures are reported, never raised; the returned result tells
    /// the caller how it went.
    pub async fn run<W: Write>(
        &self,
        request: &StartRequest,
        out: &mut W,
    ) -> Result<Vec<ModelVersionDescription>, StartModelError> {
        report(out, &format!("Starting model: {}", request.model_arn));

        let result = self.start_model(request).await;
        match &result {
            Ok(descriptions) => {
                for description in descriptions {
                    debug!(
                        "{} running with at least {:?} inference units",
                        description.version_arn.as_deref().unwrap_or(&request.model_arn),
                        description.min_inference_units
                    );
                    report(out, &format!("Status: {}", description.status));
                    report(out, &format!("Message: {}", description.status_message));
                }
            }
            Err(err) => {
                error!("Unable to start model {}: {}", request.model_arn, err);
                report(out, &format!("Error: {}", err));
            }
        }

        report(out, "Done...");
        result
    }
}

fn validate(request: &StartRequest) -> Result<(), RekognitionError> {
    if request.min_inference_units < 1 {
        return Err(RekognitionError::rejected(
            "InvalidParameter",
            format!(
                "min_inference_units must be at least 1, got {}",
                request.min_inference_units
            ),
        ));
    }
    for (name, value) in [
        ("project_arn", &request.project_arn),
        ("model_arn", &request.model_arn),
        ("version_name", &request.version_name),
    ] {
        if value.trim().is_empty() {
            return Err(RekognitionError::rejected(
                "InvalidParameter",
                format!("{} cannot be empty", name),
            ));
        }
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        warn!("Failed to write report line: {}", e);
    }
}
