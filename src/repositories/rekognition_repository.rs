use crate::app_error::RekognitionError;
use crate::model::{ModelVersionDescription, ModelVersionStatus};
use crate::repositories::model_version_repository::ModelVersionRepository;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::Client;
use aws_sdk_rekognition::config::Region;
use aws_sdk_rekognition::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// Service error codes that are worth retrying later.
const TRANSIENT_CODES: [&str; 4] = [
    "ThrottlingException",
    "ProvisionedThroughputExceededException",
    "InternalServerError",
    "ServiceUnavailableException",
];

pub struct RekognitionRepository {
    client: Client,
}

impl RekognitionRepository {
    /// Builds a client from the default credential and region chain. An
    /// explicit `region` replaces the one found in the environment.
    pub async fn new(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        debug!(
            "Rekognition client region: {:?}",
            sdk_config.region().map(|region| region.to_string())
        );
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

impl ModelVersionRepository for RekognitionRepository {
    async fn start_model_version(
        &self,
        model_arn: &str,
        min_inference_units: i32,
    ) -> Result<Option<ModelVersionStatus>, RekognitionError> {
        info!("Starting project version: {}", model_arn);
        let output = self
            .client
            .start_project_version()
            .project_version_arn(model_arn)
            .min_inference_units(min_inference_units)
            .send()
            .await
            .map_err(classify)?;
        Ok(output
            .status()
            .map(|status| ModelVersionStatus::from(status.as_str())))
    }

    async fn describe_model_versions(
        &self,
        project_arn: &str,
        version_name: &str,
    ) -> Result<Vec<ModelVersionDescription>, RekognitionError> {
        let output = self
            .client
            .describe_project_versions()
            .project_arn(project_arn)
            .version_names(version_name)
            .send()
            .await
            .map_err(classify)?;

        let descriptions = output
            .project_version_descriptions()
            .iter()
            .map(|description| ModelVersionDescription {
                version_arn: description.project_version_arn().map(str::to_string),
                min_inference_units: description.min_inference_units(),
                ..ModelVersionDescription::new(
                    description
                        .status()
                        .map_or("UNKNOWN", |status| status.as_str()),
                    description.status_message().unwrap_or_default(),
                )
            })
            .collect::<Vec<_>>();
        if descriptions.is_empty() {
            warn!(
                "No project version named {} in {}",
                version_name, project_arn
            );
        }
        Ok(descriptions)
    }
}

fn classify<E, R>(err: SdkError<E, R>) -> RekognitionError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            RekognitionError::Transient(message)
        }
        SdkError::ServiceError(_) => classify_service_error(err.code(), err.message(), &message),
        _ => RekognitionError::rejected("ConstructionFailure", message),
    }
}

/// Maps a service error code onto the transient/permanent split.
fn classify_service_error(
    code: Option<&str>,
    message: Option<&str>,
    fallback: &str,
) -> RekognitionError {
    let message = message.unwrap_or(fallback);
    match code {
        Some(code) if TRANSIENT_CODES.contains(&code) => {
            RekognitionError::Transient(format!("{}: {}", code, message))
        }
        Some(code) => RekognitionError::rejected(code, message),
        None => RekognitionError::rejected("Unknown", message),
    }
}
