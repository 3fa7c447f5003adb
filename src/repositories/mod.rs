pub mod model_version_repository;
pub mod rekognition_repository;
