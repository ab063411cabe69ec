use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApidogError {
    #[error("Failed to load scenario file: {0}")]
    ScenarioLoadError(String),

    #[error("Failed to load Apidog collection: {0}")]
    CollectionLoadError(String),

    #[error("Failed to load test case file: {0}")]
    TestCaseLoadError(String),

    #[error("Failed to load OpenAPI file: {0}")]
    OpenApiLoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Step lookup failed: {0}")]
    StepLookupError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApidogError>;
