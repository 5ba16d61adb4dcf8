use thiserror::Error;

/// Failures while building the scene. Any of these puts the app in the
/// crash state; construction is only retried through the manual reload.
#[derive(Debug, Error)]
pub enum SceneBuildError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog has no star")]
    MissingStar,

    #[error("catalog has more than one star: {0}")]
    MultipleStars(String),

    #[error("duplicate body identifier: {0}")]
    DuplicateBody(String),

    #[error("body {body} has an invalid colour {value:?}")]
    InvalidColour { body: String, value: String },

    #[error("body {body} has a non-finite or negative {field}")]
    InvalidParameter { body: String, field: &'static str },

    #[error("no 3D camera available for the scene")]
    MissingCamera,
}
