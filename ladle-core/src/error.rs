use thiserror::Error;

/// Structural extraction failures. Field-level problems never surface here;
/// they degrade to an absent or empty value on the record instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No JSON-LD script found in document")]
    NotFound,

    #[error("Invalid JSON-LD: {0}")]
    MalformedJson(String),

    #[error("No Recipe found in JSON-LD")]
    NotARecipe,

    #[error("Recipe is missing a name")]
    MissingName,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnvVar { name: String, value: String },
}
