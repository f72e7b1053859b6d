use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigField;

/// Everything that can go wrong while producing or checking a frontend
/// deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment `{0}` (expected one of: demo, prod)")]
    UnknownEnvironment(String),

    #[error("configuration field `{field}` is empty")]
    EmptyField { field: ConfigField },

    #[error("configuration field `{field}` is not a valid URL (`{value}`)")]
    InvalidUrl {
        field: ConfigField,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("configuration field `{field}` must be an http(s) URL, got `{value}`")]
    NotHttp { field: ConfigField, value: String },

    #[error("configuration field `{field}` must be a bare domain, got `{value}`")]
    SchemeInDomain { field: ConfigField, value: String },

    #[error("no stack output found for `{field}` (tried keys: {tried})")]
    MissingOutput { field: ConfigField, tried: String },

    #[error(
        "unrecognized stack outputs JSON: expected an Outputs[] array, a describe-stacks \
         document, or a flat key/value object"
    )]
    UnrecognizedOutputsShape,

    #[error("invalid stack outputs or configuration JSON")]
    Json(#[from] serde_json::Error),

    #[error("stack `{stack_name}` not found")]
    StackNotFound { stack_name: String },

    #[error("stack `{stack_name}` has no outputs")]
    NoOutputs { stack_name: String },

    #[error("CloudFormation request for stack `{stack_name}` failed: {message}")]
    CloudFormation { stack_name: String, message: String },

    #[error("failed to write `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
