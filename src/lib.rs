//! Deployment configuration for the serverless todo app frontend.
//!
//! The frontend is configured by a tiny generated module holding four
//! values published by the provisioning stack: the Cognito user pool
//! client id, the API base URL, the hosted login domain, and the
//! redirect URL. This crate embeds the records of the two deployed
//! environments, parses stack outputs (CloudFormation or Pulumi form),
//! resolves and validates the four fields, and renders the frontend
//! `config.js` module.

pub mod cloudformation;
pub mod config;
pub mod environment;
pub mod errors;
pub mod outputs;
pub mod render;

pub use config::{ConfigField, DeploymentConfig};
pub use environment::Environment;
pub use errors::ConfigError;
pub use outputs::{StackOutput, StackOutputs};
