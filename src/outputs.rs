//! Stack outputs, as published by the provisioning stack.
//!
//! Every value in the frontend module is copied from a stack output;
//! the module's own header documents the command that lists them:
//! `aws cloudformation describe-stacks --stack-name <NAME> --query
//! "Stacks[0].Outputs[]"`. This module parses that JSON (and the
//! equivalent `pulumi stack output --json` form) and resolves the four
//! configuration fields from it.

use serde::Deserialize;
use tracing::debug;

use crate::config::{ConfigField, DeploymentConfig};
use crate::errors::ConfigError;

/// One entry of a stack's `Outputs[]` array.
#[derive(Debug, Clone, Deserialize)]
pub struct StackOutput {
    #[serde(rename = "OutputKey")]
    pub key: String,
    #[serde(rename = "OutputValue")]
    pub value: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeStacksDocument {
    #[serde(rename = "Stacks", default)]
    stacks: Vec<StackDocument>,
}

#[derive(Debug, Deserialize)]
struct StackDocument {
    #[serde(rename = "Outputs", default)]
    outputs: Vec<StackOutput>,
}

/// Ordered list of stack outputs with key lookup.
#[derive(Debug, Clone, Default)]
pub struct StackOutputs {
    entries: Vec<StackOutput>,
}

impl StackOutputs {
    pub fn new(entries: Vec<StackOutput>) -> Self {
        Self { entries }
    }

    /// Parse stack outputs from JSON.
    ///
    /// Accepts the `--query "Stacks[0].Outputs[]"` array form, the full
    /// `describe-stacks` document (first stack taken), and the flat
    /// object `pulumi stack output --json` prints.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_array() {
            let entries: Vec<StackOutput> = serde_json::from_value(value)?;
            return Ok(Self::new(entries));
        }

        let serde_json::Value::Object(map) = value else {
            return Err(ConfigError::UnrecognizedOutputsShape);
        };

        if map.contains_key("Stacks") {
            let document: DescribeStacksDocument =
                serde_json::from_value(serde_json::Value::Object(map))?;
            let outputs = document
                .stacks
                .into_iter()
                .next()
                .map(|stack| stack.outputs)
                .unwrap_or_default();
            return Ok(Self::new(outputs));
        }

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                serde_json::Value::String(value) => entries.push(StackOutput {
                    key,
                    value,
                    description: None,
                }),
                other => {
                    debug!(key = %key, value = %other, "skipping non-string stack output");
                }
            }
        }
        Ok(Self::new(entries))
    }

    /// Value of the first output with this key, in entry order.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackOutput> {
        self.entries.iter()
    }

    /// Resolve one configuration field to the output entry it is copied
    /// from.
    ///
    /// Keys are tried in [`ConfigField::output_keys`] order; the first
    /// present key wins. A present-but-empty value is an error rather
    /// than a reason to fall through: it means the stack published a
    /// blank value and someone should look at the stack, not at the
    /// next alias.
    pub fn resolve_entry(&self, field: ConfigField) -> Result<&StackOutput, ConfigError> {
        for &key in field.output_keys() {
            if let Some(entry) = self.entries.iter().find(|entry| entry.key == key) {
                if entry.value.trim().is_empty() {
                    return Err(ConfigError::EmptyField { field });
                }
                debug!(field = %field, key, "resolved configuration field");
                return Ok(entry);
            }
        }
        Err(ConfigError::MissingOutput {
            field,
            tried: field.output_keys().join(", "),
        })
    }

    /// Resolved value of one configuration field.
    pub fn resolve(&self, field: ConfigField) -> Result<&str, ConfigError> {
        self.resolve_entry(field).map(|entry| entry.value.as_str())
    }

    /// Build a validated frontend configuration from the outputs.
    pub fn to_config(&self) -> Result<DeploymentConfig, ConfigError> {
        let config = DeploymentConfig {
            aws_user_pools_web_client_id: self.resolve(ConfigField::WebClientId)?.to_string(),
            api_base_url: self.resolve(ConfigField::ApiBaseUrl)?.to_string(),
            cognito_hosted_domain: self.resolve(ConfigField::HostedDomain)?.to_string(),
            redirect_url: self.resolve(ConfigField::RedirectUrl)?.to_string(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY_ARRAY: &str = r#"[
        {"OutputKey": "CognitoClientID", "OutputValue": "52aa1kjic2qov77lust8e083j1", "Description": "User pool client"},
        {"OutputKey": "TodoFunctionApi", "OutputValue": "https://4co7f9mc5l.execute-api.eu-west-1.amazonaws.com/prod"},
        {"OutputKey": "CognitoDomainName", "OutputValue": "mytodoappdemo-demo-dsarkisov.auth.eu-west-1.amazoncognito.com"},
        {"OutputKey": "AmplifyURL", "OutputValue": "https://master.d11aett0uxdeod.amplifyapp.com"},
        {"OutputKey": "CognitoUserPoolId", "OutputValue": "eu-west-1_GKAB5SLp1"}
    ]"#;

    #[test]
    fn parses_outputs_query_array() {
        let outputs = StackOutputs::from_json(QUERY_ARRAY).unwrap();
        assert_eq!(outputs.len(), 5);
        assert_eq!(
            outputs.get("CognitoClientID"),
            Some("52aa1kjic2qov77lust8e083j1")
        );
        assert_eq!(outputs.get("NoSuchKey"), None);
    }

    #[test]
    fn parses_describe_stacks_document() {
        let json = format!(r#"{{"Stacks": [{{"StackName": "todo-prod", "Outputs": {QUERY_ARRAY}}}]}}"#);
        let outputs = StackOutputs::from_json(&json).unwrap();
        assert_eq!(outputs.len(), 5);
        assert_eq!(
            outputs.get("TodoFunctionApi"),
            Some("https://4co7f9mc5l.execute-api.eu-west-1.amazonaws.com/prod")
        );
    }

    #[test]
    fn parses_pulumi_flat_object() {
        let json = r#"{
            "aws_user_pools_web_client_id": "52aa1kjic2qov77lust8e083j1",
            "cognito_custom_domain": "mytodoappdemo-demo-dsarkisov.auth.eu-west-1.amazoncognito.com",
            "aws_user_pool_id": "eu-west-1_GKAB5SLp1"
        }"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        assert_eq!(
            outputs.resolve(ConfigField::WebClientId).unwrap(),
            "52aa1kjic2qov77lust8e083j1"
        );
        assert_eq!(
            outputs.resolve(ConfigField::HostedDomain).unwrap(),
            "mytodoappdemo-demo-dsarkisov.auth.eu-west-1.amazoncognito.com"
        );
    }

    #[test]
    fn skips_non_string_pulumi_values() {
        let json = r#"{"api_base_url": "https://example.com/demo", "table_read_capacity": 20}"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs.get("table_read_capacity"), None);
    }

    #[test]
    fn cloudformation_key_takes_precedence_over_aliases() {
        let json = r#"[
            {"OutputKey": "aws_user_pools_web_client_id", "OutputValue": "from-alias"},
            {"OutputKey": "CognitoClientID", "OutputValue": "from-cloudformation"}
        ]"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        let entry = outputs.resolve_entry(ConfigField::WebClientId).unwrap();
        assert_eq!(entry.key, "CognitoClientID");
        assert_eq!(entry.value, "from-cloudformation");
    }

    #[test]
    fn resolves_pulumi_program_export_names() {
        // The deploy programs export these instead of the
        // CloudFormation template's output names.
        let json = r#"{
            "backend_invoke_url": "https://wei0nwxrn7.execute-api.eu-west-1.amazonaws.com/demo",
            "website_url": "https://d2yz9tmsmkmhkx.cloudfront.net",
            "stage_name": "demo"
        }"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        assert_eq!(
            outputs.resolve(ConfigField::ApiBaseUrl).unwrap(),
            "https://wei0nwxrn7.execute-api.eu-west-1.amazonaws.com/demo"
        );
        assert_eq!(
            outputs.resolve(ConfigField::RedirectUrl).unwrap(),
            "https://d2yz9tmsmkmhkx.cloudfront.net"
        );
    }

    #[test]
    fn missing_field_error_names_the_tried_keys() {
        let outputs = StackOutputs::from_json("[]").unwrap();
        let err = outputs.resolve(ConfigField::ApiBaseUrl).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("api_base_url"));
        assert!(message.contains("TodoFunctionApi"));
    }

    #[test]
    fn present_but_empty_value_is_an_error() {
        let json = r#"[
            {"OutputKey": "AmplifyURL", "OutputValue": ""},
            {"OutputKey": "redirect_url", "OutputValue": "https://master.d11aett0uxdeod.amplifyapp.com"}
        ]"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        assert!(matches!(
            outputs.resolve(ConfigField::RedirectUrl),
            Err(ConfigError::EmptyField {
                field: ConfigField::RedirectUrl
            })
        ));
    }

    #[test]
    fn to_config_builds_a_validated_config() {
        let outputs = StackOutputs::from_json(QUERY_ARRAY).unwrap();
        let config = outputs.to_config().unwrap();
        assert_eq!(config, DeploymentConfig::prod());
    }

    #[test]
    fn to_config_surfaces_validation_failures() {
        let json = r#"[
            {"OutputKey": "CognitoClientID", "OutputValue": "client"},
            {"OutputKey": "TodoFunctionApi", "OutputValue": "not a url"},
            {"OutputKey": "CognitoDomainName", "OutputValue": "auth.example.com"},
            {"OutputKey": "AmplifyURL", "OutputValue": "https://example.com"}
        ]"#;
        let outputs = StackOutputs::from_json(json).unwrap();
        assert!(matches!(
            outputs.to_config(),
            Err(ConfigError::InvalidUrl {
                field: ConfigField::ApiBaseUrl,
                ..
            })
        ));
    }

    #[test]
    fn rejects_scalar_json() {
        assert!(matches!(
            StackOutputs::from_json("42"),
            Err(ConfigError::UnrecognizedOutputsShape)
        ));
    }
}
