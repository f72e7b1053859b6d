use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::environment::Environment;
use crate::errors::ConfigError;

/// The four fields of a [`DeploymentConfig`], in the order the frontend
/// module lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    WebClientId,
    ApiBaseUrl,
    HostedDomain,
    RedirectUrl,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::WebClientId,
        ConfigField::ApiBaseUrl,
        ConfigField::HostedDomain,
        ConfigField::RedirectUrl,
    ];

    /// The key the field is published under in the frontend module.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::WebClientId => "aws_user_pools_web_client_id",
            ConfigField::ApiBaseUrl => "api_base_url",
            ConfigField::HostedDomain => "cognito_hosted_domain",
            ConfigField::RedirectUrl => "redirect_url",
        }
    }

    /// Stack output keys the field is copied from, in resolution order.
    ///
    /// The first entry is the CloudFormation output name; the rest are
    /// the names the Pulumi programs export the same value under.
    pub fn output_keys(&self) -> &'static [&'static str] {
        match self {
            ConfigField::WebClientId => &["CognitoClientID", "aws_user_pools_web_client_id"],
            ConfigField::ApiBaseUrl => &["TodoFunctionApi", "backend_invoke_url", "api_base_url"],
            ConfigField::HostedDomain => &[
                "CognitoDomainName",
                "cognito_custom_domain",
                "cognito_hosted_domain",
            ],
            ConfigField::RedirectUrl => &["AmplifyURL", "website_url", "redirect_url"],
        }
    }

    /// CloudFormation output name, used to annotate generated modules.
    pub fn cloudformation_key(&self) -> &'static str {
        self.output_keys()[0]
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-environment frontend configuration, shaped exactly like the
/// `config.js` module the frontend imports.
///
/// Field names double as the serialized keys, so the wire shape needs
/// no rename attributes. Instances are immutable once built; the two
/// deployed environments are embedded as constants and never merged or
/// mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Identity-provider client identifier for the deployed environment.
    pub aws_user_pools_web_client_id: String,
    /// Base URL of the backend API endpoint for this environment.
    pub api_base_url: String,
    /// Hosted authentication domain used for login/redirect flows.
    pub cognito_hosted_domain: String,
    /// URL the authentication provider redirects back to after login.
    pub redirect_url: String,
}

impl DeploymentConfig {
    /// Configuration published for the demo stack.
    ///
    /// The redirect URL is the S3 website host, published without a
    /// scheme, and is kept verbatim.
    pub fn demo() -> Self {
        Self {
            aws_user_pools_web_client_id: "eu-west-1_GKAB5SLp1".to_string(),
            api_base_url: "https://wei0nwxrn7.execute-api.eu-west-1.amazonaws.com/demo"
                .to_string(),
            cognito_hosted_domain: "mytodoappdemo-demo-dsarkisov.auth.eu-west-1.amazoncognito.com"
                .to_string(),
            redirect_url: "todoapifrontendbucket-0f1d5cc.s3-website-eu-west-1.amazonaws.com"
                .to_string(),
        }
    }

    /// Configuration published for the prod stack.
    pub fn prod() -> Self {
        Self {
            aws_user_pools_web_client_id: "52aa1kjic2qov77lust8e083j1".to_string(),
            api_base_url: "https://4co7f9mc5l.execute-api.eu-west-1.amazonaws.com/prod"
                .to_string(),
            cognito_hosted_domain: "mytodoappdemo-demo-dsarkisov.auth.eu-west-1.amazoncognito.com"
                .to_string(),
            redirect_url: "https://master.d11aett0uxdeod.amplifyapp.com".to_string(),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Demo => Self::demo(),
            Environment::Prod => Self::prod(),
        }
    }

    /// Field value by field.
    pub fn field(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::WebClientId => &self.aws_user_pools_web_client_id,
            ConfigField::ApiBaseUrl => &self.api_base_url,
            ConfigField::HostedDomain => &self.cognito_hosted_domain,
            ConfigField::RedirectUrl => &self.redirect_url,
        }
    }

    /// Check that the record is usable by the frontend.
    ///
    /// Every field must be non-empty. The API base URL must be an
    /// absolute http(s) URL since clients join request paths onto it.
    /// The hosted domain must be a bare domain; pasting the full login
    /// URL there is a recurring copy mistake. The redirect URL is only
    /// required to be non-empty: S3 website endpoints are published
    /// without a scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in ConfigField::ALL {
            if self.field(field).trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }

        match Url::parse(&self.api_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => {
                return Err(ConfigError::NotHttp {
                    field: ConfigField::ApiBaseUrl,
                    value: self.api_base_url.clone(),
                });
            }
            Err(source) => {
                return Err(ConfigError::InvalidUrl {
                    field: ConfigField::ApiBaseUrl,
                    value: self.api_base_url.clone(),
                    source,
                });
            }
        }

        if self.cognito_hosted_domain.contains("://") {
            return Err(ConfigError::SchemeInDomain {
                field: ConfigField::HostedDomain,
                value: self.cognito_hosted_domain.clone(),
            });
        }

        Ok(())
    }
}
