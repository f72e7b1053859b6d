use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::{
    config::Region,
    error::SdkError,
    operation::describe_stacks::{DescribeStacksError, DescribeStacksOutput},
};
use tracing::debug;

use crate::errors::ConfigError;
use crate::outputs::{StackOutput, StackOutputs};

// CloudFormation stack output fetching.
// --------------------------------------------------

pub struct StackOutputsFetcher<ClientImpl: CloudFormationClient> {
    client: ClientImpl,
}

impl StackOutputsFetcher<aws_sdk_cloudformation::Client> {
    /// Connect using the shared AWS config, optionally overriding the
    /// region the stack was deployed to.
    pub async fn new(region: Option<String>) -> StackOutputsFetcher<aws_sdk_cloudformation::Client> {
        let mut loader = aws_config::defaults(BehaviorVersion::v2024_03_28());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared_config = loader.load().await;
        let client = aws_sdk_cloudformation::Client::new(&shared_config);
        Self { client }
    }
}

impl<ClientImpl: CloudFormationClient> StackOutputsFetcher<ClientImpl> {
    /// Fetch the outputs of a deployed stack.
    pub async fn fetch(&self, stack_name: &str) -> Result<StackOutputs, ConfigError> {
        debug!(stack_name, "describing stack");

        let response = self
            .client
            .describe_stacks(stack_name)
            .await
            .map_err(|e| ConfigError::CloudFormation {
                stack_name: stack_name.to_string(),
                message: e.to_string(),
            })?;

        let stack = response
            .stacks()
            .first()
            .ok_or_else(|| ConfigError::StackNotFound {
                stack_name: stack_name.to_string(),
            })?;

        let outputs: Vec<StackOutput> = stack
            .outputs()
            .iter()
            .filter_map(|output| {
                Some(StackOutput {
                    key: output.output_key()?.to_string(),
                    value: output.output_value()?.to_string(),
                    description: output.description().map(str::to_string),
                })
            })
            .collect();

        if outputs.is_empty() {
            return Err(ConfigError::NoOutputs {
                stack_name: stack_name.to_string(),
            });
        }

        debug!(stack_name, count = outputs.len(), "collected stack outputs");
        Ok(StackOutputs::new(outputs))
    }
}

// CloudFormationClient trait implementation.
//
// We wrap the regular CloudFormation client in a custom
// trait so that we can mock it in tests.
// --------------------------------------------------

#[async_trait]
pub trait CloudFormationClient {
    async fn describe_stacks(
        &self,
        stack_name: &str,
    ) -> Result<DescribeStacksOutput, SdkError<DescribeStacksError>>;
}

// Real client implementation.
#[async_trait]
impl CloudFormationClient for aws_sdk_cloudformation::Client {
    async fn describe_stacks(
        &self,
        stack_name: &str,
    ) -> Result<DescribeStacksOutput, SdkError<DescribeStacksError>> {
        self.describe_stacks().stack_name(stack_name).send().await
    }
}

// Tests.
// --------------------------------------------------
