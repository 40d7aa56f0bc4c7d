// Enumeration through the AWS command line interface.
//
// Every listing is one child process, run in sequence. Credentials, profile
// and region resolution are left to the CLI and its environment.

use crate::dataset::{
    ApiGatewayApi, CloudFrontDistribution, CognitoUserPool, DiscoveryDataset, IamPrincipals,
    NetworkingInventory,
};
use crate::error::{DiscoveryError, Result};
use crate::source::ResourceSource;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

/// Invoked with a short description of each listing call before it runs.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub struct AwsCliSource {
    program: String,
    profile: Option<String>,
    region: Option<String>,
    progress_callback: Option<ProgressCallback>,
}

impl Default for AwsCliSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsCliSource {
    pub fn new() -> Self {
        Self {
            program: "aws".to_string(),
            profile: None,
            region: None,
            progress_callback: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Full argument vector for one listing call, without the program name.
    pub fn command_args(&self, call: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = call.iter().map(|s| s.to_string()).collect();
        args.extend(["--output", "json", "--no-paginate"].map(String::from));
        if let Some(ref profile) = self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(ref region) = self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        args
    }

    async fn call<T>(&self, call: &[&str]) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let label = call.join(" ");
        if let Some(ref callback) = self.progress_callback {
            callback(&label);
        }

        let args = self.command_args(call);
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| DiscoveryError::SpawnError {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DiscoveryError::CommandFailed {
                command: format!("{} {}", self.program, label),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Some services print nothing at all for an empty account.
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice(&output.stdout).map_err(|source| DiscoveryError::ParseError {
            command: format!("{} {}", self.program, label),
            source,
        })
    }
}

impl ResourceSource for AwsCliSource {
    fn describe(&self) -> String {
        match (&self.profile, &self.region) {
            (Some(profile), Some(region)) => format!("AWS CLI (profile {profile}, {region})"),
            (Some(profile), None) => format!("AWS CLI (profile {profile})"),
            (None, Some(region)) => format!("AWS CLI ({region})"),
            (None, None) => "AWS CLI".to_string(),
        }
    }

    async fn discover(&self) -> Result<DiscoveryDataset> {
        info!("Enumerating resources via {}", self.describe());

        let buckets: ListBucketsOutput = self.call(&["s3api", "list-buckets"]).await?;
        let distributions: ListDistributionsOutput =
            self.call(&["cloudfront", "list-distributions"]).await?;
        let functions: ListFunctionsOutput = self.call(&["lambda", "list-functions"]).await?;
        let user_pools: ListUserPoolsOutput = self
            .call(&["cognito-idp", "list-user-pools", "--max-results", "50"])
            .await?;
        let tables: ListTablesOutput = self.call(&["dynamodb", "list-tables"]).await?;
        let apis: GetRestApisOutput = self.call(&["apigateway", "get-rest-apis"]).await?;
        let users: ListUsersOutput = self.call(&["iam", "list-users"]).await?;
        let roles: ListRolesOutput = self.call(&["iam", "list-roles"]).await?;
        let policies: ListPoliciesOutput = self
            .call(&["iam", "list-policies", "--scope", "Local"])
            .await?;
        let instances: DescribeInstancesOutput =
            self.call(&["ec2", "describe-instances"]).await?;
        let vpcs: DescribeVpcsOutput = self.call(&["ec2", "describe-vpcs"]).await?;
        let subnets: DescribeSubnetsOutput = self.call(&["ec2", "describe-subnets"]).await?;
        let security_groups: DescribeSecurityGroupsOutput =
            self.call(&["ec2", "describe-security-groups"]).await?;

        let dataset = DiscoveryDataset {
            s3_buckets: buckets.buckets.into_iter().map(|b| b.name).collect(),
            cloudfront_distributions: distributions.into_distributions(),
            lambda_functions: functions
                .functions
                .into_iter()
                .map(|f| f.function_name)
                .collect(),
            cognito_user_pools: user_pools
                .user_pools
                .into_iter()
                .map(|p| CognitoUserPool {
                    name: p.name,
                    id: p.id,
                })
                .collect(),
            dynamodb_tables: tables.table_names,
            api_gateway_apis: apis
                .items
                .into_iter()
                .map(|a| ApiGatewayApi {
                    name: a.name,
                    id: a.id,
                })
                .collect(),
            iam: IamPrincipals {
                users: users.users.into_iter().map(|u| u.user_name).collect(),
                roles: roles.roles.into_iter().map(|r| r.role_name).collect(),
                policies: policies
                    .policies
                    .into_iter()
                    .map(|p| p.policy_name)
                    .collect(),
            },
            networking: NetworkingInventory {
                vpcs: vpcs.vpcs.into_iter().map(|v| v.vpc_id).collect(),
                subnets: subnets.subnets.into_iter().map(|s| s.subnet_id).collect(),
                security_groups: security_groups
                    .security_groups
                    .into_iter()
                    .map(|g| g.group_name)
                    .collect(),
                ec2_instances: instances.instance_ids(),
            },
            extra: Default::default(),
        };

        info!("Enumerated {} resources", dataset.resource_count());
        Ok(dataset)
    }
}

// CLI response shapes. Only the fields the dataset needs are modelled.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBucketsOutput {
    #[serde(default)]
    buckets: Vec<BucketSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BucketSummary {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributionsOutput {
    #[serde(default)]
    distribution_list: DistributionList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    #[serde(default)]
    items: Vec<DistributionSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionSummary {
    id: Option<String>,
    domain_name: Option<String>,
    origins: Option<OriginList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OriginList {
    #[serde(default)]
    items: Vec<OriginSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OriginSummary {
    domain_name: String,
}

impl ListDistributionsOutput {
    fn into_distributions(self) -> Vec<CloudFrontDistribution> {
        self.distribution_list
            .items
            .into_iter()
            .map(|d| CloudFrontDistribution {
                id: d.id,
                domain_name: d.domain_name,
                origins: d
                    .origins
                    .map(|o| o.items.into_iter().map(|i| i.domain_name).collect()),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListFunctionsOutput {
    #[serde(default)]
    functions: Vec<FunctionSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionSummary {
    function_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListUserPoolsOutput {
    #[serde(default)]
    user_pools: Vec<UserPoolSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolSummary {
    name: String,
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListTablesOutput {
    #[serde(default)]
    table_names: Vec<String>,
}

// API Gateway is the one service whose CLI output uses lowercase keys.
#[derive(Debug, Default, Deserialize)]
struct GetRestApisOutput {
    #[serde(default)]
    items: Vec<RestApiSummary>,
}

#[derive(Debug, Deserialize)]
struct RestApiSummary {
    name: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListUsersOutput {
    #[serde(default)]
    users: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserSummary {
    user_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListRolesOutput {
    #[serde(default)]
    roles: Vec<RoleSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleSummary {
    role_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListPoliciesOutput {
    #[serde(default)]
    policies: Vec<PolicySummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PolicySummary {
    policy_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesOutput {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<InstanceSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceSummary {
    instance_id: String,
}

impl DescribeInstancesOutput {
    fn instance_ids(self) -> Vec<String> {
        self.reservations
            .into_iter()
            .flat_map(|r| r.instances)
            .map(|i| i.instance_id)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcsOutput {
    #[serde(default)]
    vpcs: Vec<VpcSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VpcSummary {
    vpc_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnetsOutput {
    #[serde(default)]
    subnets: Vec<SubnetSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SubnetSummary {
    subnet_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSecurityGroupsOutput {
    #[serde(default)]
    security_groups: Vec<SecurityGroupSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupSummary {
    group_name: String,
}
