use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat, per-category resource listing for a single account.
///
/// Keys serialize in PascalCase; camelCase and snake_case spellings are
/// accepted on input. Unknown top-level categories are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryDataset {
    #[serde(rename = "S3Buckets", alias = "s3Buckets", alias = "s3_buckets")]
    pub s3_buckets: Vec<String>,

    #[serde(
        rename = "CloudFrontDistributions",
        alias = "cloudFrontDistributions",
        alias = "cloudfront_distributions"
    )]
    pub cloudfront_distributions: Vec<CloudFrontDistribution>,

    #[serde(
        rename = "LambdaFunctions",
        alias = "lambdaFunctions",
        alias = "lambda_functions"
    )]
    pub lambda_functions: Vec<String>,

    #[serde(
        rename = "CognitoUserPools",
        alias = "cognitoUserPools",
        alias = "cognito_user_pools"
    )]
    pub cognito_user_pools: Vec<CognitoUserPool>,

    #[serde(
        rename = "DynamoDBTables",
        alias = "dynamoDBTables",
        alias = "dynamoDbTables",
        alias = "dynamodb_tables"
    )]
    pub dynamodb_tables: Vec<String>,

    #[serde(
        rename = "APIGatewayAPIs",
        alias = "apiGatewayApis",
        alias = "apiGatewayAPIs",
        alias = "api_gateway_apis"
    )]
    pub api_gateway_apis: Vec<ApiGatewayApi>,

    #[serde(rename = "IAM", alias = "iam")]
    pub iam: IamPrincipals,

    #[serde(rename = "Networking", alias = "networking")]
    pub networking: NetworkingInventory,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CDN distribution. `domain_name` and `origins` are optional here so that
/// a missing field reaches the graph builder instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontDistribution {
    #[serde(rename = "Id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(
        rename = "DomainName",
        alias = "domainName",
        alias = "domain_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub domain_name: Option<String>,

    #[serde(
        rename = "Origins",
        alias = "origins",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub origins: Option<Vec<String>>,
}

impl CloudFrontDistribution {
    pub fn new(domain_name: impl Into<String>, origins: Vec<String>) -> Self {
        Self {
            id: None,
            domain_name: Some(domain_name.into()),
            origins: Some(origins),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitoUserPool {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "Id", alias = "id", default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiGatewayApi {
    #[serde(rename = "Name", alias = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ApiGatewayApi {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamPrincipals {
    #[serde(rename = "Users", alias = "users")]
    pub users: Vec<String>,
    #[serde(rename = "Roles", alias = "roles")]
    pub roles: Vec<String>,
    #[serde(rename = "Policies", alias = "policies")]
    pub policies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkingInventory {
    #[serde(rename = "VPCs", alias = "vpcs", alias = "Vpcs")]
    pub vpcs: Vec<String>,
    #[serde(rename = "Subnets", alias = "subnets")]
    pub subnets: Vec<String>,
    #[serde(rename = "SecurityGroups", alias = "securityGroups", alias = "security_groups")]
    pub security_groups: Vec<String>,
    #[serde(rename = "EC2Instances", alias = "ec2Instances", alias = "ec2_instances")]
    pub ec2_instances: Vec<String>,
}

impl IamPrincipals {
    pub fn len(&self) -> usize {
        self.users.len() + self.roles.len() + self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NetworkingInventory {
    pub fn len(&self) -> usize {
        self.vpcs.len() + self.subnets.len() + self.security_groups.len() + self.ec2_instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiscoveryDataset {
    /// Total number of enumerated resources across the known categories.
    pub fn resource_count(&self) -> usize {
        self.s3_buckets.len()
            + self.cloudfront_distributions.len()
            + self.lambda_functions.len()
            + self.cognito_user_pools.len()
            + self.dynamodb_tables.len()
            + self.api_gateway_apis.len()
            + self.iam.len()
            + self.networking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_count() == 0 && self.extra.is_empty()
    }
}
