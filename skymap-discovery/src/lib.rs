pub mod aws;
pub mod dataset;
pub mod error;
pub mod source;

pub use aws::{AwsCliSource, ProgressCallback};
pub use dataset::{
    ApiGatewayApi, CloudFrontDistribution, CognitoUserPool, DiscoveryDataset, IamPrincipals,
    NetworkingInventory,
};
pub use error::DiscoveryError;
pub use source::{ResourceSource, SnapshotSource, StaticSource, parse_snapshot};
