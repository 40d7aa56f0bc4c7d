// End-to-end tests for the AWS CLI source against a stand-in `aws` script.
//
// Kept as a single test so no other test in this binary forks while the
// script file is being written.

#![cfg(unix)]

use skymap_discovery::{AwsCliSource, DiscoveryError, ResourceSource};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const FAKE_AWS: &str = r#"#!/bin/sh
case "$1 $2" in
  "s3api list-buckets")
    echo '{"Buckets": [{"Name": "assets"}, {"Name": "logs"}], "Owner": {"ID": "x"}}' ;;
  "cloudfront list-distributions")
    echo '{"DistributionList": {"Items": [{"Id": "E1", "DomainName": "d1.cloudfront.net", "Origins": {"Quantity": 1, "Items": [{"Id": "s3", "DomainName": "assets.s3.amazonaws.com"}]}}]}}' ;;
  "lambda list-functions")
    echo '{"Functions": [{"FunctionName": "fn1"}, {"FunctionName": "fn2"}]}' ;;
  "apigateway get-rest-apis")
    echo '{"items": [{"id": "a1", "name": "api1"}]}' ;;
  "dynamodb list-tables")
    ;;
  "ec2 describe-vpcs")
    echo '{"Vpcs": [{"VpcId": "vpc-1"}]}' ;;
  *)
    echo '{}' ;;
esac
"#;

const FAILING_AWS: &str = r#"#!/bin/sh
echo "Unable to locate credentials" >&2
exit 255
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
    path
}

#[tokio::test]
async fn test_aws_cli_source_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let fake = write_script(temp_dir.path(), "fake-aws", FAKE_AWS);
    let failing = write_script(temp_dir.path(), "failing-aws", FAILING_AWS);

    // Successful enumeration
    let calls = Arc::new(Mutex::new(Vec::new()));
    let calls_clone = calls.clone();
    let source = AwsCliSource::new()
        .with_program(fake.to_string_lossy())
        .with_progress_callback(Arc::new(move |call: &str| {
            calls_clone.lock().unwrap().push(call.to_string());
        }));

    let dataset = source.discover().await.unwrap();

    assert_eq!(dataset.s3_buckets, vec!["assets", "logs"]);
    assert_eq!(dataset.cloudfront_distributions.len(), 1);
    assert_eq!(
        dataset.cloudfront_distributions[0].domain_name.as_deref(),
        Some("d1.cloudfront.net")
    );
    assert_eq!(dataset.lambda_functions, vec!["fn1", "fn2"]);
    assert_eq!(dataset.api_gateway_apis[0].name.as_deref(), Some("api1"));
    assert!(dataset.dynamodb_tables.is_empty());
    assert_eq!(dataset.networking.vpcs, vec!["vpc-1"]);
    assert!(dataset.iam.is_empty());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 13);
    assert_eq!(calls[0], "s3api list-buckets");
    assert_eq!(calls[8], "iam list-policies --scope Local");
    assert_eq!(calls[12], "ec2 describe-security-groups");

    // A failing call aborts the whole discovery
    let source = AwsCliSource::new().with_program(failing.to_string_lossy());
    match source.discover().await {
        Err(DiscoveryError::CommandFailed { command, stderr, .. }) => {
            assert!(command.ends_with("s3api list-buckets"));
            assert_eq!(stderr, "Unable to locate credentials");
        }
        other => panic!("expected CommandFailed, got {:?}", other.map(|_| ())),
    }
}
