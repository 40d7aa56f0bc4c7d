// Tests for the discovery-to-report pipeline

use skymap_core::{
    DiscoveryProgress, InventoryError, build_report, execute_discovery, run_inventory,
};
use skymap_discovery::{
    CloudFrontDistribution, DiscoveryDataset, DiscoveryError, SnapshotSource, StaticSource,
};
use std::fs;
use tempfile::TempDir;

fn dataset_with_api() -> DiscoveryDataset {
    let mut dataset = DiscoveryDataset::default();
    dataset.api_gateway_apis = vec![skymap_discovery::ApiGatewayApi::named("api1")];
    dataset.lambda_functions = vec!["fn1".to_string(), "fn2".to_string()];
    dataset
}

#[tokio::test]
async fn test_execute_discovery_returns_dataset() {
    let source = StaticSource::new(dataset_with_api());
    let dataset = execute_discovery(&source, &DiscoveryProgress::hidden())
        .await
        .unwrap();
    assert_eq!(dataset, dataset_with_api());
}

#[tokio::test]
async fn test_run_inventory_builds_report() {
    let source = StaticSource::new(dataset_with_api());
    let report = run_inventory(&source, &DiscoveryProgress::hidden())
        .await
        .unwrap();

    assert_eq!(report.discovery_summary, dataset_with_api());
    assert_eq!(report.graph_structure.edge_count(), 2);
    assert_eq!(
        report.analysis_report["API:api1"],
        vec!["Lambda:fn1", "Lambda:fn2"]
    );
}

#[tokio::test]
async fn test_run_inventory_rejects_malformed_dataset() {
    let mut dataset = DiscoveryDataset::default();
    dataset.cloudfront_distributions = vec![CloudFrontDistribution {
        id: None,
        domain_name: Some("d1.example.com".to_string()),
        origins: None,
    }];
    let source = StaticSource::new(dataset);

    let result = run_inventory(&source, &DiscoveryProgress::hidden()).await;
    match result {
        Err(InventoryError::MalformedInput(err)) => assert_eq!(err.field, "Origins"),
        other => panic!("expected malformed input, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_run_inventory_from_snapshot_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{
            "cloudFrontDistributions": [{"domainName": "d1.example.com", "origins": ["o1.example.com"]}],
            "apiGatewayApis": [],
            "lambdaFunctions": []
        }"#,
    )
    .unwrap();

    let report = run_inventory(&SnapshotSource::new(&path), &DiscoveryProgress::hidden())
        .await
        .unwrap();
    assert_eq!(
        report.analysis_report["CloudFront:d1.example.com"],
        vec!["Origin:o1.example.com"]
    );
}

#[tokio::test]
async fn test_run_inventory_missing_snapshot_is_discovery_error() {
    let temp_dir = TempDir::new().unwrap();
    let source = SnapshotSource::new(temp_dir.path().join("nope.json"));

    let result = run_inventory(&source, &DiscoveryProgress::hidden()).await;
    assert!(matches!(
        result,
        Err(InventoryError::Discovery(DiscoveryError::IoError(_)))
    ));
}

#[test]
fn test_progress_callback_counts_calls() {
    let progress = DiscoveryProgress::hidden();
    let callback = progress.callback();
    callback("s3api list-buckets");
    callback("cloudfront list-distributions");
    assert_eq!(progress.calls(), 2);
}

#[test]
fn test_build_report_keeps_dataset() {
    let report = build_report(dataset_with_api()).unwrap();
    assert_eq!(report.discovery_summary, dataset_with_api());
    assert_eq!(report.graph_structure.node_count(), 3);
}
