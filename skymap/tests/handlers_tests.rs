use skymap::commands::command_argument_builder;
use skymap::handlers::*;
use skymap_core::{DiscoveryProgress, ReportFormat, build_report};
use skymap_discovery::{ApiGatewayApi, DiscoveryDataset, ResourceSource};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn matches_for(args: &[&str]) -> clap::ArgMatches {
    command_argument_builder()
        .try_get_matches_from(args)
        .expect("arguments should parse")
}

#[test]
fn test_command_definition_is_valid() {
    command_argument_builder().debug_assert();
}

#[test]
fn test_subcommand_is_required() {
    let result = command_argument_builder().try_get_matches_from(["skymap"]);
    assert!(result.is_err());
}

#[test]
fn test_discover_defaults() {
    let matches = matches_for(&["skymap", "discover"]);
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "discover");

    let options = output_options(sub).unwrap();
    assert_eq!(options.format, ReportFormat::Json);
    assert!(options.output.is_none());
    assert_eq!(sub.get_one::<String>("aws-bin").unwrap(), "aws");
}

#[test]
fn test_discover_rejects_unknown_format() {
    let result =
        command_argument_builder().try_get_matches_from(["skymap", "discover", "-f", "pdf"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let matches = matches_for(&["skymap", "analyze", "snap.json", "-q", "-vv"]);
    assert!(matches.get_flag("quiet"));
    assert_eq!(matches.get_count("verbose"), 2);
}

#[test]
fn test_analyze_requires_snapshot() {
    let result = command_argument_builder().try_get_matches_from(["skymap", "analyze"]);
    assert!(result.is_err());
}

#[test]
fn test_output_options_text_to_file() {
    let matches = matches_for(&["skymap", "analyze", "snap.json", "-f", "text", "-o", "out.txt"]);
    let (_, sub) = matches.subcommand().unwrap();
    let options = output_options(sub).unwrap();
    assert_eq!(options.format, ReportFormat::Text);
    assert_eq!(options.output, Some(PathBuf::from("out.txt")));
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/skymap/report.json");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("skymap/report.json"));
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(expand_path("reports/out.json"), PathBuf::from("reports/out.json"));
}

#[test]
fn test_aws_source_from_args() {
    let matches = matches_for(&[
        "skymap",
        "discover",
        "--profile",
        "audit",
        "--region",
        "eu-west-1",
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    let source = aws_source_from_args(sub, &DiscoveryProgress::hidden());

    assert_eq!(source.describe(), "AWS CLI (profile audit, eu-west-1)");
    let args = source.command_args(&["lambda", "list-functions"]);
    assert!(args.windows(2).any(|w| w == ["--profile", "audit"]));
    assert!(args.windows(2).any(|w| w == ["--region", "eu-west-1"]));
}

#[test]
fn test_emit_report_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("report.json");

    let dataset = DiscoveryDataset {
        api_gateway_apis: vec![ApiGatewayApi::named("api1")],
        lambda_functions: vec!["fn1".to_string()],
        ..Default::default()
    };
    let report = build_report(dataset)?;
    let options = OutputOptions {
        format: ReportFormat::Json,
        output: Some(path.clone()),
    };

    emit_report(&report, &options, true)?;

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(
        written["AnalysisReport"]["API:api1"],
        serde_json::json!(["Lambda:fn1"])
    );
    Ok(())
}

#[tokio::test]
async fn test_handle_analyze_from_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let snapshot = temp_dir.path().join("snapshot.json");
    let output = temp_dir.path().join("report.dot");
    fs::write(
        &snapshot,
        r#"{"CloudFrontDistributions": [{"DomainName": "d1.example.com", "Origins": ["o1.example.com"]}]}"#,
    )?;

    let snapshot_arg = snapshot.to_string_lossy().to_string();
    let output_arg = output.to_string_lossy().to_string();
    let matches = matches_for(&[
        "skymap",
        "analyze",
        &snapshot_arg,
        "-f",
        "dot",
        "-o",
        &output_arg,
    ]);
    let (_, sub) = matches.subcommand().unwrap();

    handle_analyze(sub, true).await?;

    let dot = fs::read_to_string(&output)?;
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("CloudFront:d1.example.com"));
    Ok(())
}

#[tokio::test]
async fn test_handle_analyze_malformed_snapshot_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = temp_dir.path().join("snapshot.json");
    let output = temp_dir.path().join("report.json");
    fs::write(
        &snapshot,
        r#"{"APIGatewayAPIs": [{"Id": "abc"}], "LambdaFunctions": ["fn1"]}"#,
    )
    .unwrap();

    let snapshot_arg = snapshot.to_string_lossy().to_string();
    let output_arg = output.to_string_lossy().to_string();
    let matches = matches_for(&["skymap", "analyze", &snapshot_arg, "-o", &output_arg]);
    let (_, sub) = matches.subcommand().unwrap();

    let err = handle_analyze(sub, true).await.unwrap_err();
    assert!(err.to_string().contains("missing `Name`"));
    assert!(!output.exists());
}
