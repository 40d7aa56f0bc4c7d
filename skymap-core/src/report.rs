// Inventory report model and renderers

use crate::analysis::{Adjacency, fan_in};
use crate::graph::GraphData;
use serde::{Deserialize, Serialize};
use skymap_discovery::{
    ApiGatewayApi, CloudFrontDistribution, CognitoUserPool, DiscoveryDataset, IamPrincipals,
    NetworkingInventory,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const MOST_REFERENCED_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Json,
    Text,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "text" | "txt" => Some(ReportFormat::Text),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }
}

/// Everything a run produces: the dataset as discovered, the reference
/// graph and its adjacency mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    #[serde(rename = "DiscoverySummary")]
    pub discovery_summary: DiscoveryDataset,
    #[serde(rename = "GraphStructure")]
    pub graph_structure: GraphData,
    #[serde(rename = "AnalysisReport")]
    pub analysis_report: Adjacency,
}

/// One discovery category, borrowed from a dataset.
#[derive(Debug, Clone, Copy)]
pub enum ReportSection<'a> {
    StorageBuckets(&'a [String]),
    Distributions(&'a [CloudFrontDistribution]),
    Functions(&'a [String]),
    UserPools(&'a [CognitoUserPool]),
    Tables(&'a [String]),
    Apis(&'a [ApiGatewayApi]),
    Iam(&'a IamPrincipals),
    Networking(&'a NetworkingInventory),
}

/// The known categories of a dataset, in report order.
pub fn sections(dataset: &DiscoveryDataset) -> [ReportSection<'_>; 8] {
    [
        ReportSection::StorageBuckets(&dataset.s3_buckets),
        ReportSection::Distributions(&dataset.cloudfront_distributions),
        ReportSection::Functions(&dataset.lambda_functions),
        ReportSection::UserPools(&dataset.cognito_user_pools),
        ReportSection::Tables(&dataset.dynamodb_tables),
        ReportSection::Apis(&dataset.api_gateway_apis),
        ReportSection::Iam(&dataset.iam),
        ReportSection::Networking(&dataset.networking),
    ]
}

impl ReportSection<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::StorageBuckets(_) => "S3 Buckets",
            ReportSection::Distributions(_) => "CloudFront Distributions",
            ReportSection::Functions(_) => "Lambda Functions",
            ReportSection::UserPools(_) => "Cognito User Pools",
            ReportSection::Tables(_) => "DynamoDB Tables",
            ReportSection::Apis(_) => "API Gateway APIs",
            ReportSection::Iam(_) => "IAM",
            ReportSection::Networking(_) => "Networking",
        }
    }

    pub fn resource_count(&self) -> usize {
        match self {
            ReportSection::StorageBuckets(items)
            | ReportSection::Functions(items)
            | ReportSection::Tables(items) => items.len(),
            ReportSection::Distributions(items) => items.len(),
            ReportSection::UserPools(items) => items.len(),
            ReportSection::Apis(items) => items.len(),
            ReportSection::Iam(iam) => iam.len(),
            ReportSection::Networking(net) => net.len(),
        }
    }

    /// One display line per resource.
    pub fn entries(&self) -> Vec<String> {
        match self {
            ReportSection::StorageBuckets(items)
            | ReportSection::Functions(items)
            | ReportSection::Tables(items) => items.to_vec(),
            ReportSection::Distributions(items) => items
                .iter()
                .map(|d| {
                    let domain = d.domain_name.as_deref().unwrap_or("(no domain name)");
                    match d.origins {
                        Some(ref origins) => format!("{} ({} origins)", domain, origins.len()),
                        None => format!("{} (no origins)", domain),
                    }
                })
                .collect(),
            ReportSection::UserPools(items) => items
                .iter()
                .map(|p| format!("{} [{}]", p.name, p.id))
                .collect(),
            ReportSection::Apis(items) => items
                .iter()
                .map(|a| {
                    let name = a.name.as_deref().unwrap_or("(no name)");
                    match a.id {
                        Some(ref id) => format!("{} [{}]", name, id),
                        None => name.to_string(),
                    }
                })
                .collect(),
            ReportSection::Iam(iam) => prefixed(&[
                ("user", &iam.users),
                ("role", &iam.roles),
                ("policy", &iam.policies),
            ]),
            ReportSection::Networking(net) => prefixed(&[
                ("vpc", &net.vpcs),
                ("subnet", &net.subnets),
                ("security group", &net.security_groups),
                ("instance", &net.ec2_instances),
            ]),
        }
    }
}

fn prefixed(groups: &[(&str, &Vec<String>)]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|(kind, names)| names.iter().map(move |name| format!("{} {}", kind, name)))
        .collect()
}

pub fn generate_json_report(report: &InventoryReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn generate_dot_report(report: &InventoryReport) -> String {
    report.graph_structure.to_dot()
}

pub fn generate_text_report(report: &InventoryReport) -> String {
    let dataset = &report.discovery_summary;
    let graph = &report.graph_structure;
    let mut out = String::new();

    // Header
    out.push_str(RULE);
    out.push_str("                        SKYMAP CLOUD INVENTORY REPORT\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Generated:    {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Resources:    {}\n", dataset.resource_count()));
    out.push_str(&format!(
        "Graph:        {} nodes, {} edges\n\n",
        graph.node_count(),
        graph.edge_count()
    ));

    // Inventory
    out.push_str(RULE);
    out.push_str("INVENTORY\n");
    out.push_str(RULE);
    out.push('\n');
    for section in sections(dataset) {
        out.push_str(&format!(
            "{} ({})\n",
            section.title(),
            section.resource_count()
        ));
        for entry in section.entries() {
            out.push_str(&format!("  • {}\n", entry));
        }
        out.push('\n');
    }
    if !dataset.extra.is_empty() {
        out.push_str("Other categories (not analysed)\n");
        for key in dataset.extra.keys() {
            out.push_str(&format!("  • {}\n", key));
        }
        out.push('\n');
    }

    // Adjacency
    out.push_str(RULE);
    out.push_str("REFERENCES\n");
    out.push_str(RULE);
    out.push('\n');
    if report.analysis_report.is_empty() {
        out.push_str("  (no references)\n");
    }
    for (source, targets) in &report.analysis_report {
        out.push_str(&format!("{}\n", source));
        for (idx, target) in targets.iter().enumerate() {
            let branch = if idx == targets.len() - 1 { "└──" } else { "├──" };
            out.push_str(&format!("  {} {}\n", branch, target));
        }
    }
    out.push('\n');

    let ranked = fan_in(&graph.edges);
    if !ranked.is_empty() {
        out.push_str(RULE);
        out.push_str("MOST REFERENCED\n");
        out.push_str(RULE);
        out.push('\n');
        for (label, count) in ranked.iter().take(MOST_REFERENCED_LIMIT) {
            out.push_str(&format!("  {:>4}  {}\n", count, label));
        }
        out.push('\n');
    }

    // Footer
    out.push_str(RULE);
    out.push_str("                          End of Report\n");
    out.push_str(RULE);

    out
}

pub fn render_report(
    report: &InventoryReport,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Dot => Ok(generate_dot_report(report)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
