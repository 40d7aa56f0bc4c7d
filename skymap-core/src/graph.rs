// Reference graph built from a discovery dataset

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use skymap_discovery::DiscoveryDataset;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Resource categories that take part in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CloudFront,
    Origin,
    Api,
    Lambda,
}

impl NodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::CloudFront => "CloudFront",
            NodeKind::Origin => "Origin",
            NodeKind::Api => "API",
            NodeKind::Lambda => "Lambda",
        }
    }

    /// Node label for a resource of this kind: `<Category>:<identifier>`.
    pub fn label(&self, identifier: &str) -> String {
        format!("{}:{}", self.prefix(), identifier)
    }

    pub fn of_label(label: &str) -> Option<Self> {
        let (prefix, _) = label.split_once(':')?;
        [
            NodeKind::CloudFront,
            NodeKind::Origin,
            NodeKind::Api,
            NodeKind::Lambda,
        ]
        .into_iter()
        .find(|kind| kind.prefix() == prefix)
    }
}

/// Directed "references" relation between two node labels.
///
/// Serialized as a two-element array `[source, target]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub String, pub String);

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge(source.into(), target.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }

    pub fn target(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed input: {category}[{index}] is missing `{field}`")]
pub struct MalformedInputError {
    pub category: &'static str,
    pub index: usize,
    pub field: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: BTreeSet<String>,
    pub edges: Vec<Edge>,
}

/// Turn a discovery dataset into labeled nodes and directed edges.
///
/// Distributions point at their origins. Every API points at every function
/// in the dataset: the dataset carries no trigger or permission relation, so
/// no narrower association is attempted. No other category is linked.
///
/// The first entry missing a required field aborts the whole build.
pub fn build_graph(dataset: &DiscoveryDataset) -> Result<GraphData, MalformedInputError> {
    let mut nodes = BTreeSet::new();
    let mut edges = Vec::new();

    for (index, dist) in dataset.cloudfront_distributions.iter().enumerate() {
        let domain_name = dist.domain_name.as_deref().ok_or(MalformedInputError {
            category: "CloudFrontDistributions",
            index,
            field: "DomainName",
        })?;
        let origins = dist.origins.as_ref().ok_or(MalformedInputError {
            category: "CloudFrontDistributions",
            index,
            field: "Origins",
        })?;

        let src = NodeKind::CloudFront.label(domain_name);
        nodes.insert(src.clone());
        for origin in origins {
            let dest = NodeKind::Origin.label(origin);
            nodes.insert(dest.clone());
            edges.push(Edge(src.clone(), dest));
        }
    }

    for (index, api) in dataset.api_gateway_apis.iter().enumerate() {
        let name = api.name.as_deref().ok_or(MalformedInputError {
            category: "APIGatewayAPIs",
            index,
            field: "Name",
        })?;

        let src = NodeKind::Api.label(name);
        nodes.insert(src.clone());
        for function in &dataset.lambda_functions {
            let dest = NodeKind::Lambda.label(function);
            nodes.insert(dest.clone());
            edges.push(Edge(src.clone(), dest));
        }
    }

    debug!("Built graph with {} nodes and {} edges", nodes.len(), edges.len());
    Ok(GraphData { nodes, edges })
}

impl GraphData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &String> {
        self.nodes
            .iter()
            .filter(move |label| NodeKind::of_label(label) == Some(kind))
    }

    /// Build a petgraph directed graph. Parallel edges are kept.
    pub fn to_digraph(&self) -> DiGraph<String, EdgeLabel> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for label in &self.nodes {
            indices.insert(label.as_str(), graph.add_node(label.clone()));
        }

        for edge in &self.edges {
            let (Some(&a), Some(&b)) = (indices.get(edge.source()), indices.get(edge.target()))
            else {
                continue;
            };
            graph.add_edge(a, b, EdgeLabel::References);
        }

        graph
    }

    /// Graphviz DOT rendering of the graph.
    pub fn to_dot(&self) -> String {
        let graph = self.to_digraph();
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeLabel {
    References,
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::References => write!(f, "references"),
        }
    }
}
