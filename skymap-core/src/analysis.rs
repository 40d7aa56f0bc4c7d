use crate::graph::Edge;
use indexmap::IndexMap;

/// Source label to the destinations it references, in edge order.
pub type Adjacency = IndexMap<String, Vec<String>>;

/// Group edges by source label.
///
/// Each value keeps the order in which its edges appear, duplicates
/// included. Keys appear in first-seen order and only sources with at least
/// one edge are present.
pub fn analyze_infrastructure(edges: &[Edge]) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for edge in edges {
        adjacency
            .entry(edge.source().to_string())
            .or_default()
            .push(edge.target().to_string());
    }
    adjacency
}

/// Number of incoming edges per destination label, highest first.
/// Ties keep first-seen order.
pub fn fan_in(edges: &[Edge]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for edge in edges {
        *counts.entry(edge.target()).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
