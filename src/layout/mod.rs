//! Layered layout for swarm topologies: connectivity-ordered graph build,
//! longest-path leveling, two-pass barycenter ordering, centered coordinates.

pub(crate) mod grouping;
pub(crate) mod guards;

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::config::LayoutConfig;
use crate::model::{GraphEdge, GraphNode, NodeRole, Topology, normalize_swarm_id};

/// Connectivity-ordered node list plus the edges whose endpoints both survived
/// filtering.
#[derive(Debug, Clone, Default)]
pub struct FilteredGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct ComputedLayout {
    pub levels: HashMap<String, usize>,
    /// Per level (ascending), the ordered rows of node ids.
    pub columns: Vec<Vec<String>>,
    pub positions: HashMap<String, (f32, f32)>,
}

/// Reduce a raw topology to a connectivity-ordered node list. Generators seed
/// a BFS over the publish adjacency; reached nodes come first in BFS order,
/// the rest follow in input order. A `swarm_filter` keeps exactly the nodes
/// whose normalized swarm id matches; a filter that normalizes to nothing
/// (e.g. the reserved hive scope) yields an empty graph, not "no filter".
pub fn build_graph(
    topology: &Topology,
    swarm_filter: Option<&str>,
    reserved: &[String],
) -> FilteredGraph {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let kept: Vec<&GraphNode> = match swarm_filter {
        Some(raw) => {
            let Some(target) = normalize_swarm_id(raw, reserved) else {
                return FilteredGraph::default();
            };
            topology
                .nodes
                .iter()
                .filter(|node| {
                    node.swarm_id
                        .as_deref()
                        .and_then(|id| normalize_swarm_id(id, reserved))
                        == Some(target)
                })
                .filter(|node| seen_ids.insert(node.id.as_str()))
                .collect()
        }
        None => topology
            .nodes
            .iter()
            .filter(|node| seen_ids.insert(node.id.as_str()))
            .collect(),
    };

    let present: HashSet<&str> = kept.iter().map(|node| node.id.as_str()).collect();
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &topology.edges {
        if present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()) {
            adj.entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut order: Vec<&str> = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for node in &kept {
        if node.role == NodeRole::Generator && visited.insert(node.id.as_str()) {
            queue.push_back(node.id.as_str());
        }
    }
    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(nexts) = adj.get(id) {
            for &next in nexts {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    for node in &kept {
        if !visited.contains(node.id.as_str()) {
            order.push(node.id.as_str());
        }
    }

    let by_id: HashMap<&str, &GraphNode> =
        kept.iter().map(|node| (node.id.as_str(), *node)).collect();
    let nodes: Vec<GraphNode> = order
        .iter()
        .filter_map(|id| by_id.get(id).map(|node| (*node).clone()))
        .collect();

    let edges: Vec<GraphEdge> = topology
        .edges
        .iter()
        .filter(|edge| {
            present.contains(edge.source.as_str()) && present.contains(edge.target.as_str())
        })
        .cloned()
        .collect();

    FilteredGraph { nodes, edges }
}

/// Longest-path level per node, Kahn style. Cycles never block: with no
/// in-degree-0 seed every node starts at level 0, and anything the induction
/// never reaches is appended after the maximum observed level.
fn assign_levels(nodes: &[GraphNode], edges: &[GraphEdge]) -> HashMap<String, usize> {
    let ids: Vec<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let present: HashSet<&str> = ids.iter().copied().collect();

    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut indeg: HashMap<&str, usize> = ids.iter().map(|id| (*id, 0)).collect();
    for edge in edges {
        if present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()) {
            adj.entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            *indeg.entry(edge.target.as_str()).or_insert(0) += 1;
        }
    }

    let mut levels: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut seeded: HashSet<&str> = HashSet::new();
    for &id in &ids {
        if indeg.get(id).copied().unwrap_or(0) == 0 {
            levels.insert(id, 0);
            seeded.insert(id);
            queue.push_back(id);
        }
    }
    if queue.is_empty() {
        // Fully cyclic graph: seed everything to guarantee progress.
        for &id in &ids {
            levels.insert(id, 0);
            seeded.insert(id);
            queue.push_back(id);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let level = levels.get(id).copied().unwrap_or(0);
        if let Some(nexts) = adj.get(id) {
            for &next in nexts {
                let entry = levels.entry(next).or_insert(0);
                *entry = (*entry).max(level + 1);
                if let Some(deg) = indeg.get_mut(next) {
                    if *deg > 0 {
                        *deg -= 1;
                        if *deg == 0 && !seeded.contains(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
    }

    let max_level = ids
        .iter()
        .filter(|id| visited.contains(*id))
        .filter_map(|id| levels.get(id).copied())
        .max()
        .unwrap_or(0);
    let mut residual = 0usize;
    for &id in &ids {
        if !visited.contains(id) {
            levels.insert(id, max_level + 1 + residual);
            residual += 1;
        }
    }

    levels
        .into_iter()
        .map(|(id, level)| (id.to_string(), level))
        .collect()
}

fn role_of<'a>(nodes: &'a [GraphNode]) -> HashMap<&'a str, NodeRole> {
    nodes
        .iter()
        .map(|node| (node.id.as_str(), node.role))
        .collect()
}

fn base_compare(a: &str, b: &str, roles: &HashMap<&str, NodeRole>) -> std::cmp::Ordering {
    let role_a = roles.get(a).copied().unwrap_or(NodeRole::Other);
    let role_b = roles.get(b).copied().unwrap_or(NodeRole::Other);
    role_a
        .as_str()
        .cmp(role_b.as_str())
        .then_with(|| a.cmp(b))
}

fn mean_rank(id: &str, neighbors: &HashMap<&str, Vec<&str>>, ranks: &HashMap<String, usize>) -> Option<f32> {
    let list = neighbors.get(id)?;
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for neighbor in list {
        if let Some(rank) = ranks.get(*neighbor) {
            sum += *rank as f32;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

fn sort_column(
    column: &mut [String],
    neighbors: &HashMap<&str, Vec<&str>>,
    ranks: &HashMap<String, usize>,
    roles: &HashMap<&str, NodeRole>,
) {
    column.sort_by(|a, b| {
        let mean_a = mean_rank(a, neighbors, ranks);
        let mean_b = mean_rank(b, neighbors, ranks);
        match (mean_a, mean_b) {
            (Some(x), Some(y)) => x
                .total_cmp(&y)
                .then_with(|| base_compare(a, b, roles)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => base_compare(a, b, roles),
        }
    });
}

fn record_ranks(column: &[String], ranks: &mut HashMap<String, usize>) {
    for (row, id) in column.iter().enumerate() {
        ranks.insert(id.clone(), row);
    }
}

/// Barycenter ordering: one forward sweep by mean predecessor rank, one
/// backward sweep by mean successor rank. Exactly one of each, never iterated
/// to convergence.
fn order_columns(
    columns: &mut [Vec<String>],
    nodes: &[GraphNode],
    edges: &[GraphEdge],
) {
    let roles = role_of(nodes);
    let mut forward: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        forward
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        reverse
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut ranks: HashMap<String, usize> = HashMap::new();
    if let Some(first) = columns.first_mut() {
        first.sort_by(|a, b| base_compare(a, b, &roles));
        record_ranks(first, &mut ranks);
    }
    for index in 1..columns.len() {
        sort_column(&mut columns[index], &reverse, &ranks, &roles);
        record_ranks(&columns[index], &mut ranks);
    }

    if columns.len() >= 2 {
        for index in (0..columns.len() - 1).rev() {
            sort_column(&mut columns[index], &forward, &ranks, &roles);
            record_ranks(&columns[index], &mut ranks);
        }
    }
}

/// Map (column, row) indices to pixel coordinates, centering the whole layout
/// horizontally and each column vertically.
fn assign_coordinates(columns: &[Vec<String>], config: &LayoutConfig) -> HashMap<String, (f32, f32)> {
    let mut positions = HashMap::new();
    if columns.is_empty() {
        return positions;
    }
    let total_width = (columns.len() as f32 - 1.0) * config.h_spacing;
    for (col_index, column) in columns.iter().enumerate() {
        let x = col_index as f32 * config.h_spacing - total_width / 2.0;
        let column_height = (column.len() as f32 - 1.0).max(0.0) * config.v_spacing;
        for (row_index, id) in column.iter().enumerate() {
            let y = row_index as f32 * config.v_spacing - column_height / 2.0;
            positions.insert(id.clone(), (x, y));
        }
    }
    positions
}

pub fn compute_layout(graph: &FilteredGraph, config: &LayoutConfig) -> ComputedLayout {
    let levels = assign_levels(&graph.nodes, &graph.edges);

    let mut by_level: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for node in &graph.nodes {
        let level = levels.get(&node.id).copied().unwrap_or(0);
        by_level.entry(level).or_default().push(node.id.clone());
    }
    let mut columns: Vec<Vec<String>> = by_level.into_values().collect();

    order_columns(&mut columns, &graph.nodes, &graph.edges);
    let positions = assign_coordinates(&columns, config);

    ComputedLayout {
        levels,
        columns,
        positions,
    }
}
