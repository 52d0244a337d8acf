//! Render-ready output model and node/edge decoration. Positions are resolved
//! by the session; this module derives everything else from component state.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::model::{Component, ComponentStatus, GraphEdge, GraphNode};
use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderNode {
    pub id: String,
    pub role: String,
    pub label: String,
    pub swarm_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub fill: String,
    pub stroke: String,
    pub enabled: bool,
    pub errored: bool,
    pub throughput: Option<f32>,
    pub group: Option<SwarmGroup>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SwarmGroup {
    pub controller_id: String,
    pub swarm_id: String,
    pub members: Vec<GroupMember>,
    pub edges: Vec<GroupEdge>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupMember {
    pub id: String,
    pub label: String,
    pub fill: String,
    pub throughput: Option<f32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupEdge {
    pub source: String,
    pub target: String,
    pub queue: String,
    pub depth: u64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Flow,
    RateControl,
    DepthTarget,
    Backpressure,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
    pub queue: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
    pub depth: u64,
    pub stroke: String,
    pub stroke_width: f32,
    pub dashed: bool,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Short display label derived from a node id: initials of separated words,
/// or a prefix of a single word, uppercased.
pub fn abbreviate(id: &str, max_chars: usize) -> String {
    let words: Vec<&str> = id
        .split(['-', '_', '.', ' '])
        .filter(|word| !word.is_empty())
        .collect();
    let label: String = if words.len() > 1 {
        words
            .iter()
            .filter_map(|word| word.chars().next())
            .take(max_chars.max(1))
            .collect()
    } else {
        id.chars().take(max_chars.max(1)).collect()
    };
    label.to_uppercase()
}

pub(crate) fn decorate_node(
    node: &GraphNode,
    component: Option<&Component>,
    position: (f32, f32),
    theme: &Theme,
    config: &LayoutConfig,
) -> RenderNode {
    let enabled = node.enabled.unwrap_or(true);
    let errored = component
        .map(|c| c.status == ComponentStatus::Degraded || c.last_error_at.is_some())
        .unwrap_or(false);
    let fill = if enabled {
        theme.role_fill(node.role).to_string()
    } else {
        theme.disabled_fill.clone()
    };
    let stroke = if errored {
        theme.error_stroke.clone()
    } else {
        theme.node_stroke.clone()
    };

    RenderNode {
        id: node.id.clone(),
        role: node.role.as_str().to_string(),
        label: abbreviate(&node.id, config.label_max_chars),
        swarm_id: node.swarm_id.clone(),
        x: position.0,
        y: position.1,
        fill,
        stroke,
        enabled,
        errored,
        throughput: component.and_then(|c| c.throughput),
        group: None,
    }
}

pub(crate) fn edge_stroke_width(depth: u64, config: &LayoutConfig) -> f32 {
    if depth == 0 {
        return config.base_stroke_width;
    }
    let scaled = config.base_stroke_width + (depth as f32).ln_1p() * config.stroke_log_scale;
    scaled.min(config.max_stroke_width)
}

/// One render edge per distinct (source, target, queue) triple, colored and
/// weighted by the queue's current depth.
pub(crate) fn flow_edges(
    edges: &[GraphEdge],
    depths: &BTreeMap<String, u64>,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<RenderEdge> {
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
    let mut out = Vec::new();
    for edge in edges {
        if !seen.insert((
            edge.source.as_str(),
            edge.target.as_str(),
            edge.queue.as_str(),
        )) {
            continue;
        }
        let depth = depths.get(&edge.queue).copied().unwrap_or(0);
        let stroke = if depth == 0 {
            theme.edge_cool.clone()
        } else {
            theme.edge_hot.clone()
        };
        out.push(RenderEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            queue: edge.queue.clone(),
            kind: EdgeKind::Flow,
            label: None,
            depth,
            stroke,
            stroke_width: edge_stroke_width(depth, config),
            dashed: false,
        });
    }
    out
}
