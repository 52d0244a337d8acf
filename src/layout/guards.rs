//! Guard-edge synthesis: semantic control edges from a swarm controller to the
//! producers and consumers of the queues it regulates.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::model::{Component, GuardQueuesConfig, NodeRole, normalize_swarm_id, queue_matches_alias};
use crate::render::{EdgeKind, RenderEdge, RenderNode};
use crate::theme::Theme;

fn rate_label(guard: &GuardQueuesConfig) -> String {
    match (guard.min_rate, guard.max_rate) {
        (Some(min), Some(max)) => format!("{min}-{max} msg/s"),
        (Some(min), None) => format!("min {min} msg/s"),
        (None, Some(max)) => format!("max {max} msg/s"),
        (None, None) => "rate".to_string(),
    }
}

fn depth_label(guard: &GuardQueuesConfig) -> String {
    let mut parts = Vec::new();
    if let Some(min) = guard.min_depth {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = guard.max_depth {
        parts.push(format!("max {max}"));
    }
    if let Some(target) = guard.target_depth {
        parts.push(format!("target {target}"));
    }
    if parts.is_empty() {
        "depth".to_string()
    } else {
        parts.join(", ")
    }
}

fn backpressure_label(guard: &GuardQueuesConfig) -> String {
    let mut parts = Vec::new();
    if let Some(high) = guard.high_depth {
        parts.push(format!("high {high}"));
    }
    if let Some(recovery) = guard.recovery_depth {
        parts.push(format!("recover {recovery}"));
    }
    if parts.is_empty() {
        "backpressure".to_string()
    } else {
        parts.join(", ")
    }
}

fn guard_stroke(kind: EdgeKind, theme: &Theme) -> String {
    match kind {
        EdgeKind::RateControl => theme.rate_edge_color.clone(),
        EdgeKind::DepthTarget => theme.depth_edge_color.clone(),
        EdgeKind::Backpressure => theme.backpressure_edge_color.clone(),
        EdgeKind::Flow => theme.edge_cool.clone(),
    }
}

/// Append dashed guard edges derived from each swarm's buffer-guard config.
/// At most one edge per (controller, target, kind) pair; swarms without a
/// resolvable controller node contribute nothing.
pub(crate) fn annotate_guard_edges(
    nodes: &[RenderNode],
    edges: &mut Vec<RenderEdge>,
    components: &[Component],
    reserved: &[String],
    theme: &Theme,
    config: &LayoutConfig,
) {
    let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let base_count = edges.len();
    let mut emitted: HashSet<(String, String, EdgeKind)> = HashSet::new();

    for component in components {
        if component.role != NodeRole::Controller {
            continue;
        }
        let Some(guard) = component.guard.as_ref() else {
            continue;
        };
        if guard.is_empty() {
            continue;
        }
        if component
            .swarm_id
            .as_deref()
            .and_then(|id| normalize_swarm_id(id, reserved))
            .is_none()
        {
            continue;
        }
        // The controller must be present in the rendered output; a swarm
        // whose controller fell out of view gets no guard edges.
        if !node_ids.contains(component.id.as_str()) {
            continue;
        }
        let controller_id = component.id.as_str();

        let mut pending: Vec<RenderEdge> = Vec::new();
        for edge in edges[..base_count].iter() {
            if edge.kind != EdgeKind::Flow {
                continue;
            }
            if let Some(primary) = guard.primary.as_deref() {
                if queue_matches_alias(&edge.queue, primary) {
                    push_guard(
                        &mut pending,
                        &mut emitted,
                        &node_ids,
                        controller_id,
                        &edge.source,
                        &edge.queue,
                        EdgeKind::RateControl,
                        rate_label(guard),
                        theme,
                        config,
                    );
                    push_guard(
                        &mut pending,
                        &mut emitted,
                        &node_ids,
                        controller_id,
                        &edge.target,
                        &edge.queue,
                        EdgeKind::DepthTarget,
                        depth_label(guard),
                        theme,
                        config,
                    );
                }
            }
            if let Some(backpressure) = guard.backpressure.as_deref() {
                if queue_matches_alias(&edge.queue, backpressure) {
                    push_guard(
                        &mut pending,
                        &mut emitted,
                        &node_ids,
                        controller_id,
                        &edge.target,
                        &edge.queue,
                        EdgeKind::Backpressure,
                        backpressure_label(guard),
                        theme,
                        config,
                    );
                }
            }
        }
        edges.extend(pending);
    }
}

#[allow(clippy::too_many_arguments)]
fn push_guard(
    pending: &mut Vec<RenderEdge>,
    emitted: &mut HashSet<(String, String, EdgeKind)>,
    node_ids: &HashSet<&str>,
    controller_id: &str,
    target: &str,
    queue: &str,
    kind: EdgeKind,
    label: String,
    theme: &Theme,
    config: &LayoutConfig,
) {
    // A fully collapsed swarm resolves both endpoints to the controller;
    // skip the self-loop.
    if target == controller_id {
        return;
    }
    if !node_ids.contains(target) {
        return;
    }
    if !emitted.insert((controller_id.to_string(), target.to_string(), kind)) {
        return;
    }
    pending.push(RenderEdge {
        source: controller_id.to_string(),
        target: target.to_string(),
        queue: queue.to_string(),
        kind,
        label: Some(label),
        depth: 0,
        stroke: guard_stroke(kind, theme),
        stroke_width: config.base_stroke_width,
        dashed: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphNode, NodeRole};
    use crate::render::decorate_node;

    fn node(id: &str, role: NodeRole, swarm: Option<&str>) -> RenderNode {
        let mut graph_node = GraphNode::new(id, role);
        graph_node.swarm_id = swarm.map(str::to_string);
        decorate_node(
            &graph_node,
            None,
            (0.0, 0.0),
            &Theme::modern(),
            &LayoutConfig::default(),
        )
    }

    fn flow(source: &str, target: &str, queue: &str) -> RenderEdge {
        RenderEdge {
            source: source.to_string(),
            target: target.to_string(),
            queue: queue.to_string(),
            kind: EdgeKind::Flow,
            label: None,
            depth: 0,
            stroke: String::new(),
            stroke_width: 1.0,
            dashed: false,
        }
    }

    fn controller_component(id: &str, swarm: &str, guard: GuardQueuesConfig) -> Component {
        let mut component = Component::new(id, NodeRole::Controller);
        component.swarm_id = Some(swarm.to_string());
        component.guard = Some(guard);
        component
    }

    fn reserved() -> Vec<String> {
        vec!["hive".to_string()]
    }

    #[test]
    fn primary_alias_emits_rate_and_depth_edges() {
        let nodes = vec![
            node("ctl", NodeRole::Controller, Some("sw1")),
            node("p1", NodeRole::Generator, Some("sw1")),
            node("p2", NodeRole::Generator, Some("sw1")),
            node("c1", NodeRole::Processor, Some("sw1")),
            node("c2", NodeRole::Processor, Some("sw1")),
        ];
        let mut edges = vec![
            flow("p1", "c1", "sw1.work"),
            flow("p1", "c2", "sw1.work"),
            flow("p2", "c1", "sw1.work"),
            flow("p2", "c2", "sw1.work"),
        ];
        let guard = GuardQueuesConfig {
            primary: Some("work".to_string()),
            min_rate: Some(5.0),
            max_rate: Some(50.0),
            target_depth: Some(100),
            ..Default::default()
        };
        annotate_guard_edges(
            &nodes,
            &mut edges,
            &[controller_component("ctl", "sw1", guard)],
            &reserved(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );

        let rate: Vec<&RenderEdge> = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::RateControl)
            .collect();
        let depth: Vec<&RenderEdge> = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::DepthTarget)
            .collect();
        // Four matching base edges, but only one guard edge per pair.
        assert_eq!(rate.len(), 2);
        assert_eq!(depth.len(), 2);
        assert!(rate.iter().all(|e| e.source == "ctl" && e.dashed));
        assert_eq!(rate[0].label.as_deref(), Some("5-50 msg/s"));
        assert_eq!(depth[0].label.as_deref(), Some("target 100"));
    }

    #[test]
    fn backpressure_alias_targets_consumer() {
        let nodes = vec![
            node("ctl", NodeRole::Controller, Some("sw1")),
            node("p", NodeRole::Generator, Some("sw1")),
            node("c", NodeRole::Processor, Some("sw1")),
        ];
        let mut edges = vec![flow("p", "c", "sw1.overflow")];
        let guard = GuardQueuesConfig {
            backpressure: Some("overflow".to_string()),
            high_depth: Some(1000),
            recovery_depth: Some(200),
            ..Default::default()
        };
        annotate_guard_edges(
            &nodes,
            &mut edges,
            &[controller_component("ctl", "sw1", guard)],
            &reserved(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        let guard_edges: Vec<&RenderEdge> = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Backpressure)
            .collect();
        assert_eq!(guard_edges.len(), 1);
        assert_eq!(guard_edges[0].target, "c");
        assert_eq!(guard_edges[0].label.as_deref(), Some("high 1000, recover 200"));
    }

    #[test]
    fn missing_controller_node_is_silent() {
        let nodes = vec![
            node("p", NodeRole::Generator, Some("sw1")),
            node("c", NodeRole::Processor, Some("sw1")),
        ];
        let mut edges = vec![flow("p", "c", "work")];
        let guard = GuardQueuesConfig {
            primary: Some("work".to_string()),
            ..Default::default()
        };
        annotate_guard_edges(
            &nodes,
            &mut edges,
            &[controller_component("ghost", "sw1", guard)],
            &reserved(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn unset_rates_fall_back_to_plain_label() {
        let nodes = vec![
            node("ctl", NodeRole::Controller, Some("sw1")),
            node("p", NodeRole::Generator, Some("sw1")),
            node("c", NodeRole::Processor, Some("sw1")),
        ];
        let mut edges = vec![flow("p", "c", "work")];
        let guard = GuardQueuesConfig {
            primary: Some("work".to_string()),
            ..Default::default()
        };
        annotate_guard_edges(
            &nodes,
            &mut edges,
            &[controller_component("ctl", "sw1", guard)],
            &reserved(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        let rate = edges
            .iter()
            .find(|e| e.kind == EdgeKind::RateControl)
            .unwrap();
        assert_eq!(rate.label.as_deref(), Some("rate"));
        let depth = edges
            .iter()
            .find(|e| e.kind == EdgeKind::DepthTarget)
            .unwrap();
        assert_eq!(depth.label.as_deref(), Some("depth"));
    }
}
