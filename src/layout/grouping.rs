//! Overview-mode cluster grouping: every swarm collapses into its controller
//! node, which carries the members' render metadata.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::normalize_swarm_id;
use crate::render::{GroupEdge, GroupMember, RenderEdge, RenderNode, SwarmGroup};

const CONTROLLER_ROLE: &str = "swarm-controller";

/// Collapse same-swarm members into their controller's group node. Edges with
/// both endpoints inside one swarm become that group's internal edges; edges
/// crossing a group boundary are reattached to the controller. Nodes without
/// a matching controller stay standalone. Controllers are never dropped, even
/// with zero members.
pub(crate) fn group_swarms(
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    depths: &BTreeMap<String, u64>,
    reserved: &[String],
) -> (Vec<RenderNode>, Vec<RenderEdge>) {
    let mut controller_of: HashMap<String, String> = HashMap::new();
    for node in &nodes {
        if node.role != CONTROLLER_ROLE {
            continue;
        }
        let Some(swarm) = node
            .swarm_id
            .as_deref()
            .and_then(|id| normalize_swarm_id(id, reserved))
        else {
            continue;
        };
        controller_of
            .entry(swarm.to_string())
            .or_insert_with(|| node.id.clone());
    }

    let mut member_home: HashMap<String, String> = HashMap::new();
    for node in &nodes {
        if node.role == CONTROLLER_ROLE {
            continue;
        }
        let Some(swarm) = node
            .swarm_id
            .as_deref()
            .and_then(|id| normalize_swarm_id(id, reserved))
        else {
            continue;
        };
        if let Some(controller_id) = controller_of.get(swarm) {
            member_home.insert(node.id.clone(), controller_id.clone());
        }
    }

    let mut groups: HashMap<String, SwarmGroup> = HashMap::new();
    for (swarm, controller_id) in &controller_of {
        groups.insert(
            controller_id.clone(),
            SwarmGroup {
                controller_id: controller_id.clone(),
                swarm_id: swarm.clone(),
                members: Vec::new(),
                edges: Vec::new(),
            },
        );
    }
    for node in &nodes {
        if let Some(controller_id) = member_home.get(&node.id) {
            if let Some(group) = groups.get_mut(controller_id) {
                group.members.push(GroupMember {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    fill: node.fill.clone(),
                    throughput: node.throughput,
                });
            }
        }
    }

    // A node sits inside a group either as a member or as the controller.
    let group_ids: HashSet<String> = controller_of.values().cloned().collect();
    let home_of = |id: &str| -> Option<String> {
        member_home
            .get(id)
            .cloned()
            .or_else(|| group_ids.contains(id).then(|| id.to_string()))
    };

    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut flat_edges: Vec<RenderEdge> = Vec::new();
    for edge in edges {
        let source_home = home_of(&edge.source);
        let target_home = home_of(&edge.target);
        if let (Some(src), Some(dst)) = (source_home.as_ref(), target_home.as_ref()) {
            if src == dst {
                if let Some(group) = groups.get_mut(src) {
                    group.edges.push(GroupEdge {
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        queue: edge.queue.clone(),
                        depth: depths.get(&edge.queue).copied().unwrap_or(edge.depth),
                    });
                }
                continue;
            }
        }
        let source = source_home.unwrap_or_else(|| edge.source.clone());
        let target = target_home.unwrap_or_else(|| edge.target.clone());
        if !seen.insert((source.clone(), target.clone(), edge.queue.clone())) {
            continue;
        }
        flat_edges.push(RenderEdge {
            source,
            target,
            ..edge
        });
    }

    let mut flat_nodes: Vec<RenderNode> = Vec::new();
    for mut node in nodes {
        if member_home.contains_key(&node.id) {
            continue;
        }
        if let Some(group) = groups.remove(&node.id) {
            node.group = Some(group);
        }
        flat_nodes.push(node);
    }

    (flat_nodes, flat_edges)
}
