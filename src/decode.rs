//! Lenient decode of control-plane payloads into validated model values.
//!
//! The wire sends loosely-shaped JSON (field names vary across component
//! versions), so lookups try a few aliases. Everything duck-typed lives here;
//! the layout core only ever sees validated records.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    Component, ComponentStatus, GraphEdge, GraphNode, GuardQueuesConfig, NodeRole, QueueStat,
    Topology,
};

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]*$").unwrap());

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no usable id")]
    MissingId,
    #[error("invalid id `{0}`")]
    InvalidId(String),
}

fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| value.get(key)?.as_str())
}

fn f32_field(value: &Value, keys: &[&str]) -> Option<f32> {
    keys.iter()
        .find_map(|key| value.get(key)?.as_f64())
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
}

fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| value.get(key)?.as_u64())
}

fn bool_field(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| value.get(key)?.as_bool())
}

fn decode_id(value: &Value) -> Result<String, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    let id = str_field(value, &["id", "name", "service"]).ok_or(DecodeError::MissingId)?;
    if !ID_RE.is_match(id) {
        return Err(DecodeError::InvalidId(id.to_string()));
    }
    Ok(id.to_string())
}

pub fn decode_node(value: &Value) -> Result<GraphNode, DecodeError> {
    let id = decode_id(value)?;
    let role = str_field(value, &["type", "role"])
        .map(NodeRole::from_token)
        .unwrap_or(NodeRole::Other);
    let mut node = GraphNode::new(&id, role);
    node.swarm_id = str_field(value, &["swarmId", "swarm", "scope"]).map(str::to_string);
    node.enabled = bool_field(value, &["enabled"]);
    node.x = f32_field(value, &["x"]);
    node.y = f32_field(value, &["y"]);
    Ok(node)
}

fn decode_edge(value: &Value) -> Option<GraphEdge> {
    let source = str_field(value, &["source", "from"])?;
    let target = str_field(value, &["target", "to"])?;
    let queue = str_field(value, &["queue", "subject"]).unwrap_or("");
    Some(GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
        queue: queue.to_string(),
    })
}

/// Decode a topology snapshot. Nodes that fail validation are skipped with a
/// warning; malformed edges are dropped silently.
pub fn decode_topology(value: &Value) -> Topology {
    let mut topology = Topology::new();
    if let Some(nodes) = value.get("nodes").and_then(Value::as_array) {
        for raw in nodes {
            match decode_node(raw) {
                Ok(node) => topology.nodes.push(node),
                Err(err) => warn!("skipping topology node: {err}"),
            }
        }
    }
    if let Some(edges) = value.get("edges").and_then(Value::as_array) {
        for raw in edges {
            if let Some(edge) = decode_edge(raw) {
                topology.edges.push(edge);
            }
        }
    }
    topology
}

fn decode_guard(config: &Value) -> Option<GuardQueuesConfig> {
    let guard = config.get("bufferGuard").or_else(|| config.get("guardQueues"))?;
    if !guard.is_object() {
        return None;
    }
    Some(GuardQueuesConfig {
        primary: str_field(guard, &["primary", "primaryQueue"]).map(str::to_string),
        backpressure: str_field(guard, &["backpressure", "backpressureQueue"]).map(str::to_string),
        target_depth: u64_field(guard, &["targetDepth"]),
        min_depth: u64_field(guard, &["minDepth"]),
        max_depth: u64_field(guard, &["maxDepth"]),
        high_depth: u64_field(guard, &["highDepth"]),
        recovery_depth: u64_field(guard, &["recoveryDepth"]),
        min_rate: f32_field(guard, &["minRate"]),
        max_rate: f32_field(guard, &["maxRate"]),
    })
}

fn decode_queue(value: &Value) -> Option<QueueStat> {
    let name = str_field(value, &["name", "queue"])?;
    Some(QueueStat {
        name: name.to_string(),
        depth: u64_field(value, &["depth", "messages", "size"]).unwrap_or(0),
        rate: f32_field(value, &["rate", "msgRate"]),
    })
}

pub fn decode_component(value: &Value) -> Result<Component, DecodeError> {
    let id = decode_id(value)?;
    let role = str_field(value, &["role", "type"])
        .map(NodeRole::from_token)
        .unwrap_or(NodeRole::Other);
    let mut component = Component::new(&id, role);
    component.swarm_id = str_field(value, &["swarmId", "swarm", "scope"]).map(str::to_string);
    component.status = str_field(value, &["status", "state"])
        .map(ComponentStatus::from_token)
        .unwrap_or(ComponentStatus::Unknown);
    component.throughput = f32_field(value, &["throughput", "msgRate", "rate"]);
    component.last_error_at = u64_field(value, &["lastErrorAt", "lastErrorTs"]);
    if let Some(queues) = value.get("queues").and_then(Value::as_array) {
        component.queues = queues.iter().filter_map(decode_queue).collect();
    }
    if let Some(config) = value.get("config").or_else(|| value.get("settings")) {
        component.guard = decode_guard(config);
    }
    Ok(component)
}

/// Decode a component snapshot, skipping records that fail validation.
pub fn decode_components(values: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for raw in values {
        match decode_component(raw) {
            Ok(component) => components.push(component),
            Err(err) => warn!("skipping component record: {err}"),
        }
    }
    components
}
