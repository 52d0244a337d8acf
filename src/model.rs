use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeRole {
    Generator,
    Processor,
    Controller,
    Sink,
    Other,
}

impl NodeRole {
    pub fn from_token(token: &str) -> Self {
        match token {
            "generator" | "gen" | "source" => Self::Generator,
            "processor" | "worker" => Self::Processor,
            "swarm-controller" | "controller" => Self::Controller,
            "sink" | "collector" => Self::Sink,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Processor => "processor",
            Self::Controller => "swarm-controller",
            Self::Sink => "sink",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Running,
    Stopped,
    Degraded,
    Unknown,
}

impl ComponentStatus {
    pub fn from_token(token: &str) -> Self {
        match token {
            "running" | "active" | "up" => Self::Running,
            "stopped" | "down" => Self::Stopped,
            "degraded" | "error" => Self::Degraded,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub role: NodeRole,
    pub swarm_id: Option<String>,
    pub enabled: Option<bool>,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl GraphNode {
    pub fn new(id: &str, role: NodeRole) -> Self {
        Self {
            id: id.to_string(),
            role,
            swarm_id: None,
            enabled: None,
            x: None,
            y: None,
        }
    }
}

/// Directed relation: `source` publishes to `queue`, consumed by `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub queue: String,
}

#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, role: NodeRole, swarm_id: Option<&str>) {
        let mut node = GraphNode::new(id, role);
        node.swarm_id = swarm_id.map(str::to_string);
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, source: &str, target: &str, queue: &str) {
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            queue: queue.to_string(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct QueueStat {
    pub name: String,
    pub depth: u64,
    pub rate: Option<f32>,
}

/// Buffer-guard configuration carried by a swarm controller component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardQueuesConfig {
    pub primary: Option<String>,
    pub backpressure: Option<String>,
    pub target_depth: Option<u64>,
    pub min_depth: Option<u64>,
    pub max_depth: Option<u64>,
    pub high_depth: Option<u64>,
    pub recovery_depth: Option<u64>,
    pub min_rate: Option<f32>,
    pub max_rate: Option<f32>,
}

impl GuardQueuesConfig {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.backpressure.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    pub role: NodeRole,
    pub swarm_id: Option<String>,
    pub status: ComponentStatus,
    pub throughput: Option<f32>,
    pub queues: Vec<QueueStat>,
    pub guard: Option<GuardQueuesConfig>,
    pub last_error_at: Option<u64>,
}

impl Component {
    pub fn new(id: &str, role: NodeRole) -> Self {
        Self {
            id: id.to_string(),
            role,
            swarm_id: None,
            status: ComponentStatus::Unknown,
            throughput: None,
            queues: Vec::new(),
            guard: None,
            last_error_at: None,
        }
    }
}

/// Strip reserved non-swarm scope ids (the global "hive" scope and friends),
/// treating them as "no swarm".
pub fn normalize_swarm_id<'a>(raw: &'a str, reserved: &[String]) -> Option<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if reserved.iter().any(|scope| scope == trimmed) {
        return None;
    }
    Some(trimmed)
}

/// Maximum observed depth per queue name across all reporting components.
pub fn queue_depths(components: &[Component]) -> BTreeMap<String, u64> {
    let mut depths: BTreeMap<String, u64> = BTreeMap::new();
    for component in components {
        for stat in &component.queues {
            let entry = depths.entry(stat.name.clone()).or_insert(0);
            *entry = (*entry).max(stat.depth);
        }
    }
    depths
}

/// A guard-queue alias matches a queue name exactly or as the last segment of
/// a `.`-qualified name.
pub fn queue_matches_alias(name: &str, alias: &str) -> bool {
    if name == alias {
        return true;
    }
    name.rsplit_once('.')
        .map(|(_, tail)| tail == alias)
        .unwrap_or(false)
}
