pub mod config;
pub mod decode;
pub mod dump;
pub mod layout;
pub mod model;
pub mod render;
pub mod session;
pub mod theme;

pub use config::{LayoutConfig, load_config};
pub use decode::{DecodeError, decode_component, decode_components, decode_node, decode_topology};
pub use layout::{ComputedLayout, FilteredGraph, build_graph, compute_layout};
pub use model::{
    Component, ComponentStatus, GraphEdge, GraphNode, GuardQueuesConfig, NodeRole, QueueStat,
    Topology, normalize_swarm_id, queue_depths,
};
pub use render::{EdgeKind, GroupEdge, GroupMember, RenderEdge, RenderGraph, RenderNode, SwarmGroup};
pub use session::{LayoutSession, MemoryPositionStore, PositionStore, SessionOptions};
pub use theme::Theme;
