//! The reconciliation loop: every snapshot is laid out from scratch, then
//! merged against the previous render state so user drags never jitter.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::config::LayoutConfig;
use crate::layout::{build_graph, compute_layout, grouping, guards};
use crate::model::{Component, Topology, queue_depths};
use crate::render::{RenderGraph, decorate_node, flow_edges};
use crate::theme::Theme;

/// Externally-owned store of user-pinned node positions. Written only on
/// drag end; read as the fallback for nodes without a live position.
pub trait PositionStore {
    fn get(&self, id: &str) -> Option<(f32, f32)>;
    fn set(&mut self, id: &str, x: f32, y: f32);
}

#[derive(Debug, Default)]
pub struct MemoryPositionStore {
    positions: HashMap<String, (f32, f32)>,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionStore for MemoryPositionStore {
    fn get(&self, id: &str) -> Option<(f32, f32)> {
        self.positions.get(id).copied()
    }

    fn set(&mut self, id: &str, x: f32, y: f32) {
        self.positions.insert(id.to_string(), (x, y));
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Restrict the view to one swarm. Also disables cluster grouping, which
    /// only applies to the overview.
    pub swarm_filter: Option<String>,
    pub config: LayoutConfig,
    pub theme: Theme,
}

/// One layout session per view instance. All mutable state lives here; the
/// layout pipeline itself is pure in its snapshot input.
pub struct LayoutSession {
    options: SessionOptions,
    store: Box<dyn PositionStore>,
    output: RenderGraph,
    dragging: HashSet<String>,
    pending_fit: bool,
    fit_signature: Vec<(String, i64, i64)>,
}

impl LayoutSession {
    pub fn new(options: SessionOptions, store: Box<dyn PositionStore>) -> Self {
        Self {
            options,
            store,
            output: RenderGraph::default(),
            dragging: HashSet::new(),
            pending_fit: true,
            fit_signature: Vec::new(),
        }
    }

    pub fn with_memory_store(options: SessionOptions) -> Self {
        Self::new(options, Box::new(MemoryPositionStore::new()))
    }

    pub fn output(&self) -> &RenderGraph {
        &self.output
    }

    pub fn is_dragging(&self) -> bool {
        !self.dragging.is_empty()
    }

    /// Recompute the layout for a new snapshot and merge it with the live
    /// render state. Nodes currently mid-drag keep their previous output
    /// entry untouched.
    pub fn apply_snapshot(&mut self, topology: &Topology, components: &[Component]) -> &RenderGraph {
        let config = &self.options.config;
        let theme = &self.options.theme;

        let depths = queue_depths(components);
        let graph = build_graph(
            topology,
            self.options.swarm_filter.as_deref(),
            &config.reserved_scopes,
        );
        let layout = compute_layout(&graph, config);
        let by_id: HashMap<&str, &Component> = components
            .iter()
            .map(|component| (component.id.as_str(), component))
            .collect();

        let mut nodes = Vec::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            let computed = layout.positions.get(&node.id).copied().unwrap_or((0.0, 0.0));
            let stored = self.store.get(&node.id);
            let x = node
                .x
                .filter(|v| v.is_finite())
                .or(stored.map(|p| p.0))
                .unwrap_or(computed.0);
            let y = node
                .y
                .filter(|v| v.is_finite())
                .or(stored.map(|p| p.1))
                .unwrap_or(computed.1);
            nodes.push(decorate_node(
                node,
                by_id.get(node.id.as_str()).copied(),
                (x, y),
                theme,
                config,
            ));
        }

        let mut edges = flow_edges(&graph.edges, &depths, theme, config);
        if self.options.swarm_filter.is_none() {
            (nodes, edges) = grouping::group_swarms(nodes, edges, &depths, &config.reserved_scopes);
        }
        guards::annotate_guard_edges(
            &nodes,
            &mut edges,
            components,
            &config.reserved_scopes,
            theme,
            config,
        );

        // Merge against the previous pass: a dragged node's output entry is
        // reused wholesale, position and derived metadata alike.
        if !self.dragging.is_empty() {
            let previous: HashMap<String, crate::render::RenderNode> = self
                .output
                .nodes
                .drain(..)
                .map(|node| (node.id.clone(), node))
                .collect();
            for node in &mut nodes {
                if self.dragging.contains(&node.id) {
                    if let Some(frozen) = previous.get(&node.id) {
                        *node = frozen.clone();
                    }
                }
            }
        }

        debug!(
            "layout pass: {} nodes, {} edges, {} dragging",
            nodes.len(),
            edges.len(),
            self.dragging.len()
        );

        self.output = RenderGraph { nodes, edges };
        self.refresh_fit_signature();
        &self.output
    }

    pub fn drag_started(&mut self, id: &str) {
        self.dragging.insert(id.to_string());
    }

    /// End a drag and persist the final position. This is the only write path
    /// to the position store.
    pub fn drag_ended(&mut self, id: &str, x: f32, y: f32) {
        self.dragging.remove(id);
        self.store.set(id, x, y);
        if let Some(node) = self.output.nodes.iter_mut().find(|node| node.id == id) {
            node.x = x;
            node.y = y;
        }
        self.refresh_fit_signature();
    }

    /// True once when a viewport fit is due. Never fires while a drag is in
    /// progress; the pending request is delivered after all drags end.
    pub fn take_fit_request(&mut self) -> bool {
        if self.pending_fit && self.dragging.is_empty() {
            self.pending_fit = false;
            return true;
        }
        false
    }

    fn refresh_fit_signature(&mut self) {
        let mut signature: Vec<(String, i64, i64)> = self
            .output
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.x.round() as i64, node.y.round() as i64))
            .collect();
        signature.sort();
        if signature != self.fit_signature {
            debug!("fit requested: render signature changed");
            self.pending_fit = true;
            self.fit_signature = signature;
        }
    }
}
