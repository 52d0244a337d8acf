use proptest::prelude::*;
use swarmview::{
    LayoutConfig, LayoutSession, NodeRole, SessionOptions, Topology, build_graph, compute_layout,
};

fn node_id(index: usize) -> String {
    format!("n{index}")
}

fn role_for(index: usize) -> NodeRole {
    match index % 4 {
        0 => NodeRole::Generator,
        1 => NodeRole::Processor,
        2 => NodeRole::Controller,
        _ => NodeRole::Sink,
    }
}

fn topology_from(node_count: usize, raw_edges: &[(usize, usize)]) -> Topology {
    let mut topology = Topology::new();
    for index in 0..node_count {
        topology.add_node(&node_id(index), role_for(index), None);
    }
    for (from, to) in raw_edges {
        // Indices may overshoot the node count, producing dangling edges on
        // purpose; the builder must drop them.
        topology.add_edge(&node_id(*from), &node_id(*to), &format!("q{from}-{to}"));
    }
    topology
}

proptest! {
    #[test]
    fn every_node_gets_a_level_and_position(
        node_count in 1usize..16,
        raw_edges in prop::collection::vec((0usize..20, 0usize..20), 0..48),
    ) {
        let topology = topology_from(node_count, &raw_edges);
        let config = LayoutConfig::default();
        let graph = build_graph(&topology, None, &config.reserved_scopes);
        let layout = compute_layout(&graph, &config);

        prop_assert_eq!(graph.nodes.len(), node_count);
        for node in &graph.nodes {
            prop_assert!(layout.levels.contains_key(&node.id));
            let (x, y) = layout.positions[&node.id];
            prop_assert!(x.is_finite() && y.is_finite());
        }
    }

    #[test]
    fn dag_edges_are_level_monotonic(
        node_count in 2usize..16,
        raw_edges in prop::collection::vec((0usize..16, 0usize..16), 0..48),
    ) {
        // Orient every edge from the lower to the higher index so the graph
        // is acyclic by construction.
        let dag_edges: Vec<(usize, usize)> = raw_edges
            .iter()
            .filter(|(a, b)| a != b && *a < node_count && *b < node_count)
            .map(|(a, b)| (*a.min(b), *a.max(b)))
            .collect();
        let topology = topology_from(node_count, &dag_edges);
        let config = LayoutConfig::default();
        let graph = build_graph(&topology, None, &config.reserved_scopes);
        let layout = compute_layout(&graph, &config);

        for edge in &graph.edges {
            let source_level = layout.levels[&edge.source];
            let target_level = layout.levels[&edge.target];
            prop_assert!(
                target_level >= source_level + 1,
                "edge {}->{} levels {} -> {}",
                edge.source,
                edge.target,
                source_level,
                target_level,
            );
        }
    }

    #[test]
    fn output_edges_reference_output_nodes(
        node_count in 1usize..16,
        raw_edges in prop::collection::vec((0usize..20, 0usize..20), 0..48),
    ) {
        let topology = topology_from(node_count, &raw_edges);
        let mut session = LayoutSession::with_memory_store(SessionOptions::default());
        let graph = session.apply_snapshot(&topology, &[]);

        let ids: std::collections::HashSet<&str> =
            graph.nodes.iter().map(|node| node.id.as_str()).collect();
        for edge in &graph.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn layout_is_deterministic(
        node_count in 1usize..16,
        raw_edges in prop::collection::vec((0usize..20, 0usize..20), 0..48),
    ) {
        let topology = topology_from(node_count, &raw_edges);
        let mut first = LayoutSession::with_memory_store(SessionOptions::default());
        let mut second = LayoutSession::with_memory_store(SessionOptions::default());
        let a = first.apply_snapshot(&topology, &[]).clone();
        let b = second.apply_snapshot(&topology, &[]).clone();
        prop_assert_eq!(a, b);
    }
}
