use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use swarmview::{
    Component, LayoutConfig, LayoutSession, NodeRole, QueueStat, SessionOptions, Topology,
    build_graph, compute_layout,
};

fn dense_topology(node_count: usize, extra_edges: usize) -> Topology {
    let mut topology = Topology::new();
    if node_count == 0 {
        return topology;
    }
    for index in 0..node_count {
        let role = if index == 0 {
            NodeRole::Generator
        } else {
            NodeRole::Processor
        };
        topology.add_node(&format!("n{index}"), role, Some("bench"));
    }
    for index in 0..node_count.saturating_sub(1) {
        topology.add_edge(
            &format!("n{index}"),
            &format!("n{}", index + 1),
            &format!("q{index}"),
        );
    }
    let mut count = 0usize;
    'outer: for from in 0..node_count {
        for to in (from + 2)..node_count {
            if count >= extra_edges {
                break 'outer;
            }
            topology.add_edge(&format!("n{from}"), &format!("n{to}"), &format!("x{from}-{to}"));
            count += 1;
        }
    }
    topology
}

fn components_for(topology: &Topology) -> Vec<Component> {
    topology
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let mut component = Component::new(&node.id, node.role);
            component.queues.push(QueueStat {
                name: format!("q{index}"),
                depth: (index as u64 * 7) % 300,
                rate: Some(index as f32),
            });
            component
        })
        .collect()
}

fn bench_compute_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");
    for (name, nodes, extra) in [
        ("small", 12usize, 6usize),
        ("medium", 60, 40),
        ("large", 200, 150),
    ] {
        let topology = dense_topology(nodes, extra);
        let config = LayoutConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(name), &topology, |b, topology| {
            b.iter(|| {
                let graph = build_graph(black_box(topology), None, &config.reserved_scopes);
                black_box(compute_layout(&graph, &config))
            })
        });
    }
    group.finish();
}

fn bench_apply_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_snapshot");
    for (name, nodes, extra) in [("medium", 60usize, 40usize), ("large", 200, 150)] {
        let topology = dense_topology(nodes, extra);
        let components = components_for(&topology);
        group.bench_with_input(BenchmarkId::from_parameter(name), &topology, |b, topology| {
            let mut session = LayoutSession::with_memory_store(SessionOptions::default());
            b.iter(|| {
                black_box(session.apply_snapshot(topology, &components));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_layout, bench_apply_snapshot);
criterion_main!(benches);
