use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use tui_tree_node::{project, AnimationOverrides, Animator, NodeProps, Spring, TreeNode};

fn example_props() -> NodeProps<'static, &'static str> {
    NodeProps::new("b", "Bravo")
        .node_type("dir")
        .can_hide(true)
        .nested("Charlie\nDelta\nEcho\nFoxtrot\nGolf")
}

fn init(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("init");
    group.throughput(Throughput::Elements(1));

    group.bench_function("leaf", |bencher| {
        bencher.iter(|| {
            black_box(TreeNode::new(black_box(NodeProps::new("a", "Alfa"))));
        });
    });

    group.bench_function("example-props", |bencher| {
        bencher.iter(|| {
            black_box(TreeNode::new(black_box(example_props())));
        });
    });

    group.finish();
}

fn projects(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("project");
    group.throughput(Throughput::Elements(1));

    let node = TreeNode::new(example_props().open(true));
    group.bench_function("example-props", |bencher| {
        bencher.iter(|| black_box(project(black_box(node.state()), black_box(node.props()))));
    });

    group.finish();
}

fn renders(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("render");
    group.throughput(Throughput::Elements(1)); // Frames per second

    let buffer_size = Rect::new(0, 0, 100, 100);

    group.bench_function("leaf", |bencher| {
        bencher.iter_batched(
            || TreeNode::new(NodeProps::new("a", "Alfa")),
            |mut node| {
                let mut buffer = Buffer::empty(buffer_size);
                black_box(&mut node).render(buffer_size, black_box(&mut buffer));
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("expanded", |bencher| {
        bencher.iter_batched(
            || {
                let mut node = TreeNode::new(example_props());
                node.toggle_expansion();
                node.tick(Duration::from_secs(2));
                node
            },
            |mut node| {
                let mut buffer = Buffer::empty(buffer_size);
                black_box(&mut node).render(buffer_size, black_box(&mut buffer));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn springs(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("spring");
    group.throughput(Throughput::Elements(1));

    let transition = AnimationOverrides::default().transition(true, false);
    group.bench_function("frame", |bencher| {
        bencher.iter_batched(
            || {
                let mut spring = Spring::default();
                spring.animate(&transition);
                spring
            },
            |mut spring| black_box(spring.tick(black_box(Duration::from_millis(16)))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("settle", |bencher| {
        bencher.iter_batched(
            || {
                let mut spring = Spring::default();
                spring.animate(&transition);
                spring
            },
            |mut spring| while spring.tick(black_box(Duration::from_millis(16))) {},
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Create flamegraphs with `cargo bench --bench bench -- --profile-time=5`
#[cfg(unix)]
fn profiled() -> Criterion {
    use pprof::criterion::{Output, PProfProfiler};
    Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}
#[cfg(not(unix))]
fn profiled() -> Criterion {
    Criterion::default()
}

criterion_group! {
    name = benches;
    config = profiled();
    targets = init, projects, renders, springs
}
criterion_main!(benches);
