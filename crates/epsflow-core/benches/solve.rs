use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use epsflow_core::{GenericMinCostFlow, ReverseArcGraph, SolverOptions};

#[derive(Clone)]
struct BenchRng(u64);

impl BenchRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.0
    }

    fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }
}

struct BenchInstance {
    graph: ReverseArcGraph,
    capacities: Vec<i64>,
    costs: Vec<i64>,
    supplies: Vec<i64>,
}

fn build_instance(node_count: usize, arc_count: usize) -> BenchInstance {
    let mut rng = BenchRng::new(42);
    let mut arcs = Vec::with_capacity(arc_count);
    let mut capacities = Vec::with_capacity(arc_count);
    let mut costs = Vec::with_capacity(arc_count);

    for _ in 0..arc_count {
        let tail = rng.next_usize(node_count);
        let mut head = rng.next_usize(node_count);
        if head == tail {
            head = (head + 1) % node_count;
        }
        arcs.push((tail, head));
        capacities.push(20);
        costs.push((rng.next_u64() % 50) as i64 + 1);
    }
    // A chain so that every supply can reach the sink regardless of the
    // random arcs.
    for node in 0..node_count - 1 {
        arcs.push((node, node + 1));
        capacities.push(5);
        costs.push(60);
    }

    let mut supplies = vec![0_i64; node_count];
    supplies[0] = 40;
    supplies[node_count - 1] = -40;

    let graph = ReverseArcGraph::from_arcs(node_count, &arcs).expect("valid bench instance");
    BenchInstance {
        graph,
        capacities,
        costs,
        supplies,
    }
}

fn solve_instance(instance: &BenchInstance, options: SolverOptions) -> i64 {
    let mut solver = GenericMinCostFlow::new(&instance.graph, options);
    for arc in 0..instance.capacities.len() {
        solver.set_arc_capacity(arc, instance.capacities[arc]);
        solver.set_arc_unit_cost(arc, instance.costs[arc]);
    }
    for (node, &supply) in instance.supplies.iter().enumerate() {
        if supply != 0 {
            solver.set_node_supply(node, supply);
        }
    }
    solver.solve();
    solver.optimal_cost()
}

fn bench_cost_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_scaling_solve");
    for &(node_count, arc_count) in &[(100, 400), (300, 1500)] {
        let instance = build_instance(node_count, arc_count);
        group.throughput(Throughput::Elements(instance.capacities.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("with_price_update", arc_count),
            &instance,
            |b, instance| b.iter(|| solve_instance(instance, SolverOptions::default())),
        );
        group.bench_with_input(
            BenchmarkId::new("without_price_update", arc_count),
            &instance,
            |b, instance| {
                b.iter(|| {
                    solve_instance(
                        instance,
                        SolverOptions {
                            use_price_update: false,
                            ..SolverOptions::default()
                        },
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_cost_scaling);
criterion_main!(benches);
