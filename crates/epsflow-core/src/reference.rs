//! Exact successive-shortest-path solver used as a cross-check oracle by
//! the randomized tests. Slow but simple: Bellman-Ford over the residual
//! network, augmenting along a cheapest path until every supply is routed.

/// Solves the instance exactly. Supplies must sum to zero and costs must not
/// form a negative-cost residual cycle. Returns the per-arc flows and the
/// total cost, or `None` when the supplies cannot be routed.
pub fn solve_exact(
    num_nodes: usize,
    arcs: &[(usize, usize)],
    capacities: &[i64],
    unit_costs: &[i64],
    supplies: &[i64],
) -> Option<(Vec<i64>, i64)> {
    let source = num_nodes;
    let sink = num_nodes + 1;
    let mut network = Network::new(num_nodes + 2);

    for (index, &(tail, head)) in arcs.iter().enumerate() {
        network.link(tail, head, capacities[index], unit_costs[index]);
    }
    let mut remaining = 0_i64;
    for (node, &supply) in supplies.iter().enumerate() {
        if supply > 0 {
            network.link(source, node, supply, 0);
            remaining += supply;
        } else if supply < 0 {
            network.link(node, sink, -supply, 0);
        }
    }

    while remaining > 0 {
        let (distance, parent) = network.cheapest_path(source);
        if distance[sink] >= i64::MAX / 8 {
            return None;
        }
        let mut bottleneck = remaining;
        let mut node = sink;
        while node != source {
            let arc = parent[node];
            bottleneck = bottleneck.min(network.arcs[arc].residual);
            node = network.tail_of(arc);
        }
        let mut node = sink;
        while node != source {
            let arc = parent[node];
            network.arcs[arc].residual -= bottleneck;
            network.arcs[arc ^ 1].residual += bottleneck;
            node = network.tail_of(arc);
        }
        remaining -= bottleneck;
    }

    let mut flows = Vec::with_capacity(arcs.len());
    let mut total: i128 = 0;
    for (index, _) in arcs.iter().enumerate() {
        let flow = network.arcs[2 * index + 1].residual;
        flows.push(flow);
        total += flow as i128 * unit_costs[index] as i128;
    }
    Some((flows, total as i64))
}

struct ResidualArc {
    to: usize,
    residual: i64,
    cost: i64,
}

struct Network {
    arcs: Vec<ResidualArc>,
    outgoing: Vec<Vec<usize>>,
}

impl Network {
    fn new(num_nodes: usize) -> Self {
        Self {
            arcs: Vec::new(),
            outgoing: vec![Vec::new(); num_nodes],
        }
    }

    // Arcs are stored in pairs; `arc ^ 1` is the reverse.
    fn link(&mut self, from: usize, to: usize, capacity: i64, cost: i64) {
        self.outgoing[from].push(self.arcs.len());
        self.arcs.push(ResidualArc {
            to,
            residual: capacity,
            cost,
        });
        self.outgoing[to].push(self.arcs.len());
        self.arcs.push(ResidualArc {
            to: from,
            residual: 0,
            cost: -cost,
        });
    }

    fn tail_of(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].to
    }

    fn cheapest_path(&self, source: usize) -> (Vec<i64>, Vec<usize>) {
        let num_nodes = self.outgoing.len();
        let unreachable = i64::MAX / 4;
        let mut distance = vec![unreachable; num_nodes];
        let mut parent = vec![usize::MAX; num_nodes];
        distance[source] = 0;
        for _ in 0..num_nodes {
            let mut updated = false;
            for node in 0..num_nodes {
                if distance[node] >= unreachable {
                    continue;
                }
                for &arc in &self.outgoing[node] {
                    let edge = &self.arcs[arc];
                    if edge.residual <= 0 {
                        continue;
                    }
                    let candidate = distance[node] + edge.cost;
                    if candidate < distance[edge.to] {
                        distance[edge.to] = candidate;
                        parent[edge.to] = arc;
                        updated = true;
                    }
                }
            }
            if !updated {
                break;
            }
        }
        (distance, parent)
    }
}
