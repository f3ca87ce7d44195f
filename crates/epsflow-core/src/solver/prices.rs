use crate::graph::FlowGraph;
use crate::solver::GenericMinCostFlow;

const UNSEEN: i64 = i64::MAX;

impl<'a, G: FlowGraph> GenericMinCostFlow<'a, G> {
    /// Bulk price update: a reverse BFS from the deficit nodes over residual
    /// arcs sorts the nodes into admissibility layers, and each node's
    /// potential drops by the accumulated delta of the layer it settles in.
    ///
    /// A node settles once lowering it by the current delta would make one
    /// of its residual arcs into the settled set admissible. Since the delta
    /// grows in epsilon steps past the tightest such slack, no settled
    /// node ever drops by more than that slack plus epsilon, which keeps
    /// every residual arc's reduced cost at or above minus epsilon.
    pub(crate) fn update_prices(&mut self) {
        self.stats.price_updates += 1;
        let graph = self.graph;
        let num_nodes = graph.num_nodes();
        let mut queue: Vec<usize> = Vec::new();
        let mut settled = vec![false; num_nodes];
        let mut slack = vec![UNSEEN; num_nodes];
        let mut pending: Vec<usize> = Vec::new();
        let mut delta = 0_i64;

        for node in 0..num_nodes {
            if self.node_excess[node] < 0 {
                settled[node] = true;
                queue.push(node);
            }
        }
        if queue.is_empty() {
            return;
        }

        let mut queue_index = 0;
        loop {
            while queue_index < queue.len() {
                let node = queue[queue_index];
                queue_index += 1;
                for &arc in graph.incident_arcs(node) {
                    let reverse = graph.opposite(arc);
                    if self.residual_arc_capacity[reverse] <= 0 {
                        continue;
                    }
                    let neighbor = graph.head(arc);
                    if settled[neighbor] {
                        continue;
                    }
                    // Reduced-cost slack of the residual arc neighbor->node,
                    // with node already at its final potential.
                    let arc_slack = self.scaled_arc_unit_cost[reverse]
                        + self.node_potential[neighbor]
                        - self.node_potential[node];
                    if arc_slack < delta {
                        self.node_potential[neighbor] -= delta;
                        settled[neighbor] = true;
                        queue.push(neighbor);
                    } else if arc_slack < slack[neighbor] {
                        if slack[neighbor] == UNSEEN {
                            pending.push(neighbor);
                        }
                        slack[neighbor] = arc_slack;
                    }
                }
            }

            pending.retain(|&node| !settled[node]);
            let tightest = match pending.iter().map(|&node| slack[node]).min() {
                Some(value) => value,
                None => break,
            };
            // The next multiple of epsilon strictly past the tightest slack.
            delta = (tightest / self.epsilon + 1) * self.epsilon;
            for index in 0..pending.len() {
                let node = pending[index];
                if slack[node] < delta {
                    self.node_potential[node] -= delta;
                    settled[node] = true;
                    queue.push(node);
                }
            }
        }

        // Whatever never reached a deficit has no residual arc into the
        // settled set and can drop uniformly.
        if delta > 0 {
            for node in 0..num_nodes {
                if !settled[node] {
                    self.node_potential[node] -= delta;
                }
            }
        }
        self.reset_first_admissible_arcs();
    }
}
