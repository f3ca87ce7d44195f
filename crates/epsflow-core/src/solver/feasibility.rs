use crate::graph::FlowGraph;
use crate::max_flow::MaxFlow;
use crate::solver::{GenericMinCostFlow, Status};

impl<'a, G: FlowGraph> GenericMinCostFlow<'a, G> {
    /// Checks that the supplies and demands can be matched without exceeding
    /// a bottleneck, by routing them through an auxiliary max-flow instance
    /// with a super source feeding every supply and a super sink draining
    /// every demand. Populates the feasible supplies either way; returns
    /// whether the full supply could be routed.
    pub fn check_feasibility(&mut self) -> bool {
        let graph = self.graph;
        let num_nodes = graph.num_nodes();
        let source = num_nodes;
        let sink = num_nodes + 1;
        let mut oracle = MaxFlow::new(num_nodes + 2);
        for arc in 0..graph.num_arcs() {
            oracle.add_arc(graph.tail(arc), graph.head(arc), self.capacity(arc));
        }
        let mut supply_handles = Vec::new();
        let mut total_supply = 0_i64;
        for node in 0..num_nodes {
            let supply = self.initial_node_excess[node];
            if supply > 0 {
                supply_handles.push((node, oracle.add_arc(source, node, supply)));
                total_supply += supply;
            } else if supply < 0 {
                supply_handles.push((node, oracle.add_arc(node, sink, -supply)));
            }
        }
        let routed = oracle.solve(source, sink);
        for slot in &mut self.feasible_node_excess {
            *slot = 0;
        }
        for (node, handle) in supply_handles {
            let flow = oracle.flow(handle);
            self.feasible_node_excess[node] = if self.initial_node_excess[node] > 0 {
                flow
            } else {
                -flow
            };
        }
        self.feasibility_checked = true;
        routed == total_supply
    }

    /// Truncates the supplies and demands to the levels the network can
    /// route, as recorded by [`check_feasibility`](Self::check_feasibility).
    /// Returns `false` when feasibility was never checked.
    pub fn make_feasible(&mut self) -> bool {
        if !self.feasibility_checked {
            return false;
        }
        for node in 0..self.graph.num_nodes() {
            let feasible = self.feasible_node_excess[node];
            self.node_excess[node] = feasible;
            self.initial_node_excess[node] = feasible;
        }
        self.status = Status::NotSolved;
        true
    }
}
