use crate::graph::{ArcIndex, NodeIndex, ReverseArcGraph};
use crate::solver::{GenericMinCostFlow, SolverOptions, Status};

/// One-shot interface over the generic solver: accumulate arcs and supplies
/// (node indices grow lazily), call [`solve`](Self::solve), read back flows.
/// Trades a little memory for not having to build the static graph by hand.
#[derive(Debug)]
pub struct SimpleMinCostFlow {
    arc_tail: Vec<NodeIndex>,
    arc_head: Vec<NodeIndex>,
    arc_capacity: Vec<i64>,
    arc_unit_cost: Vec<i64>,
    node_supply: Vec<i64>,
    arc_flow: Vec<i64>,
    feasible_supply: Vec<i64>,
    optimal_cost: i64,
    status: Status,
    options: SolverOptions,
}

impl Default for SimpleMinCostFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleMinCostFlow {
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self {
            arc_tail: Vec::new(),
            arc_head: Vec::new(),
            arc_capacity: Vec::new(),
            arc_unit_cost: Vec::new(),
            node_supply: Vec::new(),
            arc_flow: Vec::new(),
            feasible_supply: Vec::new(),
            optimal_cost: 0,
            status: Status::NotSolved,
            options,
        }
    }

    pub fn add_arc_with_capacity_and_unit_cost(
        &mut self,
        tail: NodeIndex,
        head: NodeIndex,
        capacity: i64,
        unit_cost: i64,
    ) -> ArcIndex {
        self.reserve_node(tail.max(head));
        self.arc_tail.push(tail);
        self.arc_head.push(head);
        self.arc_capacity.push(capacity);
        self.arc_unit_cost.push(unit_cost);
        self.arc_flow.push(0);
        self.status = Status::NotSolved;
        self.arc_tail.len() - 1
    }

    pub fn set_node_supply(&mut self, node: NodeIndex, supply: i64) {
        self.reserve_node(node);
        self.node_supply[node] = supply;
        self.status = Status::NotSolved;
    }

    pub fn solve(&mut self) -> Status {
        let arcs: Vec<(NodeIndex, NodeIndex)> = self
            .arc_tail
            .iter()
            .copied()
            .zip(self.arc_head.iter().copied())
            .collect();
        let graph = match ReverseArcGraph::from_arcs(self.node_supply.len(), &arcs) {
            Ok(graph) => graph,
            Err(_) => {
                self.status = Status::BadResult;
                return self.status;
            }
        };
        let mut solver = GenericMinCostFlow::new(&graph, self.options.clone());
        for (node, &supply) in self.node_supply.iter().enumerate() {
            if supply != 0 {
                solver.set_node_supply(node, supply);
            }
        }
        for arc in 0..self.arc_capacity.len() {
            solver.set_arc_capacity(arc, self.arc_capacity[arc]);
            solver.set_arc_unit_cost(arc, self.arc_unit_cost[arc]);
        }
        let solved = solver.solve();
        self.status = solver.status();
        self.feasible_supply = (0..self.node_supply.len())
            .map(|node| solver.feasible_supply(node))
            .collect();
        if solved {
            self.optimal_cost = solver.optimal_cost();
            for arc in 0..self.arc_flow.len() {
                self.arc_flow[arc] = solver.flow(arc);
            }
        }
        self.status
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn optimal_cost(&self) -> i64 {
        self.optimal_cost
    }

    pub fn num_nodes(&self) -> usize {
        self.node_supply.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arc_tail.len()
    }

    pub fn tail(&self, arc: ArcIndex) -> NodeIndex {
        self.arc_tail[arc]
    }

    pub fn head(&self, arc: ArcIndex) -> NodeIndex {
        self.arc_head[arc]
    }

    pub fn capacity(&self, arc: ArcIndex) -> i64 {
        self.arc_capacity[arc]
    }

    pub fn unit_cost(&self, arc: ArcIndex) -> i64 {
        self.arc_unit_cost[arc]
    }

    pub fn supply(&self, node: NodeIndex) -> i64 {
        self.node_supply[node]
    }

    /// Flow on `arc` found by the last successful solve.
    pub fn flow(&self, arc: ArcIndex) -> i64 {
        self.arc_flow[arc]
    }

    /// Feasible supply recorded by the last solve's feasibility check; zero
    /// for nodes without supply or demand.
    pub fn feasible_supply(&self, node: NodeIndex) -> i64 {
        self.feasible_supply.get(node).copied().unwrap_or(0)
    }

    fn reserve_node(&mut self, node: NodeIndex) {
        if node >= self.node_supply.len() {
            self.node_supply.resize(node + 1, 0);
        }
    }
}
