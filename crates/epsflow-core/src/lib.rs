pub mod graph;
pub mod max_flow;
pub mod reference;
pub mod simple;
pub mod solver;

pub use graph::{ArcIndex, FlowGraph, NodeIndex, ReverseArcGraph};
pub use simple::SimpleMinCostFlow;
pub use solver::{GenericMinCostFlow, SolveStats, SolverOptions, Status};

#[derive(Debug)]
pub enum FlowError {
    InvalidInput(String),
}
