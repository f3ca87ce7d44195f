mod core;

pub use self::core::ReverseArcGraph;

pub type NodeIndex = usize;
pub type ArcIndex = usize;

/// Capability set the solver is generic over. Arc indices live in
/// `0..2 * num_arcs()`: `0..num_arcs()` are the direct arcs in insertion
/// order, and `opposite(a)` maps each arc to its reverse in O(1).
pub trait FlowGraph {
    fn num_nodes(&self) -> usize;

    /// Number of direct arcs. Reverse arcs are not counted.
    fn num_arcs(&self) -> usize;

    fn head(&self, arc: ArcIndex) -> NodeIndex;

    fn tail(&self, arc: ArcIndex) -> NodeIndex;

    fn opposite(&self, arc: ArcIndex) -> ArcIndex;

    fn is_direct(&self, arc: ArcIndex) -> bool;

    /// All arcs leaving `node` in the residual sense: its direct out-arcs
    /// and the reverses of its in-arcs, in ascending arc order. The order is
    /// stable for the lifetime of the graph; per-node cursors index into
    /// this slice.
    fn incident_arcs(&self, node: NodeIndex) -> &[ArcIndex];
}
