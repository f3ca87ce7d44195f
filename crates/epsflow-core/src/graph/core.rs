use crate::graph::{ArcIndex, FlowGraph, NodeIndex};
use crate::FlowError;

/// Static directed multigraph with an implicit reverse arc per direct arc.
///
/// Direct arcs keep their insertion index in `0..m`; the reverse of arc `a`
/// is `a + m`. Endpoints are stored once for the whole `0..2m` range so that
/// `head` and `tail` are plain array reads, and a CSR index groups every arc
/// by its tail for incident-arc scans.
#[derive(Debug, Clone)]
pub struct ReverseArcGraph {
    num_nodes: usize,
    num_arcs: usize,
    arc_head: Vec<u32>,
    incident_start: Vec<usize>,
    incident: Vec<ArcIndex>,
}

impl ReverseArcGraph {
    pub fn from_arcs(num_nodes: usize, arcs: &[(NodeIndex, NodeIndex)]) -> Result<Self, FlowError> {
        if num_nodes > u32::MAX as usize {
            return Err(FlowError::InvalidInput("node count exceeds u32".to_string()));
        }
        let num_arcs = arcs.len();
        for &(tail, head) in arcs {
            if tail >= num_nodes || head >= num_nodes {
                return Err(FlowError::InvalidInput(
                    "arc endpoint outside node range".to_string(),
                ));
            }
        }

        let mut arc_head = vec![0_u32; 2 * num_arcs];
        for (idx, &(tail, head)) in arcs.iter().enumerate() {
            arc_head[idx] = head as u32;
            arc_head[idx + num_arcs] = tail as u32;
        }

        // Counting sort of all 2m arcs by tail; iterating arcs in increasing
        // index keeps each node's incident list in ascending arc order.
        let mut degree = vec![0_usize; num_nodes + 1];
        for arc in 0..2 * num_arcs {
            let tail = arc_head[opposite_of(arc, num_arcs)] as usize;
            degree[tail + 1] += 1;
        }
        for node in 0..num_nodes {
            degree[node + 1] += degree[node];
        }
        let incident_start = degree.clone();
        let mut fill = degree;
        let mut incident = vec![0_usize; 2 * num_arcs];
        for arc in 0..2 * num_arcs {
            let tail = arc_head[opposite_of(arc, num_arcs)] as usize;
            incident[fill[tail]] = arc;
            fill[tail] += 1;
        }

        Ok(Self {
            num_nodes,
            num_arcs,
            arc_head,
            incident_start,
            incident,
        })
    }
}

fn opposite_of(arc: ArcIndex, num_arcs: usize) -> ArcIndex {
    if arc < num_arcs {
        arc + num_arcs
    } else {
        arc - num_arcs
    }
}

impl FlowGraph for ReverseArcGraph {
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    fn head(&self, arc: ArcIndex) -> NodeIndex {
        self.arc_head[arc] as NodeIndex
    }

    fn tail(&self, arc: ArcIndex) -> NodeIndex {
        self.arc_head[opposite_of(arc, self.num_arcs)] as NodeIndex
    }

    fn opposite(&self, arc: ArcIndex) -> ArcIndex {
        opposite_of(arc, self.num_arcs)
    }

    fn is_direct(&self, arc: ArcIndex) -> bool {
        arc < self.num_arcs
    }

    fn incident_arcs(&self, node: NodeIndex) -> &[ArcIndex] {
        &self.incident[self.incident_start[node]..self.incident_start[node + 1]]
    }
}
