use std::collections::VecDeque;

/// Blocking-flow max-flow solver used as the feasibility oracle.
///
/// The interface is deliberately narrow: add arcs up front, run `solve`
/// once, then read back per-arc flow through the handle `add_arc` returned.
#[derive(Debug, Clone)]
struct Edge {
    to: usize,
    rev: usize,
    cap: i64,
}

#[derive(Debug)]
pub struct MaxFlow {
    graph: Vec<Vec<Edge>>,
    handles: Vec<(usize, usize, i64)>,
}

/// Identifies an arc added with [`MaxFlow::add_arc`].
pub type ArcHandle = usize;

impl MaxFlow {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            graph: vec![Vec::new(); num_nodes],
            handles: Vec::new(),
        }
    }

    pub fn add_arc(&mut self, from: usize, to: usize, capacity: i64) -> ArcHandle {
        debug_assert!(capacity >= 0);
        let from_index = self.graph[from].len();
        let to_index = self.graph[to].len();
        self.graph[from].push(Edge {
            to,
            rev: to_index,
            cap: capacity,
        });
        self.graph[to].push(Edge {
            to: from,
            rev: from_index,
            cap: 0,
        });
        self.handles.push((from, from_index, capacity));
        self.handles.len() - 1
    }

    /// Flow currently on the arc, i.e. consumed capacity.
    pub fn flow(&self, handle: ArcHandle) -> i64 {
        let (node, index, capacity) = self.handles[handle];
        capacity - self.graph[node][index].cap
    }

    pub fn solve(&mut self, source: usize, sink: usize) -> i64 {
        let mut total = 0_i64;
        let mut level = vec![-1_i32; self.graph.len()];
        let mut cursor = vec![0_usize; self.graph.len()];
        while self.assign_levels(source, sink, &mut level) {
            cursor.fill(0);
            loop {
                let pushed = self.augment(source, sink, i64::MAX, &level, &mut cursor);
                if pushed == 0 {
                    break;
                }
                total += pushed;
            }
        }
        total
    }

    fn assign_levels(&self, source: usize, sink: usize, level: &mut [i32]) -> bool {
        level.fill(-1);
        level[source] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            for edge in &self.graph[node] {
                if edge.cap > 0 && level[edge.to] < 0 {
                    level[edge.to] = level[node] + 1;
                    queue.push_back(edge.to);
                }
            }
        }
        level[sink] >= 0
    }

    fn augment(
        &mut self,
        node: usize,
        sink: usize,
        limit: i64,
        level: &[i32],
        cursor: &mut [usize],
    ) -> i64 {
        if node == sink {
            return limit;
        }
        while cursor[node] < self.graph[node].len() {
            let edge_index = cursor[node];
            let (to, cap) = {
                let edge = &self.graph[node][edge_index];
                (edge.to, edge.cap)
            };
            if cap > 0 && level[to] == level[node] + 1 {
                let pushed = self.augment(to, sink, limit.min(cap), level, cursor);
                if pushed > 0 {
                    let rev = self.graph[node][edge_index].rev;
                    self.graph[node][edge_index].cap -= pushed;
                    self.graph[to][rev].cap += pushed;
                    return pushed;
                }
            }
            cursor[node] += 1;
        }
        0
    }
}
