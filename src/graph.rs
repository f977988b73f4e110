//! Daily transition graphs and exact structural comparison.
//!
//! A day's graph has one node per distinct location and one directed edge per
//! distinct consecutive transition. Node identities are dropped once the graph
//! is built: only the shape matters for motif equivalence.
//!
//! Graphs are small (at most [`MAX_SUPPORTED_NODES`] nodes), so adjacency is
//! stored as one out-neighbour bitmask per node and isomorphism is decided by
//! a backtracking search over node bijections, pruned by per-node degrees.

use serde::{Deserialize, Serialize};

use crate::sequence::DaySequence;
use crate::LocationId;

/// Hard upper bound on nodes per graph. The permutation search is factorial
/// in node count, so the configurable cap may not exceed this.
pub const MAX_SUPPORTED_NODES: usize = 8;

/// Directed transition graph of a single user-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransitionGraph")]
pub struct TransitionGraph {
    /// `adjacency[i]` has bit `j` set when there is an edge `i -> j`
    adjacency: Vec<u16>,
}

/// Unchecked wire form of [`TransitionGraph`].
#[derive(Deserialize)]
struct RawTransitionGraph {
    adjacency: Vec<u16>,
}

impl TryFrom<RawTransitionGraph> for TransitionGraph {
    type Error = String;

    fn try_from(raw: RawTransitionGraph) -> Result<Self, Self::Error> {
        let nodes = raw.adjacency.len();
        if nodes == 0 || nodes > MAX_SUPPORTED_NODES {
            return Err(format!(
                "graph must have 1 to {} nodes, got {}",
                MAX_SUPPORTED_NODES, nodes
            ));
        }
        for (node, &mask) in raw.adjacency.iter().enumerate() {
            if mask >> nodes != 0 {
                return Err(format!("node {} has an edge to a missing node", node));
            }
            if mask & (1 << node) != 0 {
                return Err(format!("node {} has a self-loop", node));
            }
        }
        Ok(Self {
            adjacency: raw.adjacency,
        })
    }
}

/// Cheap isomorphism invariant used to skip hopeless comparisons.
///
/// Equal signatures are necessary but not sufficient for isomorphism.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphSignature {
    pub node_count: usize,
    pub edge_count: usize,
    /// Sorted `(in_degree, out_degree)` pairs
    pub degrees: Vec<(u32, u32)>,
}

/// Outcome of building the transition graph for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOutcome {
    /// More distinct locations than the configured cap; never classified
    OverCap,
    /// Graph fails the transition-count or degree precondition
    Invalid,
    /// Graph qualifies for classification
    Valid(TransitionGraph),
}

impl GraphOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, GraphOutcome::Valid(_))
    }
}

impl TransitionGraph {
    /// Build a graph from an ordered location sequence.
    ///
    /// Nodes are numbered in order of first appearance. Repeated transitions
    /// collapse into a single edge and self-transitions are ignored.
    /// Returns `None` for an empty sequence or one with more than
    /// [`MAX_SUPPORTED_NODES`] distinct locations.
    ///
    /// # Example
    /// ```
    /// use mobility_motifs::graph::TransitionGraph;
    ///
    /// let graph = TransitionGraph::from_sequence(&[10, 20, 30, 10]).unwrap();
    /// assert_eq!(graph.node_count(), 3);
    /// assert_eq!(graph.edge_count(), 3);
    /// assert!(graph.has_full_degree());
    /// ```
    pub fn from_sequence(locations: &[LocationId]) -> Option<Self> {
        if locations.is_empty() {
            return None;
        }

        let mut nodes: Vec<LocationId> = Vec::with_capacity(MAX_SUPPORTED_NODES);
        let mut indices = Vec::with_capacity(locations.len());
        for loc in locations {
            let idx = match nodes.iter().position(|n| n == loc) {
                Some(idx) => idx,
                None => {
                    if nodes.len() == MAX_SUPPORTED_NODES {
                        return None;
                    }
                    nodes.push(*loc);
                    nodes.len() - 1
                }
            };
            indices.push(idx);
        }

        let mut adjacency = vec![0u16; nodes.len()];
        for pair in indices.windows(2) {
            if pair[0] != pair[1] {
                adjacency[pair[0]] |= 1 << pair[1];
            }
        }

        Some(Self { adjacency })
    }

    /// Build a graph from an explicit node count and edge list.
    ///
    /// Returns `None` if the node count is zero or above
    /// [`MAX_SUPPORTED_NODES`], or an edge references a missing node.
    /// Self-loops are dropped.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Option<Self> {
        if node_count == 0 || node_count > MAX_SUPPORTED_NODES {
            return None;
        }
        let mut adjacency = vec![0u16; node_count];
        for &(from, to) in edges {
            if from >= node_count || to >= node_count {
                return None;
            }
            if from != to {
                adjacency[from] |= 1 << to;
            }
        }
        Some(Self { adjacency })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|m| m.count_ones() as usize).sum()
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency[from] & (1 << to) != 0
    }

    pub fn out_degree(&self, node: usize) -> u32 {
        self.adjacency[node].count_ones()
    }

    pub fn in_degree(&self, node: usize) -> u32 {
        self.adjacency
            .iter()
            .filter(|&&mask| mask & (1 << node) != 0)
            .count() as u32
    }

    fn degree(&self, node: usize) -> (u32, u32) {
        (self.in_degree(node), self.out_degree(node))
    }

    /// True when every node is both entered and left at least once.
    pub fn has_full_degree(&self) -> bool {
        (0..self.node_count()).all(|n| self.in_degree(n) > 0 && self.out_degree(n) > 0)
    }

    pub fn signature(&self) -> GraphSignature {
        let mut degrees: Vec<(u32, u32)> = (0..self.node_count()).map(|n| self.degree(n)).collect();
        degrees.sort_unstable();
        GraphSignature {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            degrees,
        }
    }

    /// Exact directed-graph isomorphism test.
    ///
    /// # Example
    /// ```
    /// use mobility_motifs::graph::TransitionGraph;
    ///
    /// let a = TransitionGraph::from_sequence(&[1, 2, 3, 1]).unwrap();
    /// let b = TransitionGraph::from_sequence(&[7, 9, 8, 7]).unwrap();
    /// let c = TransitionGraph::from_sequence(&[1, 2, 1, 3, 1]).unwrap();
    /// assert!(a.is_isomorphic(&b));
    /// assert!(!a.is_isomorphic(&c));
    /// ```
    pub fn is_isomorphic(&self, other: &TransitionGraph) -> bool {
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        if self.signature() != other.signature() {
            return false;
        }
        self.search_isomorphism(other)
    }

    /// Backtracking search alone. Callers must already know both graphs
    /// have equal signatures.
    pub(crate) fn search_isomorphism(&self, other: &TransitionGraph) -> bool {
        let mut mapping = [0usize; MAX_SUPPORTED_NODES];
        self.extend_mapping(other, 0, &mut mapping, 0)
    }

    /// Try to map `node` (and every node after it) onto unused nodes of
    /// `other`, keeping edges between already-mapped nodes consistent.
    fn extend_mapping(
        &self,
        other: &TransitionGraph,
        node: usize,
        mapping: &mut [usize; MAX_SUPPORTED_NODES],
        used: u16,
    ) -> bool {
        if node == self.node_count() {
            return true;
        }

        let degree = self.degree(node);
        for candidate in 0..other.node_count() {
            if used & (1 << candidate) != 0 || other.degree(candidate) != degree {
                continue;
            }

            let consistent = (0..node).all(|prev| {
                let image = mapping[prev];
                self.has_edge(node, prev) == other.has_edge(candidate, image)
                    && self.has_edge(prev, node) == other.has_edge(image, candidate)
            });
            if !consistent {
                continue;
            }

            mapping[node] = candidate;
            if self.extend_mapping(other, node + 1, mapping, used | (1 << candidate)) {
                return true;
            }
        }

        false
    }
}

/// Build and validate the transition graph of one day.
///
/// - more than `max_uniq_visits` distinct locations: [`GraphOutcome::OverCap`]
/// - one location: always valid
/// - two locations: valid with at least two transitions (a round trip)
/// - three or more: valid with at least `uniq_visits` transitions and every
///   node having in-degree and out-degree of at least one
pub fn transition_graph(day: &DaySequence, max_uniq_visits: u32) -> GraphOutcome {
    if day.uniq_visits == 0 || day.uniq_visits > max_uniq_visits {
        return GraphOutcome::OverCap;
    }

    let graph = match TransitionGraph::from_sequence(&day.locations) {
        Some(graph) => graph,
        None => return GraphOutcome::OverCap,
    };

    match day.uniq_visits {
        1 => GraphOutcome::Valid(graph),
        2 if day.transitions() >= 2 => GraphOutcome::Valid(graph),
        2 => GraphOutcome::Invalid,
        n if day.transitions() >= n as usize && graph.has_full_degree() => GraphOutcome::Valid(graph),
        _ => GraphOutcome::Invalid,
    }
}
