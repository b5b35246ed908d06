//! The ZX-diagram: an open, labeled, undirected graph of Z-/X-spiders and
//! boundary vertices, with plain or Hadamard edges.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use qsynth_core::Phase;
use rustc_hash::FxHashSet;

/// A vertex's role in the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexKind {
    /// A circuit input, numbered by qubit.
    Input(usize),
    /// A circuit output, numbered by qubit.
    Output(usize),
    /// A Z-spider with the given phase.
    Z(Phase),
    /// An X-spider with the given phase.
    X(Phase),
}

impl VertexKind {
    pub fn is_boundary(&self) -> bool {
        matches!(self, VertexKind::Input(_) | VertexKind::Output(_))
    }

    pub fn phase(&self) -> Phase {
        match self {
            VertexKind::Z(p) | VertexKind::X(p) => *p,
            _ => Phase::ZERO,
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        match self {
            VertexKind::Z(p) | VertexKind::X(p) => *p = phase,
            _ => {}
        }
    }
}

/// Edge types: `Plain` composes spiders of the same color identically;
/// `Hadamard` inserts a Hadamard between the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Plain,
    Hadamard,
}

/// An open ZX-diagram over a fixed number of qubits, built up gate by gate
/// or consumed by the extractor.
#[derive(Debug, Clone)]
pub struct ZxGraph {
    graph: UnGraph<VertexKind, EdgeKind>,
    inputs: Vec<NodeIndex>,
    outputs: Vec<NodeIndex>,
    /// Vertices the extractor has absorbed into the frontier. Kept as a
    /// tombstone set rather than calling `remove_node`, which would
    /// swap-remove and silently invalidate every other tracked index.
    removed: FxHashSet<NodeIndex>,
}

impl ZxGraph {
    /// An identity diagram on `n_qubits` wires: each input connected
    /// directly to its output by a plain edge.
    pub fn identity(n_qubits: usize) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut inputs = Vec::with_capacity(n_qubits);
        let mut outputs = Vec::with_capacity(n_qubits);
        for q in 0..n_qubits {
            let i = graph.add_node(VertexKind::Input(q));
            let o = graph.add_node(VertexKind::Output(q));
            graph.add_edge(i, o, EdgeKind::Plain);
            inputs.push(i);
            outputs.push(o);
        }
        ZxGraph {
            graph,
            inputs,
            outputs,
            removed: FxHashSet::default(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.inputs.len()
    }

    pub fn input(&self, q: usize) -> NodeIndex {
        self.inputs[q]
    }

    pub fn output(&self, q: usize) -> NodeIndex {
        self.outputs[q]
    }

    pub fn inputs(&self) -> &[NodeIndex] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[NodeIndex] {
        &self.outputs
    }

    pub fn kind(&self, v: NodeIndex) -> VertexKind {
        self.graph[v]
    }

    pub fn set_phase(&mut self, v: NodeIndex, phase: Phase) {
        self.graph[v].set_phase(phase);
    }

    pub fn add_z(&mut self, phase: Phase) -> NodeIndex {
        self.graph.add_node(VertexKind::Z(phase))
    }

    pub fn add_x(&mut self, phase: Phase) -> NodeIndex {
        self.graph.add_node(VertexKind::X(phase))
    }

    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, kind: EdgeKind) {
        self.graph.add_edge(a, b, kind);
    }

    /// Remove the edge between `a` and `b`, if any.
    pub fn remove_edge(&mut self, a: NodeIndex, b: NodeIndex) {
        if let Some(e) = self.graph.find_edge(a, b) {
            self.graph.remove_edge(e);
        }
    }

    pub fn edge_kind(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeKind> {
        self.graph
            .find_edge(a, b)
            .map(|e| self.graph[e])
    }

    pub fn is_removed(&self, v: NodeIndex) -> bool {
        self.removed.contains(&v)
    }

    pub fn neighbors(&self, v: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .neighbors(v)
            .filter(move |n| !self.removed.contains(n))
    }

    pub fn degree(&self, v: NodeIndex) -> usize {
        self.neighbors(v).count()
    }

    /// Tombstone `v`: it stops appearing in `neighbors`/`edges_of`/
    /// `num_vertices`, but keeps its `NodeIndex` stable for every other
    /// vertex still tracked by the caller.
    pub fn remove_vertex(&mut self, v: NodeIndex) {
        self.removed.insert(v);
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.node_count() - self.removed.len()
    }

    pub fn edges_of(&self, v: NodeIndex) -> impl Iterator<Item = (NodeIndex, EdgeKind)> + '_ {
        self.graph
            .edges(v)
            .filter(move |e| {
                let other = if e.source() == v { e.target() } else { e.source() };
                !self.removed.contains(&other)
            })
            .map(move |e| (if e.source() == v { e.target() } else { e.source() }, *e.weight()))
    }
}
