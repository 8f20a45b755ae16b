use std::collections::{HashMap, VecDeque};

use log::{debug, warn};

use crate::error::NeuroGradError;
use crate::tensor::{NodeId, Tensor};

/// The part of the computation graph reachable from a set of roots through
/// differentiable nodes, indexed for one backward pass.
///
/// Node indices follow breadth-first discovery order. That order is also the order in
/// which a node's consumers are listed, and therefore the order in which their
/// contributions are folded into the node's gradient.
#[derive(Debug)]
pub(crate) struct InducedGraph {
    pub(crate) nodes: Vec<Tensor>,
    pub(crate) index: HashMap<NodeId, usize>,
    /// `consumers[i]`: one `(consumer index, input position)` pair per edge leaving node `i`.
    pub(crate) consumers: Vec<Vec<(usize, usize)>>,
    /// `targets[i][pos]`: the `(input index, inbox slot)` filled by the gradient that
    /// node `i` produces for its input `pos`, or `None` for a non-differentiable input.
    pub(crate) targets: Vec<Vec<Option<(usize, usize)>>>,
    /// Indices of the distinct differentiable roots, in call order.
    pub(crate) roots: Vec<usize>,
}

impl InducedGraph {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges in the subgraph.
    pub(crate) fn edge_count(&self) -> usize {
        self.consumers.iter().map(Vec::len).sum()
    }

    fn insert(&mut self, node: &Tensor) -> (usize, bool) {
        if let Some(&idx) = self.index.get(&node.id()) {
            return (idx, false);
        }
        let idx = self.nodes.len();
        self.nodes.push(node.clone());
        self.index.insert(node.id(), idx);
        self.consumers.push(Vec::new());
        self.targets.push(Vec::new());
        (idx, true)
    }
}

/// Walks the graph breadth-first from `roots` and builds the induced subgraph.
///
/// Non-differentiable roots are skipped and duplicate roots collapse into one.
///
/// # Errors
/// Returns `NeuroGradError::InvariantViolation` if an input is not strictly older (by
/// generation) than the node consuming it, which can only happen on a cycle.
pub(crate) fn discover(roots: &[Tensor]) -> Result<InducedGraph, NeuroGradError> {
    let mut graph = InducedGraph {
        nodes: Vec::new(),
        index: HashMap::new(),
        consumers: Vec::new(),
        targets: Vec::new(),
        roots: Vec::new(),
    };
    let mut queue = VecDeque::new();

    for root in roots {
        if !root.requires_grad() {
            warn!("backward: skipping root {} which does not require grad", root.id());
            continue;
        }
        let (idx, fresh) = graph.insert(root);
        if fresh {
            graph.roots.push(idx);
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let node = graph.nodes[idx].clone();
        let Some(origin) = node.origin() else {
            continue;
        };
        for (pos, input) in origin.inputs().iter().enumerate() {
            if !input.requires_grad() {
                graph.targets[idx].push(None);
                continue;
            }
            if input.generation() >= node.generation() {
                return Err(NeuroGradError::InvariantViolation(format!(
                    "input {} (generation {}) of {} (generation {}) is not older than its consumer",
                    input.id(),
                    input.generation(),
                    node.id(),
                    node.generation()
                )));
            }
            let (input_idx, fresh) = graph.insert(input);
            if fresh {
                queue.push_back(input_idx);
            }
            let slot = graph.consumers[input_idx].len();
            graph.consumers[input_idx].push((idx, pos));
            graph.targets[idx].push(Some((input_idx, slot)));
        }
    }

    debug!(
        "discovered {} nodes and {} edges from {} roots",
        graph.len(),
        graph.edge_count(),
        graph.roots.len()
    );
    Ok(graph)
}
