use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use log::{debug, trace};
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};

use crate::autograd::graph::{discover, InducedGraph};
use crate::autograd::grad_store::check_grad_shape;
use crate::autograd::GradStore;
use crate::error::NeuroGradError;
use crate::tensor::{ones_like, Tensor};
use crate::utils::sync::lock_or_recover;

/// Runs backward passes, either on rayon's global pool or on a dedicated one.
#[derive(Debug, Default)]
pub struct BackwardEngine {
    pool: Option<ThreadPool>,
}

impl BackwardEngine {
    /// An engine that schedules node tasks on rayon's global thread pool.
    pub fn new() -> Self {
        BackwardEngine { pool: None }
    }

    /// An engine backed by its own pool of `num_threads` workers.
    ///
    /// `0` lets rayon pick the thread count.
    ///
    /// # Errors
    /// Returns `NeuroGradError::ThreadPoolBuild` if rayon cannot spawn the pool.
    pub fn with_num_threads(num_threads: usize) -> Result<Self, NeuroGradError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("neurograd-backward-{}", i))
            .build()
            .map_err(|e| NeuroGradError::ThreadPoolBuild(e.to_string()))?;
        Ok(BackwardEngine { pool: Some(pool) })
    }

    /// Number of worker threads the engine dispatches onto.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Computes the gradients of `roots` with respect to every differentiable node they
    /// depend on.
    ///
    /// `seeds` holds the gradients of the roots. A root without an entry is seeded with
    /// ones if it holds a single element. Entries for other nodes are treated as
    /// gradients accumulated earlier and are added to.
    ///
    /// # Errors
    /// * `MissingGradient` if a root with more than one element has no seed.
    /// * `ShapeMismatch` if a seed, a prior gradient in `seeds`, or a gradient returned
    ///   by a backward op does not have the shape of the node it belongs to.
    /// * `OperatorBackwardFailure` if a backward op fails or returns the wrong number of
    ///   gradients.
    /// * `InvariantViolation` if the graph is malformed.
    ///
    /// On error the partially filled store is dropped.
    pub fn run(&self, roots: &[Tensor], seeds: Option<GradStore>) -> Result<GradStore, NeuroGradError> {
        let store = seeds.unwrap_or_default();
        let graph = discover(roots)?;
        if graph.is_empty() {
            debug!("backward: no differentiable root, nothing to do");
            return Ok(store);
        }

        for &root_idx in &graph.roots {
            seed_root(&store, &graph.nodes[root_idx])?;
        }
        for node in &graph.nodes {
            if let Some(prior) = store.get(node) {
                check_grad_shape(node, &prior, "prior gradient")?;
            }
            store.reserve(node.id());
        }

        let schedule = Schedule::new(&graph, &store);
        match &self.pool {
            Some(pool) => pool.install(|| schedule.execute())?,
            None => schedule.execute()?,
        }
        debug!("backward: finished {} nodes", graph.len());
        Ok(store)
    }
}

/// Computes gradients for `roots` on rayon's global pool.
///
/// See [`BackwardEngine::run`].
pub fn backward(roots: &[Tensor], seeds: Option<GradStore>) -> Result<GradStore, NeuroGradError> {
    BackwardEngine::new().run(roots, seeds)
}

impl Tensor {
    /// Backpropagates from this tensor, which must hold a single element.
    pub fn backward(&self) -> Result<GradStore, NeuroGradError> {
        backward(std::slice::from_ref(self), None)
    }

    /// Backpropagates from this tensor using `seed` as its gradient.
    pub fn backward_with(&self, seed: Tensor) -> Result<GradStore, NeuroGradError> {
        let seeds = GradStore::new();
        seeds.set(self, seed);
        backward(std::slice::from_ref(self), Some(seeds))
    }
}

fn seed_root(store: &GradStore, root: &Tensor) -> Result<(), NeuroGradError> {
    match store.get(root) {
        Some(seed) => {
            check_grad_shape(root, &seed, "seed gradient")?;
            debug!("backward: using provided seed for root {}", root.id());
        }
        None if root.numel() == 1 => {
            store.set(root, ones_like(root)?);
            debug!("backward: seeded scalar root {} with ones", root.id());
        }
        None => {
            return Err(NeuroGradError::MissingGradient {
                node: root.id(),
                shape: root.shape(),
            })
        }
    }
    Ok(())
}

/// Per-invocation execution state over an [`InducedGraph`].
///
/// A node is spawned once its pending counter, the number of its consumer edges still
/// to deliver, reaches zero. Each delivery lands in its own inbox slot, and the slots
/// are folded into the store in discovery order when the node runs.
struct Schedule<'g> {
    graph: &'g InducedGraph,
    store: &'g GradStore,
    pending: Vec<AtomicUsize>,
    started: Vec<AtomicBool>,
    inboxes: Vec<Mutex<Vec<Option<Tensor>>>>,
    executed: AtomicUsize,
    aborted: AtomicBool,
    first_error: Mutex<Option<NeuroGradError>>,
}

impl<'g> Schedule<'g> {
    fn new(graph: &'g InducedGraph, store: &'g GradStore) -> Self {
        Schedule {
            graph,
            store,
            pending: graph.consumers.iter().map(|c| AtomicUsize::new(c.len())).collect(),
            started: graph.nodes.iter().map(|_| AtomicBool::new(false)).collect(),
            inboxes: graph.consumers.iter().map(|c| Mutex::new(vec![None; c.len()])).collect(),
            executed: AtomicUsize::new(0),
            aborted: AtomicBool::new(false),
            first_error: Mutex::new(None),
        }
    }

    fn execute(&self) -> Result<(), NeuroGradError> {
        rayon::scope(|s| {
            for idx in 0..self.graph.len() {
                if self.pending[idx].load(Ordering::Acquire) == 0 {
                    self.spawn(s, idx);
                }
            }
        });

        if let Some(err) = lock_or_recover(&self.first_error, "backward error slot").take() {
            debug!("backward: aborted with {}", err);
            return Err(err);
        }
        let executed = self.executed.load(Ordering::Acquire);
        if executed != self.graph.len() {
            return Err(NeuroGradError::InvariantViolation(format!(
                "only {} of {} discovered nodes executed",
                executed,
                self.graph.len()
            )));
        }
        Ok(())
    }

    fn spawn<'s>(&'s self, scope: &Scope<'s>, idx: usize) {
        if self.started[idx].swap(true, Ordering::AcqRel) {
            return;
        }
        scope.spawn(move |s| self.run_node(s, idx));
    }

    fn run_node<'s>(&'s self, scope: &Scope<'s>, idx: usize) {
        if self.aborted.load(Ordering::Acquire) {
            return;
        }
        match self.process(idx) {
            Ok(ready) => {
                for input_idx in ready {
                    self.spawn(scope, input_idx);
                }
            }
            Err(err) => self.abort(err),
        }
    }

    /// Folds the inbox of node `idx`, runs its backward op and delivers the results.
    /// Returns the inputs that became ready.
    fn process(&self, idx: usize) -> Result<Vec<usize>, NeuroGradError> {
        let node = &self.graph.nodes[idx];
        trace!("backward: running {} ({:?})", node.id(), node.op_name());

        let contributions = std::mem::take(&mut *lock_or_recover(&self.inboxes[idx], "backward inbox"));
        for contribution in contributions {
            let contribution = contribution.ok_or_else(|| {
                NeuroGradError::InvariantViolation(format!("{} ran before all consumers delivered", node.id()))
            })?;
            self.store.accumulate(node, contribution)?;
        }

        let mut ready = Vec::new();
        if let Some(origin) = node.origin() {
            let grad = self.store.get(node).ok_or_else(|| {
                NeuroGradError::InvariantViolation(format!("{} became ready without a gradient", node.id()))
            })?;
            let input_grads = origin
                .backward_op()
                .backward(&grad)
                .map_err(|e| NeuroGradError::backward_failure(node.id(), origin.op_name(), e))?;
            if input_grads.len() != origin.inputs().len() {
                return Err(NeuroGradError::backward_failure(
                    node.id(),
                    origin.op_name(),
                    NeuroGradError::InvariantViolation(format!(
                        "expected {} input gradients, got {}",
                        origin.inputs().len(),
                        input_grads.len()
                    )),
                ));
            }

            for ((input, input_grad), target) in origin.inputs().iter().zip(input_grads).zip(&self.graph.targets[idx]) {
                let Some((input_idx, slot)) = *target else {
                    continue;
                };
                if input_grad.shape() != input.shape() {
                    return Err(NeuroGradError::ShapeMismatch {
                        expected: input.shape(),
                        actual: input_grad.shape(),
                        operation: format!("{} backward at {}", origin.op_name(), node.id()),
                    });
                }
                lock_or_recover(&self.inboxes[input_idx], "backward inbox")[slot] = Some(input_grad);
                if self.pending[input_idx].fetch_sub(1, Ordering::AcqRel) == 1 {
                    ready.push(input_idx);
                }
            }
        }

        self.executed.fetch_add(1, Ordering::AcqRel);
        Ok(ready)
    }

    fn abort(&self, err: NeuroGradError) {
        self.aborted.store(true, Ordering::Release);
        let mut slot = lock_or_recover(&self.first_error, "backward error slot");
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
