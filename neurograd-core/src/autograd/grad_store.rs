use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::autograd::GraphContext;
use crate::error::NeuroGradError;
use crate::ops::arithmetic::add_op;
use crate::tensor::{zeros_like, NodeId, Tensor};
use crate::utils::sync::lock_or_recover;

/// One gradient entry. `None` marks a slot reserved by the scheduler but not yet written.
type Slot = Arc<Mutex<Option<Tensor>>>;

/// The keyed table of accumulated gradients produced by a backward pass.
///
/// Entries are keyed by [`NodeId`]. Every method takes `&self`: each entry has its own
/// mutex, so concurrent writers to different nodes never wait on each other, while
/// writers to the same node are serialized.
#[derive(Default)]
pub struct GradStore {
    slots: RwLock<HashMap<NodeId, Slot>>,
}

impl GradStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gradient of `node`, if one has been stored.
    pub fn get(&self, node: &Tensor) -> Option<Tensor> {
        self.get_by_id(node.id())
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<Tensor> {
        let slot = self.read_slots().get(&id).cloned()?;
        let entry = lock_slot(&slot);
        entry.clone()
    }

    /// Returns the gradient of `node`, inserting a zero tensor shaped like it if absent.
    ///
    /// # Errors
    /// Fails only if the zero tensor cannot be built.
    pub fn get_or_create(&self, node: &Tensor) -> Result<Tensor, NeuroGradError> {
        let slot = self.slot_or_insert(node.id());
        let mut entry = lock_slot(&slot);
        match entry.as_ref() {
            Some(existing) => Ok(existing.clone()),
            None => {
                let zeros = zeros_like(node)?;
                *entry = Some(zeros.clone());
                Ok(zeros)
            }
        }
    }

    /// Overwrites the gradient of `node`, returning the previous value if there was one.
    pub fn set(&self, node: &Tensor, grad: Tensor) -> Option<Tensor> {
        self.set_by_id(node.id(), grad)
    }

    pub fn set_by_id(&self, id: NodeId, grad: Tensor) -> Option<Tensor> {
        let slot = self.slot_or_insert(id);
        let mut entry = lock_slot(&slot);
        entry.replace(grad)
    }

    /// Removes the gradient of `node`, returning it if it existed.
    pub fn delete(&self, node: &Tensor) -> Option<Tensor> {
        self.delete_by_id(node.id())
    }

    pub fn delete_by_id(&self, id: NodeId) -> Option<Tensor> {
        let slot = self.write_slots().remove(&id)?;
        let mut entry = lock_slot(&slot);
        entry.take()
    }

    /// Adds `contribution` into the gradient of `node`.
    ///
    /// Inserts `contribution` when no gradient exists yet, otherwise replaces the entry
    /// with `entry + contribution`.
    ///
    /// # Errors
    /// Returns `NeuroGradError::ShapeMismatch` if `contribution`, or the gradient already
    /// stored, is not shaped like `node`. The entry is left untouched in that case.
    pub fn accumulate(&self, node: &Tensor, contribution: Tensor) -> Result<(), NeuroGradError> {
        check_grad_shape(node, &contribution, "accumulate gradient")?;
        let slot = self.slot_or_insert(node.id());
        let mut entry = lock_slot(&slot);
        let updated = match entry.as_ref() {
            Some(existing) => {
                check_grad_shape(node, existing, "accumulate into stored gradient")?;
                add_op(&GraphContext::no_grad(), existing, &contribution)?
            }
            None => contribution,
        };
        *entry = Some(updated);
        Ok(())
    }

    /// Ids of all stored gradients, sorted.
    pub fn ids(&self) -> Vec<NodeId> {
        let slots = self.read_slots();
        let mut ids: Vec<NodeId> = slots
            .iter()
            .filter(|(_, slot)| lock_slot(slot).is_some())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all gradients, e.g. after an optimizer step.
    pub fn clear(&self) {
        self.write_slots().clear();
    }

    /// Makes sure `id` has a slot so later accumulation only needs the shared map lock.
    pub(crate) fn reserve(&self, id: NodeId) {
        self.slot_or_insert(id);
    }

    fn slot_or_insert(&self, id: NodeId) -> Slot {
        if let Some(slot) = self.read_slots().get(&id) {
            return Arc::clone(slot);
        }
        let mut slots = self.write_slots();
        Arc::clone(slots.entry(id).or_default())
    }

    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<NodeId, Slot>> {
        self.slots.read().unwrap_or_else(|poisoned| {
            warn!("GradStore map lock was poisoned. Recovering reader guard.");
            poisoned.into_inner()
        })
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<NodeId, Slot>> {
        self.slots.write().unwrap_or_else(|poisoned| {
            warn!("GradStore map lock was poisoned. Recovering writer guard.");
            poisoned.into_inner()
        })
    }
}

/// `ShapeMismatch` unless `grad` has exactly the shape of `node`.
pub(crate) fn check_grad_shape(node: &Tensor, grad: &Tensor, operation: &str) -> Result<(), NeuroGradError> {
    let node_shape = node.tensor_data().shape();
    if grad.tensor_data().shape() != node_shape {
        return Err(NeuroGradError::ShapeMismatch {
            expected: node_shape.to_vec(),
            actual: grad.shape(),
            operation: format!("{} of {}", operation, node.id()),
        });
    }
    Ok(())
}

fn lock_slot(slot: &Mutex<Option<Tensor>>) -> MutexGuard<'_, Option<Tensor>> {
    lock_or_recover(slot, "GradStore entry")
}

impl fmt::Debug for GradStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradStore").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
#[path = "grad_store_test.rs"]
mod tests;
