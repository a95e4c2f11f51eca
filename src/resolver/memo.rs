//! The per-invocation memo table.
//!
//! Maps project names to nodes that are either being built or finished.
//! Concurrent requests for the same name are serialized here: the first
//! caller claims the slot and builds the node, later callers block until it
//! is finished and then share the same `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::core::ProjectName;
use crate::resolver::node::ProjectNode;

enum Slot {
    InProgress,
    Ready(Arc<ProjectNode>),
}

/// Outcome of [`Memo::claim`].
pub(crate) enum Claim {
    /// The node already exists.
    Ready(Arc<ProjectNode>),
    /// The caller now owns the slot and must `complete` or `abandon` it.
    Build,
}

#[derive(Default)]
pub(crate) struct Memo {
    slots: Mutex<HashMap<ProjectName, Slot>>,
    changed: Condvar,
}

impl Memo {
    fn lock(&self) -> MutexGuard<'_, HashMap<ProjectName, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `name` for construction, or wait for whoever holds it.
    ///
    /// Must not be called for a name the calling thread is itself building;
    /// callers check their require chain first.
    pub(crate) fn claim(&self, name: &ProjectName) -> Claim {
        let mut slots = self.lock();
        loop {
            let in_progress = match slots.get(name) {
                Some(Slot::Ready(node)) => return Claim::Ready(Arc::clone(node)),
                Some(Slot::InProgress) => true,
                None => false,
            };

            if !in_progress {
                slots.insert(name.clone(), Slot::InProgress);
                return Claim::Build;
            }

            slots = self
                .changed
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Publish a finished node.
    pub(crate) fn complete(&self, name: &ProjectName, node: Arc<ProjectNode>) {
        self.lock().insert(name.clone(), Slot::Ready(node));
        self.changed.notify_all();
    }

    /// Release a claim after construction failed.
    pub(crate) fn abandon(&self, name: &ProjectName) {
        self.lock().remove(name);
        self.changed.notify_all();
    }

    /// Number of finished nodes.
    pub(crate) fn ready_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}
