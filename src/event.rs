//! Graph change notifications — a synchronized listener registry.
//!
//! The lock guards only the listener collection, never the graph's own maps.
//! Dispatch snapshots the registry and releases the lock before invoking
//! callbacks, so a listener may re-enter the registry (for example to
//! unregister itself) without deadlocking.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::graph::Graph;
use crate::model::GraphKey;

/// A structural change, carrying the element that changed.
///
/// Cascading mutations emit one event per primitive step: removing a vertex
/// emits `EdgeRemoved` for every incident edge before the final
/// `VertexRemoved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent<V, E> {
    VertexAdded(V),
    VertexRemoved(V),
    EdgeAdded(E),
    EdgeRemoved(E),
}

/// Receives structural-change notifications together with the graph that
/// changed. Callbacks run on the mutating thread, after the mutation has
/// fully committed; failures inside a listener are the listener's own
/// responsibility.
pub trait GraphListener<V, E>: Send + Sync {
    fn on_graph_event(&self, graph: &Graph<V, E>, event: &GraphEvent<V, E>);
}

/// Mutex-guarded listener collection. Identity is `Arc` pointer identity:
/// registering the same handle twice is a no-op.
pub(crate) struct ListenerRegistry<V, E> {
    listeners: Mutex<Vec<Arc<dyn GraphListener<V, E>>>>,
}

impl<V: GraphKey, E: GraphKey> ListenerRegistry<V, E> {
    pub fn new() -> Self {
        Self { listeners: Mutex::new(Vec::new()) }
    }

    /// Registers a listener. Returns false if this exact handle is already
    /// registered.
    pub fn add(&self, listener: Arc<dyn GraphListener<V, E>>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|known| Arc::ptr_eq(known, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregisters a listener by handle identity. Returns false if it was
    /// not registered.
    pub fn remove(&self, listener: &Arc<dyn GraphListener<V, E>>) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|known| !Arc::ptr_eq(known, listener));
        listeners.len() < before
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn dispatch(&self, graph: &Graph<V, E>, event: &GraphEvent<V, E>) {
        let snapshot: Vec<_> = self.listeners.lock().clone();
        for listener in snapshot {
            listener.on_graph_event(graph, event);
        }
    }
}
