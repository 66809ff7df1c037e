use std::cell::RefCell;
use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Callback invoked with the new vertical scroll offset in pixels.
pub type ScrollListener = Box<dyn FnMut(f64)>;

/// Handle returned by `ScrollSignalSource::add_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(u64);

/// Host-provided viewport scroll signal.
///
/// All calls happen on the UI thread; implementations use interior
/// mutability so one source can be shared by several observers.
pub trait ScrollSignalSource {
    /// Current offset, `None` when the host exposes no scroll signal.
    fn current_offset(&self) -> Option<f64>;

    /// Registers `listener`. Returns `None` when the host has no signal to
    /// subscribe to.
    fn add_listener(&self, listener: ScrollListener) -> Option<ListenerId>;

    /// Releases a listener. Returns `true` when it was still registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// Host without any scroll signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScrollSignal;

impl ScrollSignalSource for NoScrollSignal {
    fn current_offset(&self) -> Option<f64> {
        None
    }

    fn add_listener(&self, _listener: ScrollListener) -> Option<ListenerId> {
        None
    }

    fn remove_listener(&self, _id: ListenerId) -> bool {
        false
    }
}

#[derive(Default)]
struct ListenerRegistry {
    offset: f64,
    next_id: u64,
    listeners: IndexMap<ListenerId, ScrollListener>,
    dispatching: bool,
    in_flight: Vec<ListenerId>,
    removed_in_flight: Vec<ListenerId>,
    pending: VecDeque<f64>,
    delivered: u64,
}

/// In-process scroll signal driven by `scroll_to`.
///
/// Hosts forward their native scroll events into it; tests use it directly as
/// a fake viewport. Listeners run in registration order. Offsets emitted from
/// inside a listener are queued and delivered after the current dispatch, so
/// delivery order always matches emission order. Listeners may add or remove
/// listeners (including themselves) while a dispatch is running.
#[derive(Default)]
pub struct ViewportScrollSource {
    registry: RefCell<ListenerRegistry>,
}

impl ViewportScrollSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts at `offset` without notifying anyone.
    #[must_use]
    pub fn with_offset(offset: f64) -> Self {
        let source = Self::default();
        source.registry.borrow_mut().offset = offset;
        source
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let registry = self.registry.borrow();
        let in_flight = if registry.dispatching {
            registry.in_flight.len() - registry.removed_in_flight.len()
        } else {
            0
        };
        registry.listeners.len() + in_flight
    }

    /// Total number of listener invocations so far.
    #[must_use]
    pub fn delivered_count(&self) -> u64 {
        self.registry.borrow().delivered
    }

    /// Records a new scroll offset and notifies every listener.
    pub fn scroll_to(&self, offset: f64) {
        {
            let mut registry = self.registry.borrow_mut();
            registry.pending.push_back(offset);
            if registry.dispatching {
                trace!(offset, "queue nested scroll emission");
                return;
            }
        }

        loop {
            let next = self.registry.borrow_mut().pending.pop_front();
            match next {
                Some(offset) => self.dispatch(offset),
                None => break,
            }
        }
    }

    fn dispatch(&self, offset: f64) {
        let mut batch = {
            let mut registry = self.registry.borrow_mut();
            registry.offset = offset;
            registry.dispatching = true;
            let batch = std::mem::take(&mut registry.listeners);
            registry.in_flight = batch.keys().copied().collect();
            batch
        };

        for (id, listener) in &mut batch {
            if self.registry.borrow().removed_in_flight.contains(id) {
                continue;
            }
            listener(offset);
            self.registry.borrow_mut().delivered += 1;
        }

        let dropped: Vec<ScrollListener> = {
            let mut registry = self.registry.borrow_mut();
            let removed = std::mem::take(&mut registry.removed_in_flight);
            let dropped = removed
                .iter()
                .filter_map(|id| batch.shift_remove(id))
                .collect();
            let added = std::mem::take(&mut registry.listeners);
            batch.extend(added);
            registry.listeners = batch;
            registry.in_flight.clear();
            registry.dispatching = false;
            dropped
        };
        // Dropped outside the borrow: the closures may own observer state.
        drop(dropped);
    }
}

impl ScrollSignalSource for ViewportScrollSource {
    fn current_offset(&self) -> Option<f64> {
        Some(self.registry.borrow().offset)
    }

    fn add_listener(&self, listener: ScrollListener) -> Option<ListenerId> {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.insert(id, listener);
        Some(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        // The removed closure is dropped after the borrow ends, since it may own
        // state whose destructor calls back into this source.
        let removed = {
            let mut registry = self.registry.borrow_mut();
            if let Some(listener) = registry.listeners.shift_remove(&id) {
                Some(listener)
            } else if registry.dispatching
                && registry.in_flight.contains(&id)
                && !registry.removed_in_flight.contains(&id)
            {
                registry.removed_in_flight.push(id);
                return true;
            } else {
                None
            }
        };
        removed.is_some()
    }
}

impl std::fmt::Debug for ViewportScrollSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("ViewportScrollSource")
            .field("offset", &registry.offset)
            .field("listeners", &registry.listeners.len())
            .field("dispatching", &registry.dispatching)
            .finish()
    }
}
