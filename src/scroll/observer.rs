use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ChartError, ChartResult};

use super::{ListenerId, ScrollSignalSource};

/// Scroll offset above which the page counts as scrolled.
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 50.0;

/// Binary page scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    pub past_threshold: bool,
}

impl ScrollState {
    #[must_use]
    pub fn for_offset(offset_px: f64, threshold_px: f64) -> Self {
        Self {
            past_threshold: offset_px > threshold_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollObserverConfig {
    #[serde(default = "default_threshold_px")]
    pub threshold_px: f64,
    /// Reads the source's current offset once at attach time instead of
    /// waiting for the first scroll event.
    #[serde(default)]
    pub sync_on_attach: bool,
}

fn default_threshold_px() -> f64 {
    DEFAULT_SCROLL_THRESHOLD_PX
}

impl Default for ScrollObserverConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            sync_on_attach: false,
        }
    }
}

impl ScrollObserverConfig {
    #[must_use]
    pub fn with_threshold_px(mut self, threshold_px: f64) -> Self {
        self.threshold_px = threshold_px;
        self
    }

    #[must_use]
    pub fn with_sync_on_attach(mut self, sync_on_attach: bool) -> Self {
        self.sync_on_attach = sync_on_attach;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.threshold_px.is_finite() {
            return Err(ChartError::InvalidConfig(
                "scroll threshold must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Callback run whenever `ScrollState` flips.
pub type ScrollSubscriber = Box<dyn FnMut(ScrollState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(u64);

struct ObserverShared {
    threshold_px: f64,
    active: Cell<bool>,
    state: Cell<ScrollState>,
    events_seen: Cell<u64>,
    transitions: Cell<u64>,
    next_subscriber: Cell<u64>,
    subscribers: RefCell<IndexMap<SubscriberId, ScrollSubscriber>>,
    notifying: Cell<bool>,
    in_flight: RefCell<Vec<SubscriberId>>,
    unsubscribed_in_flight: RefCell<Vec<SubscriberId>>,
}

impl ObserverShared {
    fn handle_offset(&self, offset_px: f64) {
        if !self.active.get() {
            return;
        }
        if !offset_px.is_finite() {
            warn!(offset_px, "ignoring non-finite scroll offset");
            return;
        }

        self.events_seen.set(self.events_seen.get() + 1);
        let next = ScrollState::for_offset(offset_px, self.threshold_px);
        if next == self.state.get() {
            trace!(offset_px, "scroll offset kept state");
            return;
        }

        self.state.set(next);
        self.transitions.set(self.transitions.get() + 1);
        debug!(
            offset_px,
            past_threshold = next.past_threshold,
            "scroll state flipped"
        );
        self.notify(next);
    }

    fn notify(&self, state: ScrollState) {
        let mut batch = std::mem::take(&mut *self.subscribers.borrow_mut());
        *self.in_flight.borrow_mut() = batch.keys().copied().collect();
        self.notifying.set(true);

        for (id, subscriber) in &mut batch {
            if !self.active.get() {
                break;
            }
            if self.unsubscribed_in_flight.borrow().contains(id) {
                continue;
            }
            subscriber(state);
        }

        self.notifying.set(false);
        self.in_flight.borrow_mut().clear();
        let removed = std::mem::take(&mut *self.unsubscribed_in_flight.borrow_mut());
        if !self.active.get() {
            return;
        }
        batch.retain(|id, _| !removed.contains(id));
        let added = std::mem::take(&mut *self.subscribers.borrow_mut());
        batch.extend(added);
        *self.subscribers.borrow_mut() = batch;
    }
}

/// Derives `ScrollState` from a viewport scroll signal.
///
/// The observer owns exactly one listener on its source. `dispose` (also run
/// on drop) releases it; after that no signal can change the state again,
/// even one already being delivered when disposal happened.
pub struct ScrollObserver {
    shared: Rc<ObserverShared>,
    source: Rc<dyn ScrollSignalSource>,
    listener: Option<ListenerId>,
}

impl ScrollObserver {
    /// Subscribes to `source` with the given threshold.
    ///
    /// A source without a scroll signal leaves the observer at the default
    /// (not scrolled) state.
    pub fn attach(
        source: Rc<dyn ScrollSignalSource>,
        config: ScrollObserverConfig,
    ) -> ChartResult<Self> {
        config.validate()?;

        let shared = Rc::new(ObserverShared {
            threshold_px: config.threshold_px,
            active: Cell::new(true),
            state: Cell::new(ScrollState::default()),
            events_seen: Cell::new(0),
            transitions: Cell::new(0),
            next_subscriber: Cell::new(0),
            subscribers: RefCell::new(IndexMap::new()),
            notifying: Cell::new(false),
            in_flight: RefCell::new(Vec::new()),
            unsubscribed_in_flight: RefCell::new(Vec::new()),
        });

        if config.sync_on_attach {
            if let Some(offset_px) = source.current_offset().filter(|offset| offset.is_finite()) {
                shared
                    .state
                    .set(ScrollState::for_offset(offset_px, config.threshold_px));
            }
        }

        let weak = Rc::downgrade(&shared);
        let listener = source.add_listener(Box::new(move |offset_px| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_offset(offset_px);
            }
        }));

        match listener {
            Some(id) => debug!(
                threshold_px = config.threshold_px,
                listener = ?id,
                "scroll observer attached"
            ),
            None => warn!("host exposes no scroll signal; scroll state stays at default"),
        }

        Ok(Self {
            shared,
            source,
            listener,
        })
    }

    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn past_threshold(&self) -> bool {
        self.state().past_threshold
    }

    #[must_use]
    pub fn threshold_px(&self) -> f64 {
        self.shared.threshold_px
    }

    /// `false` once disposed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }

    /// Whether a scroll signal listener is currently held.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Scroll events handled while active.
    #[must_use]
    pub fn events_seen(&self) -> u64 {
        self.shared.events_seen.get()
    }

    /// Number of times the state flipped.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.shared.transitions.get()
    }

    /// Registers a callback for state flips. Not invoked with the current
    /// state; read `state()` for that.
    pub fn subscribe(&self, subscriber: impl FnMut(ScrollState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.shared.next_subscriber.get());
        self.shared.next_subscriber.set(id.0 + 1);
        if self.is_active() {
            self.shared
                .subscribers
                .borrow_mut()
                .insert(id, Box::new(subscriber));
        }
        id
    }

    /// Returns `true` when the subscriber was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.shared.subscribers.borrow_mut().shift_remove(&id);
        if removed.is_some() {
            return true;
        }
        if self.shared.notifying.get() && self.shared.in_flight.borrow().contains(&id) {
            let mut removed = self.shared.unsubscribed_in_flight.borrow_mut();
            if !removed.contains(&id) {
                removed.push(id);
                return true;
            }
        }
        false
    }

    /// Releases the scroll listener and all subscribers. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(id) = self.listener.take() {
            let released = self.source.remove_listener(id);
            debug!(listener = ?id, released, "scroll observer detached");
        }
        if self.shared.active.replace(false) {
            let subscribers = std::mem::take(&mut *self.shared.subscribers.borrow_mut());
            drop(subscribers);
        }
    }
}

impl Drop for ScrollObserver {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ScrollObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollObserver")
            .field("threshold_px", &self.shared.threshold_px)
            .field("state", &self.shared.state.get())
            .field("active", &self.shared.active.get())
            .field("listener", &self.listener)
            .finish()
    }
}
