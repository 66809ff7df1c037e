//! Page scroll tracking.
//!
//! A `ScrollSignalSource` abstracts the host viewport; `ScrollObserver` turns
//! its continuous offset into the binary `ScrollState` consumed by the
//! navigation chrome.

mod observer;
mod source;

pub use observer::{
    DEFAULT_SCROLL_THRESHOLD_PX, ScrollObserver, ScrollObserverConfig, ScrollState,
    ScrollSubscriber, SubscriberId,
};
pub use source::{
    ListenerId, NoScrollSignal, ScrollListener, ScrollSignalSource, ViewportScrollSource,
};
