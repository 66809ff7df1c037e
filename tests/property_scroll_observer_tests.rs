use std::cell::RefCell;
use std::rc::Rc;

use metric_showcase::api::{NavChromeVariant, nav_variant_for};
use metric_showcase::scroll::{ScrollObserver, ScrollObserverConfig, ViewportScrollSource};
use proptest::prelude::*;

proptest! {
    #[test]
    fn state_tracks_last_offset_and_flips_once_per_crossing(
        offsets in proptest::collection::vec(0.0f64..400.0, 0..64)
    ) {
        let source = Rc::new(ViewportScrollSource::new());
        let observer = ScrollObserver::attach(source.clone(), ScrollObserverConfig::default())
            .expect("attach");
        let flips = Rc::new(RefCell::new(0_u64));
        let counter = Rc::clone(&flips);
        observer.subscribe(move |_| *counter.borrow_mut() += 1);

        let mut expected_state = false;
        let mut expected_flips = 0_u64;
        for offset in &offsets {
            source.scroll_to(*offset);
            let next = *offset > 50.0;
            if next != expected_state {
                expected_flips += 1;
                expected_state = next;
            }
            prop_assert_eq!(observer.past_threshold(), next);
        }

        prop_assert_eq!(observer.transition_count(), expected_flips);
        prop_assert_eq!(*flips.borrow(), expected_flips);
        prop_assert_eq!(observer.events_seen(), offsets.len() as u64);
    }

    #[test]
    fn nav_variant_is_a_pure_function_of_scroll_state(offset in -1_000.0f64..1_000.0) {
        let source = Rc::new(ViewportScrollSource::new());
        let observer = ScrollObserver::attach(source.clone(), ScrollObserverConfig::default())
            .expect("attach");
        source.scroll_to(offset);

        let expected = if offset > 50.0 {
            NavChromeVariant::Opaque
        } else {
            NavChromeVariant::Transparent
        };
        prop_assert_eq!(nav_variant_for(observer.state()), expected);
    }

    #[test]
    fn disposed_observer_ignores_every_later_offset(
        before in proptest::collection::vec(0.0f64..400.0, 0..16),
        after in proptest::collection::vec(0.0f64..400.0, 1..16)
    ) {
        let source = Rc::new(ViewportScrollSource::new());
        let mut observer = ScrollObserver::attach(source.clone(), ScrollObserverConfig::default())
            .expect("attach");
        for offset in &before {
            source.scroll_to(*offset);
        }
        let frozen = observer.state();
        let events = observer.events_seen();

        observer.dispose();
        for offset in &after {
            source.scroll_to(*offset);
        }

        prop_assert_eq!(observer.state(), frozen);
        prop_assert_eq!(observer.events_seen(), events);
        prop_assert_eq!(source.listener_count(), 0);
    }
}
