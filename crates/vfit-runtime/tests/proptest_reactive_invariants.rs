//! Property-based invariant tests for the reactive layer.
//!
//! 1. Version counts exactly the value-changing writes.
//! 2. A derived value always equals its function applied to the sources.
//! 3. Only the last of a chain of animations can finish.

use std::time::Duration;

use proptest::prelude::*;
use vfit_core::animation::SpringSpec;
use vfit_runtime::{AnimatedValue, AnimationOutcome, Derived, Observable};

proptest! {
    #[test]
    fn version_counts_real_changes(writes in prop::collection::vec(0u8..4, 0..64)) {
        let obs = Observable::new(0u8);
        let mut expected = 0u64;
        let mut current = 0u8;
        for w in writes {
            if w != current {
                expected += 1;
                current = w;
            }
            obs.set(w);
        }
        prop_assert_eq!(obs.version(), expected);
        prop_assert_eq!(obs.get(), current);
    }

    #[test]
    fn derived_matches_sources(
        steps in prop::collection::vec((any::<bool>(), any::<bool>()), 1..32),
    ) {
        let open = Observable::new(false);
        let show = Observable::new(true);
        let dimmed = Derived::combine(&open, &show, |o, s| *o && *s);
        for (o, s) in steps {
            open.set(o);
            show.set(s);
            prop_assert_eq!(dimmed.get(), o && s);
        }
    }

    #[test]
    fn only_last_animation_finishes(
        targets in prop::collection::vec(-800.0f64..-50.0, 1..6),
        frames_between in 0usize..5,
    ) {
        let value = AnimatedValue::new(0.0);
        let mut completions = Vec::new();
        for &target in &targets {
            completions.push(value.spring_to(target, SpringSpec::default()));
            for _ in 0..frames_between {
                value.tick(Duration::from_millis(16));
            }
        }
        let mut guard = 0;
        while value.tick(Duration::from_millis(16)) {
            guard += 1;
            prop_assert!(guard < 5_000);
        }

        let (last, earlier) = completions.split_last().expect("at least one target");
        prop_assert_eq!(last.outcome(), Some(AnimationOutcome::Finished));
        for c in earlier {
            prop_assert_eq!(c.outcome(), Some(AnimationOutcome::Interrupted));
        }
        prop_assert_eq!(value.get(), *targets.last().expect("at least one target"));
    }
}
