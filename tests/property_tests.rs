//! Property-based tests for trace folding and model fitting
//!
//! Properties covered:
//! 1. Balanced nested traces fold to one duration per path, in any event order
//! 2. An exit that doesn't match the innermost frame fails at any depth
//! 3. R² never exceeds 1 and fits come back ranked

use asintota::call_path::CallPath;
use asintota::complexity::calculate_fitting_funcs;
use asintota::event::Event;
use asintota::join::{ComponentTimeSeries, SeriesPoint};
use asintota::trace_folder::{fold_events, FoldLimits, TraceError};
use proptest::prelude::*;

const STEP_NS: i64 = 1_000;

/// Nested chain `C0::m -> C1::m -> ...`, each frame entered STEP_NS after its
/// parent and left STEP_NS before it
fn nested_chain(depth: usize, total_ns: i64) -> Vec<Event> {
    let mut events = Vec::with_capacity(depth * 2);
    for i in 0..depth {
        events.push(Event::enter(i as i64 * STEP_NS, &format!("C{}", i), "m"));
    }
    for i in (0..depth).rev() {
        events.push(Event::exit(
            total_ns - i as i64 * STEP_NS,
            &format!("C{}", i),
            "m",
        ));
    }
    events
}

fn path_to(level: usize) -> CallPath {
    CallPath::from_segments((0..=level).map(|i| format!("C{}::m", i)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balanced_trace_round_trips(depth in 1usize..30, extra_ns in 0i64..10_000_000) {
        let total_ns = 2 * depth as i64 * STEP_NS + extra_ns;
        let folded = fold_events("i", &nested_chain(depth, total_ns), FoldLimits::default()).unwrap();

        prop_assert_eq!(folded.durations().len(), depth);
        for level in 0..depth {
            let expected = (total_ns - 2 * level as i64 * STEP_NS) as f64 / 1_000_000.0;
            let got = folded.get(path_to(level).as_str()).unwrap();
            prop_assert_eq!(got.len(), 1);
            prop_assert!((got[0] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_event_order_irrelevant(depth in 1usize..20, seed in any::<u64>()) {
        let events = nested_chain(depth, 1_000_000);
        let mut shuffled = events.clone();
        // Deterministic rotation keeps distinct timestamps, only input order changes
        let len = shuffled.len();
        shuffled.rotate_left((seed % len as u64) as usize);

        let a = fold_events("i", &events, FoldLimits::default()).unwrap();
        let b = fold_events("i", &shuffled, FoldLimits::default()).unwrap();
        prop_assert_eq!(a.durations(), b.durations());
    }

    #[test]
    fn prop_mismatch_at_any_depth_fails(depth in 1usize..30) {
        let mut events: Vec<Event> = (0..depth)
            .map(|i| Event::enter(i as i64, &format!("C{}", i), "m"))
            .collect();
        events.push(Event::exit(depth as i64, "Other", "x"));

        let err = fold_events("i", &events, FoldLimits::default()).unwrap_err();
        match err {
            TraceError::StackMismatch { expected, found, .. } => {
                prop_assert_eq!(expected, format!("C{}::m", depth - 1));
                prop_assert_eq!(found, "Other::x".to_string());
            }
            other => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_r_squared_at_most_one(
        points in prop::collection::btree_map(1u32..1000, 0.0f64..1.0e4, 2..40)
    ) {
        let series = ComponentTimeSeries {
            component: CallPath::from("X::run"),
            property: "n".to_string(),
            points: points
                .into_iter()
                .map(|(x, y)| SeriesPoint { x: f64::from(x), y })
                .collect(),
            dropped_instances: Vec::new(),
        };

        let fits = calculate_fitting_funcs(&series);
        for fit in &fits {
            prop_assert!(fit.r_squared <= 1.0 + 1e-9, "R² = {}", fit.r_squared);
        }
        for pair in fits.windows(2) {
            prop_assert!(pair[0].r_squared >= pair[1].r_squared);
        }
    }
}
