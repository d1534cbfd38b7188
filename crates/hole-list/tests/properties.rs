#![cfg(test)]

use hole_list::{FitPolicy, HoleList, Interval};
use proptest::prelude::*;

const SPACE: usize = 128;

#[derive(Debug, Clone)]
enum Op {
    Alloc { policy: FitPolicy, size: usize },
    Free { pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..FitPolicy::ALL.len(), 1..=48_usize).prop_map(|(policy, size)| Op::Alloc {
            policy: FitPolicy::ALL[policy],
            size,
        }),
        any::<usize>().prop_map(|pick| Op::Free { pick }),
    ]
}

/// Applies `ops` to a fresh list, returning it with the ranges handed out.
fn apply(ops: &[Op]) -> (HoleList, Vec<Interval>) {
    let mut holes = HoleList::new(Interval::new(0, SPACE - 1));
    let mut bound = Vec::new();
    for op in ops {
        match *op {
            Op::Alloc { policy, size } => {
                if let Some(id) = policy.select(&mut holes, size) {
                    bound.push(holes.remove(id, size));
                }
            }
            Op::Free { pick } => {
                if !bound.is_empty() {
                    let range = bound.swap_remove(pick % bound.len());
                    holes.insert(range);
                }
            }
        }
    }
    (holes, bound)
}

proptest! {
    #[test]
    fn invariants_hold_after_every_step(ops in prop::collection::vec(op(), 1..200)) {
        for end in 1..=ops.len() {
            let (holes, bound) = apply(&ops[..end]);
            prop_assert_eq!(holes.validate(), Ok(()));

            let intervals = holes.intervals();
            for pair in intervals.windows(2) {
                prop_assert!(pair[0].end() + 1 < pair[1].start());
            }
            for range in &bound {
                prop_assert!(intervals.iter().all(|hole| !hole.overlaps(range)));
            }
        }
    }

    #[test]
    fn free_and_bound_units_are_conserved(ops in prop::collection::vec(op(), 1..200)) {
        let (holes, bound) = apply(&ops);
        let bound_units: usize = bound.iter().map(Interval::len).sum();
        prop_assert_eq!(holes.free_units() + bound_units, SPACE);
    }

    #[test]
    fn freeing_everything_restores_one_hole(ops in prop::collection::vec(op(), 1..200)) {
        let (mut holes, bound) = apply(&ops);
        for range in bound {
            holes.insert(range);
        }
        prop_assert_eq!(holes.intervals(), vec![Interval::new(0, SPACE - 1)]);
        prop_assert_eq!(holes.len(), 1);
    }

    #[test]
    fn remove_then_insert_round_trips(
        ops in prop::collection::vec(op(), 0..100),
        pick in any::<usize>(),
        fraction in 1..=100_usize,
    ) {
        let (mut holes, _) = apply(&ops);
        prop_assume!(!holes.is_empty());

        let (id, hole) = holes.iter().nth(pick % holes.len()).unwrap();
        let size = (hole.len() * fraction / 100).max(1);
        let before = holes.intervals();
        let cursor_before = holes.cursor().and_then(|c| holes.get(c));

        let carved = holes.remove(id, size);
        prop_assert_eq!(carved, Interval::with_len(hole.start(), size));
        holes.insert(carved);

        prop_assert_eq!(holes.intervals(), before.clone());
        prop_assert_eq!(holes.len(), before.len());
        prop_assert_eq!(holes.validate(), Ok(()));
        if size < hole.len() {
            prop_assert_eq!(holes.cursor().and_then(|c| holes.get(c)), cursor_before);
        }
    }

    #[test]
    fn next_fit_visits_each_hole_at_most_once(
        ops in prop::collection::vec(op(), 0..100),
        size in 1..=SPACE,
    ) {
        let (mut holes, _) = apply(&ops);
        let cursor_before = holes.cursor();
        match FitPolicy::Next.select(&mut holes, size) {
            Some(id) => {
                prop_assert!(holes.get(id).unwrap().len() >= size);
                prop_assert_eq!(holes.cursor(), Some(id));
            }
            None => {
                prop_assert!(holes.iter().all(|(_, hole)| hole.len() < size));
                prop_assert_eq!(holes.cursor(), cursor_before);
            }
        }
    }
}

#[test]
fn merge_collapses_three_ranges() {
    let mut holes = HoleList::empty();
    holes.insert(Interval::new(0, 4));
    holes.insert(Interval::new(10, 14));
    assert_eq!(holes.len(), 2);

    holes.insert(Interval::new(5, 9));
    assert_eq!(holes.intervals(), [Interval::new(0, 14)]);
    assert_eq!(holes.len(), 1);
    holes.validate().unwrap();
}
