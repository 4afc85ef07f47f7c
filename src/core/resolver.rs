//! Overlap resolution.
//!
//! The working set is kept in [`sort_periods`] order and scanned pairwise. The first
//! overlapping pair found is resolved by exactly one mutation (trim, split or removal),
//! after which the set is re-sorted and the scan restarts from the top. The run ends
//! when a full pass applies no mutation.
//!
//! Each mutation strictly shortens an interval, deletes one, or replaces one with two
//! disjoint, strictly shorter fragments, so the amount of overlapping coverage keeps
//! shrinking and the loop reaches a fixpoint.
//!
//! Input periods must satisfy `start <= end`; see [`crate::utils::validation`].

use crate::core::ordering::sort_periods;
use crate::domain::model::{Period, Resolution, ResolutionStep};
use chrono::NaiveDate;

/// Flattens `periods` into a sorted set where no two periods of a product share a day.
pub fn resolve(periods: Vec<Period>) -> Vec<Period> {
    run(periods, None)
}

/// Same as [`resolve`], also returning every mutation in the order it was applied.
pub fn resolve_traced(periods: Vec<Period>) -> Resolution {
    let mut steps = Vec::new();
    let periods = run(periods, Some(&mut steps));
    Resolution { periods, steps }
}

fn run(mut periods: Vec<Period>, mut trace: Option<&mut Vec<ResolutionStep>>) -> Vec<Period> {
    sort_periods(&mut periods);

    let mut i = 0;
    while i + 1 < periods.len() {
        match resolve_pair(&mut periods, i) {
            Some(step) => {
                if let Some(steps) = trace.as_deref_mut() {
                    steps.push(step);
                }
                sort_periods(&mut periods);
                i = 0;
            }
            None => i += 1,
        }
    }

    periods
}

/// Resolves the pair at `i`, `i + 1` if it overlaps. Returns `None` without touching
/// the set otherwise.
fn resolve_pair(periods: &mut Vec<Period>, i: usize) -> Option<ResolutionStep> {
    let current = periods[i].clone();
    let next = periods[i + 1].clone();

    // Sorting groups by product, but a pair straddling two products must never interact.
    if current.product != next.product || current.end < next.start {
        return None;
    }

    if current.priority > next.priority {
        // Sorted order puts the stronger period first on equal starts, so here
        // current.start < next.start and the head keeps at least one day.
        let head_end = previous_day(next.start);
        periods[i].end = head_end;

        if current.end > next.end {
            let tail = Period {
                start: next_day(next.end),
                end: current.end,
                ..current.clone()
            };
            let step = ResolutionStep::Split {
                id: current.id,
                product: current.product,
                priority: current.priority,
                head_end,
                tail_start: tail.start,
                tail_end: tail.end,
                by: next.id,
            };
            periods.push(tail);
            Some(step)
        } else {
            Some(ResolutionStep::TrimmedEnd {
                id: current.id,
                product: current.product,
                priority: current.priority,
                old_end: current.end,
                new_end: head_end,
                by: next.id,
            })
        }
    } else if current.end >= next.end {
        // Order-preserving removal keeps full ties in input order across partitions.
        let removed = periods.remove(i + 1);
        Some(ResolutionStep::Removed {
            removed,
            by: current.id,
        })
    } else {
        let new_start = next_day(current.end);
        periods[i + 1].start = new_start;
        Some(ResolutionStep::TrimmedStart {
            id: next.id,
            product: next.product,
            priority: next.priority,
            old_start: next.start,
            new_start,
            by: current.id,
        })
    }
}

// Callers only step inside an interval that has room, so the calendar bounds are never hit.
fn next_day(day: NaiveDate) -> NaiveDate {
    day.succ_opt().unwrap_or(day)
}

fn previous_day(day: NaiveDate) -> NaiveDate {
    day.pred_opt().unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(id: i64, start: &str, end: &str, priority: i32) -> Period {
        Period::new(id, day(start), day(end), 10.0 + id as f64, 100, priority)
    }

    fn spans(periods: &[Period]) -> Vec<(i64, NaiveDate, NaiveDate, i32)> {
        periods
            .iter()
            .map(|p| (p.id, p.start, p.end, p.priority))
            .collect()
    }

    #[test]
    fn test_empty_and_single_inputs_are_returned_as_is() {
        assert!(resolve(Vec::new()).is_empty());

        let single = vec![period(1, "2024-01-01", "2024-01-31", 1)];
        assert_eq!(resolve(single.clone()), single);
    }

    #[test]
    fn test_stronger_container_removes_weaker() {
        let out = resolve_traced(vec![
            period(1, "2024-01-01", "2024-01-31", 1),
            period(2, "2024-01-10", "2024-01-20", 2),
        ]);

        assert_eq!(
            spans(&out.periods),
            vec![(1, day("2024-01-01"), day("2024-01-31"), 1)]
        );
        assert!(matches!(
            out.steps.as_slice(),
            [ResolutionStep::Removed { by: 1, .. }]
        ));
    }

    #[test]
    fn test_weaker_container_is_split_around_stronger() {
        let out = resolve_traced(vec![
            period(1, "2024-01-01", "2024-01-31", 2),
            period(2, "2024-01-10", "2024-01-20", 1),
        ]);

        assert_eq!(
            spans(&out.periods),
            vec![
                (1, day("2024-01-01"), day("2024-01-09"), 2),
                (2, day("2024-01-10"), day("2024-01-20"), 1),
                (1, day("2024-01-21"), day("2024-01-31"), 2),
            ]
        );
        assert_eq!(out.periods[0].price, out.periods[2].price);
        assert_eq!(out.steps.len(), 1);
    }

    #[test]
    fn test_weaker_tail_is_trimmed_at_start() {
        let out = resolve(vec![
            period(1, "2024-01-01", "2024-01-15", 1),
            period(2, "2024-01-10", "2024-01-25", 2),
        ]);

        assert_eq!(
            spans(&out),
            vec![
                (1, day("2024-01-01"), day("2024-01-15"), 1),
                (2, day("2024-01-16"), day("2024-01-25"), 2),
            ]
        );
    }

    #[test]
    fn test_weaker_head_is_trimmed_at_end() {
        let out = resolve(vec![
            period(1, "2024-01-01", "2024-01-15", 2),
            period(2, "2024-01-10", "2024-01-25", 1),
        ]);

        assert_eq!(
            spans(&out),
            vec![
                (1, day("2024-01-01"), day("2024-01-09"), 2),
                (2, day("2024-01-10"), day("2024-01-25"), 1),
            ]
        );
    }

    #[test]
    fn test_equal_priority_earlier_start_wins() {
        let out = resolve(vec![
            period(2, "2024-01-05", "2024-01-20", 1),
            period(1, "2024-01-01", "2024-01-10", 1),
        ]);

        assert_eq!(
            spans(&out),
            vec![
                (1, day("2024-01-01"), day("2024-01-10"), 1),
                (2, day("2024-01-11"), day("2024-01-20"), 1),
            ]
        );
    }

    #[test]
    fn test_touching_periods_are_left_alone() {
        let input = vec![
            period(1, "2024-01-01", "2024-01-10", 2),
            period(2, "2024-01-11", "2024-01-20", 1),
        ];

        let out = resolve_traced(input.clone());

        assert_eq!(out.periods, input);
        assert!(out.steps.is_empty());
    }

    #[test]
    fn test_single_shared_boundary_day_is_resolved() {
        let out = resolve(vec![
            period(1, "2024-01-01", "2024-01-10", 1),
            period(2, "2024-01-10", "2024-01-20", 2),
        ]);

        assert_eq!(out[1].start, day("2024-01-11"));
        assert_eq!(out[0].end, day("2024-01-10"));
    }

    #[test]
    fn test_identical_intervals_keep_the_stronger() {
        let out = resolve(vec![
            period(1, "2024-01-01", "2024-01-31", 3),
            period(2, "2024-01-01", "2024-01-31", 1),
        ]);

        assert_eq!(spans(&out), vec![(2, day("2024-01-01"), day("2024-01-31"), 1)]);
    }

    #[test]
    fn test_products_never_interact() {
        let mut other = period(2, "2024-01-01", "2024-01-31", 1);
        other.product = 200;
        let input = vec![period(1, "2024-01-10", "2024-02-20", 5), other];

        let out = resolve(input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].product, 100);
        assert_eq!(out[0].end, day("2024-02-20"));
        assert_eq!(out[1].product, 200);
    }

    #[test]
    fn test_base_price_with_two_promotions_splits_three_ways() {
        let out = resolve(vec![
            period(1, "2024-01-01", "2024-12-31", 9),
            period(2, "2024-03-01", "2024-03-31", 1),
            period(3, "2024-07-01", "2024-07-15", 2),
        ]);

        assert_eq!(
            spans(&out),
            vec![
                (1, day("2024-01-01"), day("2024-02-29"), 9),
                (2, day("2024-03-01"), day("2024-03-31"), 1),
                (1, day("2024-04-01"), day("2024-06-30"), 9),
                (3, day("2024-07-01"), day("2024-07-15"), 2),
                (1, day("2024-07-16"), day("2024-12-31"), 9),
            ]
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve(vec![
            period(1, "2024-01-01", "2024-06-30", 3),
            period(2, "2024-02-01", "2024-02-29", 1),
            period(3, "2024-02-15", "2024-04-15", 2),
            period(4, "2024-04-01", "2024-08-31", 3),
        ]);

        let second = resolve_traced(first.clone());

        assert_eq!(second.periods, first);
        assert!(second.steps.is_empty());
    }

    /// Small deterministic generator so the property checks need no extra crates.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u64) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 33) % bound
        }
    }

    fn random_batch(rng: &mut Lcg, count: usize) -> Vec<Period> {
        let base = day("2024-01-01");
        (0..count)
            .map(|id| {
                let start = base + chrono::Days::new(rng.next(60));
                let end = start + chrono::Days::new(rng.next(30));
                Period::new(
                    id as i64,
                    start,
                    end,
                    rng.next(1000) as f64 / 10.0,
                    1 + rng.next(3) as i64,
                    1 + rng.next(4) as i32,
                )
            })
            .collect()
    }

    /// Lowest priority covering each (product, day) pair.
    fn strongest_by_day(periods: &[Period]) -> BTreeMap<(i64, NaiveDate), i32> {
        let mut owners = BTreeMap::new();
        for p in periods {
            for d in p.start.iter_days().take_while(|d| *d <= p.end) {
                let entry = owners.entry((p.product, d)).or_insert(p.priority);
                *entry = (*entry).min(p.priority);
            }
        }
        owners
    }

    #[test]
    fn test_random_batches_flatten_to_strongest_owner_per_day() {
        let mut rng = Lcg(0x5eed);

        for _ in 0..200 {
            let input = random_batch(&mut rng, 12);
            let expected = strongest_by_day(&input);

            let out = resolve(input.clone());

            let mut seen = BTreeMap::new();
            for p in &out {
                assert!(p.start <= p.end, "degenerate output {}", p);
                let original = input.iter().find(|i| i.id == p.id).unwrap();
                assert_eq!(original.price, p.price);
                assert_eq!(original.priority, p.priority);
                assert_eq!(original.product, p.product);
                assert!(original.start <= p.start && p.end <= original.end);

                for d in p.start.iter_days().take_while(|d| *d <= p.end) {
                    assert!(
                        seen.insert((p.product, d), p.priority).is_none(),
                        "day {} of product {} covered twice",
                        d,
                        p.product
                    );
                }
            }

            assert_eq!(seen, expected);
            assert_eq!(resolve(out.clone()), out);
        }
    }
}
