use crate::domain::model::Period;
use std::cmp::Ordering;

/// Product ascending, then start ascending, then priority ascending.
/// For periods of one product this makes adjacency sufficient to detect overlap.
pub fn compare_periods(a: &Period, b: &Period) -> Ordering {
    a.product
        .cmp(&b.product)
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.priority.cmp(&b.priority))
}

pub fn sort_periods(periods: &mut [Period]) {
    periods.sort_by(compare_periods);
}

pub fn is_sorted(periods: &[Period]) -> bool {
    periods
        .windows(2)
        .all(|pair| compare_periods(&pair[0], &pair[1]) != Ordering::Greater)
}
