//! Binary searches over sorted views.

use std::cmp::Ordering;

use crate::backing::Backing;
use crate::view::View;

/// Returns the first index whose element fails `pred`, assuming every element
/// satisfying `pred` precedes every element that does not.
pub fn partition_point<B, P>(view: View<'_, B>, mut pred: P) -> usize
where
    B: Backing + ?Sized,
    P: FnMut(&B::Item) -> bool,
{
    let mut lo = 0;
    let mut hi = view.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(view.get(mid)) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// First index whose element is not less than `value`.
pub fn lower_bound<B, F>(view: View<'_, B>, value: &B::Item, cmp: &mut F) -> usize
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    partition_point(view, |x| cmp(x, value) == Ordering::Less)
}

/// First index whose element is greater than `value`.
pub fn upper_bound<B, F>(view: View<'_, B>, value: &B::Item, cmp: &mut F) -> usize
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    partition_point(view, |x| cmp(value, x) != Ordering::Less)
}

pub fn is_sorted_by<B, F>(view: View<'_, B>, mut cmp: F) -> bool
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    (1..view.len()).all(|i| cmp(view.get(i - 1), view.get(i)) != Ordering::Greater)
}
