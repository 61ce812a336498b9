//! Stable merging of two adjacent sorted runs with a caller-sized buffer.
//!
//! The merge picks one of three strategies by comparing the buffer to the
//! shorter run:
//!
//! * buffer holds the shorter run: classic two-pointer merge, O(n);
//! * buffer is smaller but non-empty: the left run is merged in buffer-sized
//!   blocks, each block rotated past the right-run prefix that precedes it;
//! * no buffer: every left element is rotated into place after a binary
//!   search, O(n log n) comparisons and O(n^2) moves in the worst case.
//!
//! On ties the element from the left run always comes first.

use std::cmp::Ordering;

use log::trace;

use crate::backing::Backing;
use crate::errors::{Result, ViewError};
use crate::rotate::rotate_range;
use crate::search::lower_bound;
use crate::view::ViewMut;

/// Merges the sorted runs `view[..mid]` and `view[mid..]` into one sorted run.
///
/// `buffer` is scratch space of any length, including zero. Its contents on
/// return are unspecified.
pub fn adaptive_merge<B, S, F>(
    view: &mut ViewMut<'_, B>,
    mid: usize,
    buffer: &mut ViewMut<'_, S>,
    cmp: &mut F,
) -> Result<()>
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    if mid > view.len() {
        return Err(ViewError::MidOutOfRange { mid, count: view.len() });
    }
    merge_runs(view, mid, buffer, cmp);
    Ok(())
}

/// [`adaptive_merge`] without the split-point check.
pub(crate) fn merge_runs<B, S, F>(view: &mut ViewMut<'_, B>, mid: usize, buffer: &mut ViewMut<'_, S>, cmp: &mut F)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let len = view.len();
    if mid == 0 || mid == len {
        return;
    }
    // Runs already in order.
    if cmp(view.get(mid - 1), view.get(mid)) != Ordering::Greater {
        return;
    }

    let smaller = mid.min(len - mid);
    if buffer.len() >= smaller {
        trace!("linear merge of {mid} + {} elements", len - mid);
        if mid <= len - mid {
            merge_from_left(view, 0, mid, len, buffer, cmp);
        } else {
            merge_from_right(view, mid, buffer, cmp);
        }
    } else if !buffer.is_empty() {
        trace!("block merge of {mid} + {} elements through a {}-slot buffer", len - mid, buffer.len());
        merge_blocks(view, mid, buffer, cmp);
    } else {
        trace!("rotation merge of {mid} + {} elements", len - mid);
        merge_rotating(view, mid, cmp);
    }
}

/// Moves `view[lo..mid]` into the buffer, then merges it with `view[mid..hi]`
/// front to back into `view[lo..hi]`.
fn merge_from_left<B, S, F>(view: &mut ViewMut<'_, B>, lo: usize, mid: usize, hi: usize, buffer: &mut ViewMut<'_, S>, cmp: &mut F)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let n = mid - lo;
    for i in 0..n {
        buffer.set(i, view.get(lo + i).clone());
    }

    let (mut i, mut j, mut k) = (0, mid, lo);
    // k never overtakes j: k - lo == i + (j - mid) and i < n.
    while i < n && j < hi {
        if cmp(view.get(j), buffer.get(i)) == Ordering::Less {
            view.copy_within(j, k);
            j += 1;
        } else {
            view.set(k, buffer.get(i).clone());
            i += 1;
        }
        k += 1;
    }
    while i < n {
        view.set(k, buffer.get(i).clone());
        i += 1;
        k += 1;
    }
}

/// Moves `view[mid..]` into the buffer, then merges back to front.
fn merge_from_right<B, S, F>(view: &mut ViewMut<'_, B>, mid: usize, buffer: &mut ViewMut<'_, S>, cmp: &mut F)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let len = view.len();
    let n = len - mid;
    for i in 0..n {
        buffer.set(i, view.get(mid + i).clone());
    }

    let (mut i, mut j, mut k) = (mid, n, len);
    while i > 0 && j > 0 {
        k -= 1;
        if cmp(buffer.get(j - 1), view.get(i - 1)) == Ordering::Less {
            view.copy_within(i - 1, k);
            i -= 1;
        } else {
            view.set(k, buffer.get(j - 1).clone());
            j -= 1;
        }
    }
    while j > 0 {
        j -= 1;
        view.set(j, buffer.get(j).clone());
    }
}

/// Merges the left run in blocks of at most `buffer.len()` elements.
///
/// For each block, the right-run prefix strictly smaller than the block's last
/// element is rotated in front of the rest of the left run; the block and that
/// prefix are then merged through the buffer and are final.
fn merge_blocks<B, S, F>(view: &mut ViewMut<'_, B>, mid: usize, buffer: &mut ViewMut<'_, S>, cmp: &mut F)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let block = buffer.len();
    let end = view.len();
    let (mut start, mut mid) = (0, mid);

    while start < mid && mid < end {
        let chunk = block.min(mid - start);
        let last = view.get(start + chunk - 1).clone();
        let taken = lower_bound(view.as_view().sub(mid, end - mid), &last, cmp);
        if taken > 0 {
            rotate_range(view, start + chunk, mid, mid + taken);
            merge_from_left(view, start, start + chunk, start + chunk + taken, buffer, cmp);
        }
        start += chunk + taken;
        mid += taken;
    }
}

/// Buffer-free merge: rotate each left element behind the right-run prefix
/// that sorts before it.
fn merge_rotating<B, F>(view: &mut ViewMut<'_, B>, mid: usize, cmp: &mut F)
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let end = view.len();
    let (mut start, mut mid) = (0, mid);

    while start < mid && mid < end {
        let head = view.get(start).clone();
        let taken = lower_bound(view.as_view().sub(mid, end - mid), &head, cmp);
        rotate_range(view, start, mid, mid + taken);
        start += taken + 1;
        mid += taken;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;
    use rstest::rstest;

    /// Two sorted runs of `(key, tag)` pairs; tags record which run an element came from.
    fn runs(rng: &mut fastrand::Rng, left: usize, right: usize, keys: u32) -> Vec<(u32, usize)> {
        let mut l: Vec<u32> = (0..left).map(|_| rng.u32(..keys)).collect();
        let mut r: Vec<u32> = (0..right).map(|_| rng.u32(..keys)).collect();
        l.sort();
        r.sort();
        l.into_iter().chain(r).enumerate().map(|(i, k)| (k, i)).collect()
    }

    fn by_key(a: &(u32, usize), b: &(u32, usize)) -> Ordering {
        a.0.cmp(&b.0)
    }

    fn assert_stably_sorted(data: &[(u32, usize)]) {
        for w in data.windows(2) {
            assert!(w[0] <= w[1], "out of order: {:?} then {:?}", w[0], w[1]);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(25)]
    #[case(100)]
    #[case(150)]
    fn test_merge_every_buffer_size(#[case] buffer_len: usize) {
        let mut rng = fastrand::Rng::with_seed(buffer_len as u64);
        for (left, right) in [(100, 100), (120, 37), (13, 140), (1, 99), (99, 1)] {
            let mut data = runs(&mut rng, left, right, 20);
            let mut expected = data.clone();
            expected.sort();

            let mut scratch = vec![(0, 0); buffer_len];
            let mut view = ViewMut::new(&mut data);
            adaptive_merge(&mut view, left, &mut ViewMut::new(&mut scratch), &mut by_key).unwrap();
            assert_stably_sorted(&data);
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn test_ties_prefer_left_run() {
        let mut data = vec![(1, 0), (2, 1), (2, 2), (1, 3), (2, 4)];
        let mut scratch = vec![(0, 0); 1];
        adaptive_merge(&mut ViewMut::new(&mut data), 3, &mut ViewMut::new(&mut scratch), &mut by_key).unwrap();
        assert_eq!(data, vec![(1, 0), (1, 3), (2, 1), (2, 2), (2, 4)]);
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn test_degenerate_split_points(#[case] mid: usize) {
        let mut data = vec![4, 3, 2, 1];
        let mut scratch: Vec<i32> = Vec::new();
        adaptive_merge(&mut ViewMut::new(&mut data), mid, &mut ViewMut::new(&mut scratch), &mut i32::cmp).unwrap();
        assert_eq!(data, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_split_point_past_end_is_rejected() {
        let mut data = vec![1, 2];
        let mut scratch = vec![0; 2];
        let err = adaptive_merge(&mut ViewMut::new(&mut data), 3, &mut ViewMut::new(&mut scratch), &mut i32::cmp).unwrap_err();
        assert_eq!(err, ViewError::MidOutOfRange { mid: 3, count: 2 });
    }

    #[test]
    fn test_merge_inside_nested_window() {
        let mut data = vec![9, 1, 4, 7, 2, 3, 8, 0];
        let mut scratch = vec![0; 3];
        let mut outer = ViewMut::new(&mut data);
        let mut inner = outer.nest(1, 6).unwrap();
        adaptive_merge(&mut inner, 3, &mut ViewMut::new(&mut scratch), &mut i32::cmp).unwrap();
        assert_eq!(data, vec![9, 1, 2, 3, 4, 7, 8, 0]);
    }

    #[test]
    fn test_buffer_may_be_a_window_of_a_larger_backing() {
        let mut data = vec![5, 6, 7, 1, 2];
        let mut pool = vec![-1; 10];
        let mut buffer = ViewMut::with_bounds(&mut pool, 4, 2).unwrap();
        adaptive_merge(&mut ViewMut::new(&mut data), 3, &mut buffer, &mut i32::cmp).unwrap();
        assert_eq!(data, vec![1, 2, 5, 6, 7]);
        assert!(pool[..4].iter().chain(&pool[6..]).all(|&x| x == -1));
        assert!(crate::search::is_sorted_by(View::new(&data), i32::cmp));
    }
}
