//! Block rotation without scratch space.

use crate::backing::Backing;
use crate::errors::{Result, ViewError};
use crate::view::ViewMut;

/// Reverses `[lo, hi)` of the view in place.
#[inline]
fn reverse_range<B: Backing + ?Sized>(view: &mut ViewMut<'_, B>, mut lo: usize, mut hi: usize) {
    while lo + 1 < hi {
        hi -= 1;
        view.swap(lo, hi);
        lo += 1;
    }
}

pub fn reverse<B: Backing + ?Sized>(view: &mut ViewMut<'_, B>) {
    let len = view.len();
    reverse_range(view, 0, len);
}

/// Swaps the blocks `[0, mid)` and `[mid, len)`, keeping each block's order.
///
/// Three reversals: O(len) swaps and no auxiliary storage.
pub fn rotate<B: Backing + ?Sized>(view: &mut ViewMut<'_, B>, mid: usize) -> Result<()> {
    let len = view.len();
    if mid > len {
        return Err(ViewError::MidOutOfRange { mid, count: len });
    }
    rotate_range(view, 0, mid, len);
    Ok(())
}

/// Rotates `[lo, hi)` so that `[mid, hi)` ends up in front of `[lo, mid)`.
///
/// Callers guarantee `lo <= mid <= hi <= view.len()`.
#[inline]
pub(crate) fn rotate_range<B: Backing + ?Sized>(view: &mut ViewMut<'_, B>, lo: usize, mid: usize, hi: usize) {
    if lo == mid || mid == hi {
        return;
    }
    reverse_range(view, lo, mid);
    reverse_range(view, mid, hi);
    reverse_range(view, lo, hi);
}
