//! Offset/count windows over a caller-owned backing sequence.
//!
//! [`View`] is the read-only window and [`ViewMut`] the writable one; both
//! carry only a reference to the backing plus bounds, so narrowing a window
//! with [`ViewMut::nest`] never copies. Every algorithm in this crate works
//! through these two types instead of slices so that growable backings can be
//! extended in place.

use std::fmt;

use crate::backing::Backing;
use crate::errors::{Result, ViewError};

/// Validates `offset + count <= len`.
fn check_bounds(len: usize, offset: usize, count: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(ViewError::InvalidRange { offset, count, len }),
    }
}

/// Computes the bounds after translating by `delta`.
///
/// Checked translation rejects anything leaving the backing; unchecked
/// translation clamps the offset into `[0, len]` and trims the count to fit.
fn shifted(len: usize, offset: usize, count: usize, delta: isize, checked: bool) -> Result<(usize, usize)> {
    let target = offset as i128 + delta as i128;
    if checked {
        if target < 0 {
            return Err(ViewError::InvalidRange { offset: 0, count, len });
        }
        let target = usize::try_from(target).map_err(|_| ViewError::InvalidRange { offset: usize::MAX, count, len })?;
        check_bounds(len, target, count)?;
        Ok((target, count))
    } else {
        let target = target.clamp(0, len as i128) as usize;
        Ok((target, count.min(len - target)))
    }
}

/// Computes the count after resizing; unchecked resizing clamps to the backing.
fn resized(len: usize, offset: usize, new_count: usize, checked: bool) -> Result<usize> {
    if checked {
        check_bounds(len, offset, new_count)?;
        Ok(new_count)
    } else {
        Ok(new_count.min(len.saturating_sub(offset)))
    }
}

/// A read-only window `[offset, offset + count)` over a backing sequence.
pub struct View<'a, B: ?Sized> {
    backing: &'a B,
    offset: usize,
    count: usize,
}

impl<B: ?Sized> Clone for View<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for View<'_, B> {}

impl<B: ?Sized> fmt::Debug for View<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("offset", &self.offset).field("count", &self.count).finish()
    }
}

impl<'a, B: Backing + ?Sized> View<'a, B> {
    /// Wraps the whole backing.
    pub fn new(backing: &'a B) -> Self {
        let count = backing.len();
        Self { backing, offset: 0, count }
    }

    pub fn with_bounds(backing: &'a B, offset: usize, count: usize) -> Result<Self> {
        check_bounds(backing.len(), offset, count)?;
        Ok(Self { backing, offset, count })
    }

    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the element at `index`, relative to the window.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> &'a B::Item {
        assert!(index < self.count, "index {index} out of bounds for view of {} elements", self.count);
        self.backing.at(self.offset + index)
    }

    pub fn try_get(&self, index: usize) -> Result<&'a B::Item> {
        if index < self.count {
            Ok(self.backing.at(self.offset + index))
        } else {
            Err(ViewError::IndexOutOfBounds { index, count: self.count })
        }
    }

    /// Returns a window over `[offset, offset + count)` of this window.
    pub fn nest(&self, offset: usize, count: usize) -> Result<View<'a, B>> {
        check_bounds(self.count, offset, count)?;
        Ok(View { backing: self.backing, offset: self.offset + offset, count })
    }

    /// Unvalidated [`View::nest`] for callers that already hold the bounds.
    #[inline(always)]
    pub(crate) fn sub(&self, offset: usize, count: usize) -> View<'a, B> {
        debug_assert!(offset + count <= self.count);
        View { backing: self.backing, offset: self.offset + offset, count }
    }

    pub fn shift(&mut self, delta: isize, checked: bool) -> Result<()> {
        (self.offset, self.count) = shifted(self.backing.len(), self.offset, self.count, delta, checked)?;
        Ok(())
    }

    pub fn resize(&mut self, new_count: usize, checked: bool) -> Result<()> {
        self.count = resized(self.backing.len(), self.offset, new_count, checked)?;
        Ok(())
    }

    pub fn iter(&self) -> Iter<'a, B> {
        Iter { view: *self, next: 0 }
    }

    pub fn to_vec(&self) -> Vec<B::Item> {
        self.iter().cloned().collect()
    }
}

/// Anything that can be read through a [`View`].
///
/// Lets the lazy operations in [`crate::sort`] and [`crate::join`] accept
/// either window type as their source.
pub trait Source {
    type Backing: Backing + ?Sized;

    fn view(&self) -> View<'_, Self::Backing>;
}

/// Element type of a [`Source`].
pub type Elem<V> = <<V as Source>::Backing as Backing>::Item;

impl<B: Backing + ?Sized> Source for View<'_, B> {
    type Backing = B;

    fn view(&self) -> View<'_, B> {
        *self
    }
}

impl<B: Backing + ?Sized> Source for ViewMut<'_, B> {
    type Backing = B;

    fn view(&self) -> View<'_, B> {
        self.as_view()
    }
}

/// Iterator over the elements of a [`View`].
pub struct Iter<'a, B: ?Sized> {
    view: View<'a, B>,
    next: usize,
}

impl<'a, B: Backing + ?Sized> Iterator for Iter<'a, B> {
    type Item = &'a B::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.view.count {
            let item = self.view.get(self.next);
            self.next += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<B: Backing + ?Sized> ExactSizeIterator for Iter<'_, B> {}

/// A writable window `[offset, offset + count)` over a backing sequence.
///
/// Growth (`push`, `insert`) and shrinking (`truncate`) go through to the
/// backing and therefore require an expandable one.
pub struct ViewMut<'a, B: ?Sized> {
    backing: &'a mut B,
    offset: usize,
    count: usize,
}

impl<B: ?Sized> fmt::Debug for ViewMut<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut").field("offset", &self.offset).field("count", &self.count).finish()
    }
}

impl<'a, B: Backing + ?Sized> ViewMut<'a, B> {
    /// Wraps the whole backing.
    pub fn new(backing: &'a mut B) -> Self {
        let count = backing.len();
        Self { backing, offset: 0, count }
    }

    pub fn with_bounds(backing: &'a mut B, offset: usize, count: usize) -> Result<Self> {
        check_bounds(backing.len(), offset, count)?;
        Ok(Self { backing, offset, count })
    }

    /// An empty window positioned at the end of the backing, ready to `push` into.
    pub fn at_end(backing: &'a mut B) -> Self {
        let offset = backing.len();
        Self { backing, offset, count: 0 }
    }

    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_expandable(&self) -> bool {
        self.backing.is_expandable()
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> &B::Item {
        assert!(index < self.count, "index {index} out of bounds for view of {} elements", self.count);
        self.backing.at(self.offset + index)
    }

    pub fn try_get(&self, index: usize) -> Result<&B::Item> {
        if index < self.count {
            Ok(self.backing.at(self.offset + index))
        } else {
            Err(ViewError::IndexOutOfBounds { index, count: self.count })
        }
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline(always)]
    pub fn set(&mut self, index: usize, value: B::Item) {
        assert!(index < self.count, "index {index} out of bounds for view of {} elements", self.count);
        self.backing.put(self.offset + index, value);
    }

    pub fn try_set(&mut self, index: usize, value: B::Item) -> Result<()> {
        if index < self.count {
            self.backing.put(self.offset + index, value);
            Ok(())
        } else {
            Err(ViewError::IndexOutOfBounds { index, count: self.count })
        }
    }

    /// Copies the element at `from` over the element at `to`.
    #[inline(always)]
    pub fn copy_within(&mut self, from: usize, to: usize) {
        if from != to {
            let value = self.get(from).clone();
            self.set(to, value);
        }
    }

    /// # Panics
    ///
    /// Panics if either index is outside the window.
    #[inline(always)]
    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(a < self.count && b < self.count, "swap ({a}, {b}) out of bounds for view of {} elements", self.count);
        self.backing.swap_at(self.offset + a, self.offset + b);
    }

    /// Returns a writable window over `[offset, offset + count)` of this window.
    pub fn nest(&mut self, offset: usize, count: usize) -> Result<ViewMut<'_, B>> {
        check_bounds(self.count, offset, count)?;
        Ok(ViewMut { backing: &mut *self.backing, offset: self.offset + offset, count })
    }

    #[inline(always)]
    pub(crate) fn sub(&mut self, offset: usize, count: usize) -> ViewMut<'_, B> {
        debug_assert!(offset + count <= self.count);
        ViewMut { backing: &mut *self.backing, offset: self.offset + offset, count }
    }

    pub fn shift(&mut self, delta: isize, checked: bool) -> Result<()> {
        (self.offset, self.count) = shifted(self.backing.len(), self.offset, self.count, delta, checked)?;
        Ok(())
    }

    pub fn resize(&mut self, new_count: usize, checked: bool) -> Result<()> {
        self.count = resized(self.backing.len(), self.offset, new_count, checked)?;
        Ok(())
    }

    pub fn as_view(&self) -> View<'_, B> {
        View { backing: &*self.backing, offset: self.offset, count: self.count }
    }

    /// Appends `value` directly after the window, growing both the window and the backing.
    pub fn push(&mut self, value: B::Item) -> Result<()> {
        self.backing.insert(self.offset + self.count, value)?;
        self.count += 1;
        Ok(())
    }

    /// Appends `count` copies of `value` after the window in a single insertion.
    pub fn push_n(&mut self, count: usize, value: B::Item) -> Result<()> {
        self.backing.insert_n(self.offset + self.count, count, value)?;
        self.count += count;
        Ok(())
    }

    /// Inserts `value` at `index` within the window, growing the backing.
    pub fn insert(&mut self, index: usize, value: B::Item) -> Result<()> {
        if index > self.count {
            return Err(ViewError::IndexOutOfBounds { index, count: self.count });
        }
        self.backing.insert(self.offset + index, value)?;
        self.count += 1;
        Ok(())
    }

    /// Drops everything past `new_count` from the window and the backing.
    pub fn truncate(&mut self, new_count: usize) -> Result<()> {
        if new_count >= self.count {
            return Ok(());
        }
        self.backing.remove_range(self.offset + new_count, self.count - new_count)?;
        self.count = new_count;
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<B::Item> {
        self.as_view().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_whole_backing() {
        let data = vec![1, 2, 3];
        let view = View::new(&data);
        assert_eq!(view.len(), 3);
        assert_eq!(view.offset(), 0);
        assert_eq!(view.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    #[case(0, 5, true)]
    #[case(2, 3, true)]
    #[case(5, 0, true)]
    #[case(3, 3, false)]
    #[case(6, 0, false)]
    #[case(usize::MAX, 2, false)]
    fn test_with_bounds(#[case] offset: usize, #[case] count: usize, #[case] valid: bool) {
        let data = [0u8; 5];
        assert_eq!(View::with_bounds(&data[..], offset, count).is_ok(), valid);
    }

    #[test]
    fn test_nest_stays_inside_parent() {
        let mut data = vec![0, 1, 2, 3, 4, 5];
        let mut view = ViewMut::with_bounds(&mut data, 1, 4).unwrap();
        {
            let mut inner = view.nest(1, 2).unwrap();
            assert_eq!(inner.offset(), 2);
            inner.set(0, 20);
            inner.set(1, 30);
        }
        assert!(view.nest(3, 2).is_err());
        assert_eq!(view.to_vec(), vec![1, 20, 30, 4]);
        assert_eq!(data, vec![0, 1, 20, 30, 4, 5]);
    }

    #[rstest]
    #[case(2, true, Ok((3, 2)))]
    #[case(-1, true, Ok((0, 2)))]
    #[case(-2, true, Err(()))]
    #[case(4, true, Err(()))]
    #[case(4, false, Ok((5, 0)))]
    #[case(3, false, Ok((4, 1)))]
    #[case(-9, false, Ok((0, 2)))]
    fn test_shift(#[case] delta: isize, #[case] checked: bool, #[case] expected: std::result::Result<(usize, usize), ()>) {
        let data = [0u8; 5];
        let mut view = View::with_bounds(&data[..], 1, 2).unwrap();
        let outcome = view.shift(delta, checked).map(|()| (view.offset(), view.len())).map_err(|_| ());
        assert_eq!(outcome, expected);
    }

    #[test]
    fn test_failed_shift_leaves_bounds() {
        let data = [0u8; 5];
        let mut view = View::with_bounds(&data[..], 1, 2).unwrap();
        assert!(view.shift(10, true).is_err());
        assert_eq!((view.offset(), view.len()), (1, 2));
    }

    #[rstest]
    #[case(3, true, Some(3))]
    #[case(5, true, None)]
    #[case(5, false, Some(4))]
    #[case(0, false, Some(0))]
    fn test_resize(#[case] new_count: usize, #[case] checked: bool, #[case] expected: Option<usize>) {
        let mut data = vec![0u8; 5];
        let mut view = ViewMut::with_bounds(&mut data, 1, 1).unwrap();
        let outcome = view.resize(new_count, checked).ok().map(|()| view.len());
        assert_eq!(outcome, expected);
    }

    #[test]
    fn test_push_grows_backing_in_the_middle() {
        let mut data = vec![1, 2, 9];
        let mut view = ViewMut::with_bounds(&mut data, 0, 2).unwrap();
        view.push(3).unwrap();
        view.insert(0, 0).unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(data, vec![0, 1, 2, 3, 9]);
    }

    #[test]
    fn test_push_n_keeps_trailing_elements() {
        let mut data = vec![1, 2, 9];
        let mut view = ViewMut::with_bounds(&mut data, 0, 2).unwrap();
        view.push_n(2, 0).unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(data, vec![1, 2, 0, 0, 9]);
    }

    #[test]
    fn test_push_on_fixed_backing_fails() {
        let mut data = [1, 2];
        let mut view = ViewMut::new(&mut data);
        assert_eq!(view.push(3), Err(ViewError::NotExpandable));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_truncate_removes_from_backing() {
        let mut data = vec![1, 2, 3, 4, 5];
        let mut view = ViewMut::with_bounds(&mut data, 1, 3).unwrap();
        view.truncate(1).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(data, vec![1, 2, 5]);
    }

    #[test]
    fn test_at_end_appends() {
        let mut data = vec![1, 2];
        let mut tail = ViewMut::at_end(&mut data);
        tail.push(3).unwrap();
        assert_eq!((tail.offset(), tail.len()), (2, 1));
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_try_accessors() {
        let mut data = vec![1, 2, 3];
        let mut view = ViewMut::with_bounds(&mut data, 1, 2).unwrap();
        assert_eq!(view.try_get(1), Ok(&3));
        assert_eq!(view.try_get(2), Err(ViewError::IndexOutOfBounds { index: 2, count: 2 }));
        assert!(view.try_set(2, 0).is_err());
        view.swap(0, 1);
        assert_eq!(view.as_view().iter().copied().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_past_window_panics() {
        let data = vec![1, 2, 3];
        let view = View::with_bounds(&data, 0, 2).unwrap();
        let _ = view.get(2);
    }
}
