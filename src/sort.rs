//! Stable merge sort over views, parameterized by a scratch buffer of any size.
//!
//! The recursion halves the view, sorts both halves with the same buffer and
//! joins them with [`merge_runs`]. Short views and views sorted without any
//! buffer fall back to insertion sort, so every buffer length from zero to the
//! full input produces the same, stable result.

use std::cmp::Ordering;

use log::debug;

use crate::backing::Backing;
use crate::emit::{AppendSink, CopySink, Sink, SortCopy};
use crate::errors::{Result, ViewError};
use crate::merge::merge_runs;
use crate::view::{Elem, Source, View, ViewMut};

/// Views at most this long are insertion sorted instead of split.
pub const DEFAULT_INSERTION_THRESHOLD: usize = 16;

/// Stable insertion sort, no extra storage.
pub fn insertion_sort<B, F>(view: &mut ViewMut<'_, B>, cmp: &mut F)
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    for i in 1..view.len() {
        if cmp(view.get(i), view.get(i - 1)) != Ordering::Less {
            continue;
        }
        let value = view.get(i).clone();
        let mut j = i;
        while j > 0 && cmp(&value, view.get(j - 1)) == Ordering::Less {
            view.copy_within(j - 1, j);
            j -= 1;
        }
        view.set(j, value);
    }
}

/// Sorts `view` stably, using `buffer` as merge scratch space.
///
/// An empty buffer sorts the whole view by insertion.
pub fn sort<B, S, F>(view: &mut ViewMut<'_, B>, buffer: &mut ViewMut<'_, S>, cmp: &mut F)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    sort_view(view, Some(buffer), cmp, DEFAULT_INSERTION_THRESHOLD);
}

/// Sorts a whole slice by its natural order with a half-length buffer.
pub fn sort_in_place<T: Ord + Clone>(data: &mut [T]) {
    let mut scratch = data[..data.len() / 2].to_vec();
    sort(&mut ViewMut::new(data), &mut ViewMut::new(&mut scratch), &mut T::cmp);
}

fn sort_view<B, S, F>(view: &mut ViewMut<'_, B>, buffer: Option<&mut ViewMut<'_, S>>, cmp: &mut F, threshold: usize)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    match buffer {
        Some(buffer) if !buffer.is_empty() => sort_recursive(view, buffer, cmp, threshold.max(1)),
        _ => {
            if view.len() > threshold {
                debug!("no merge buffer, insertion sorting {} elements", view.len());
            }
            insertion_sort(view, cmp);
        }
    }
}

/// Recursion depth is bounded by `log2(view.len())`.
fn sort_recursive<B, S, F>(view: &mut ViewMut<'_, B>, buffer: &mut ViewMut<'_, S>, cmp: &mut F, threshold: usize)
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let len = view.len();
    if len <= threshold {
        insertion_sort(view, cmp);
        return;
    }
    let mid = len / 2;
    sort_recursive(&mut view.sub(0, mid), buffer, cmp, threshold);
    sort_recursive(&mut view.sub(mid, len - mid), buffer, cmp, threshold);
    merge_runs(view, mid, buffer, cmp);
}

/// A configured sort, materialized by one of [`Sorter::in_place`],
/// [`Sorter::copy_to`] or [`Sorter::add_to`].
///
/// ```
/// use seqview::{Sorter, View, ViewMut};
///
/// let data = vec![4, 3, 2, 1];
/// let mut out = vec![0; 2];
/// let outcome = Sorter::new(View::new(&data), i32::cmp).copy_to(&mut ViewMut::new(&mut out));
/// assert_eq!(out, vec![1, 2]);
/// assert_eq!((outcome.consumed, outcome.written), (2, 2));
/// ```
pub struct Sorter<'b, V, S: ?Sized, F> {
    source: V,
    buffer: Option<ViewMut<'b, S>>,
    cmp: F,
    insertion_threshold: usize,
}

impl<'b, V, F> Sorter<'b, V, [Elem<V>], F>
where
    V: Source,
    F: FnMut(&Elem<V>, &Elem<V>) -> Ordering,
{
    /// A sort of `source` by `cmp` with no buffer.
    pub fn new(source: V, cmp: F) -> Self {
        Self { source, buffer: None, cmp, insertion_threshold: DEFAULT_INSERTION_THRESHOLD }
    }
}

impl<'b, V, S, F> Sorter<'b, V, S, F>
where
    V: Source,
    S: Backing<Item = Elem<V>> + ?Sized,
    F: FnMut(&Elem<V>, &Elem<V>) -> Ordering,
{
    /// Scratch space for merging. Must not overlap the source or destination.
    pub fn buffer<'c, S2>(self, buffer: ViewMut<'c, S2>) -> Sorter<'c, V, S2, F>
    where
        S2: Backing<Item = Elem<V>> + ?Sized,
    {
        Sorter {
            source: self.source,
            buffer: Some(buffer),
            cmp: self.cmp,
            insertion_threshold: self.insertion_threshold,
        }
    }

    /// Sub-views of at most `threshold` elements are insertion sorted.
    pub fn insertion_threshold(mut self, threshold: usize) -> Self {
        self.insertion_threshold = threshold;
        self
    }

    /// Writes the smallest `dest.len()` elements of the sorted result into
    /// `dest`, leaving the source untouched.
    ///
    /// When the whole result fits it is sorted where it lands. Otherwise the
    /// source is sorted in a scratch copy and its prefix emitted, so the written
    /// elements are exactly the prefix of the full stable sort.
    pub fn copy_to<D>(self, dest: &mut ViewMut<'_, D>) -> SortCopy
    where
        D: Backing<Item = Elem<V>> + ?Sized,
    {
        let Sorter { source, mut buffer, mut cmp, insertion_threshold } = self;
        let source = source.view();
        let n = source.len();
        let take = n.min(dest.len());
        if take == 0 {
            return SortCopy::default();
        }

        if take == n {
            let mut head = dest.sub(0, n);
            let mut sink = CopySink::new(&mut head);
            for item in source.iter() {
                let Ok(()) = sink.emit(item.clone());
            }
            sort_view(&mut head, buffer.as_mut(), &mut cmp, insertion_threshold);
        } else {
            let mut scratch = source.to_vec();
            sort_view(&mut ViewMut::new(&mut scratch), buffer.as_mut(), &mut cmp, insertion_threshold);
            let mut sink = CopySink::new(dest);
            for item in scratch.into_iter().take(take) {
                let Ok(()) = sink.emit(item);
            }
        }

        SortCopy { consumed: take, written: take }
    }

    /// Appends the sorted source after `dest`, growing it by `source.len()`.
    ///
    /// Fails before touching anything when `dest` cannot grow.
    pub fn add_to<D>(self, dest: &mut ViewMut<'_, D>) -> Result<usize>
    where
        D: Backing<Item = Elem<V>> + ?Sized,
    {
        let Sorter { source, mut buffer, mut cmp, insertion_threshold } = self;
        let source = source.view();
        let n = source.len();
        if n == 0 {
            return Ok(0);
        }
        if !dest.is_expandable() {
            return Err(ViewError::NotExpandable);
        }

        let start = dest.len();
        let mut sink = AppendSink::new(dest);
        for item in source.iter() {
            sink.emit(item.clone())?;
        }
        let appended = sink.appended();
        sort_view(&mut dest.sub(start, appended), buffer.as_mut(), &mut cmp, insertion_threshold);
        Ok(appended)
    }
}

impl<'a, 'b, B, S, F> Sorter<'b, ViewMut<'a, B>, S, F>
where
    B: Backing + ?Sized,
    S: Backing<Item = B::Item> + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    /// Sorts the source window itself and hands it back; its bounds are unchanged.
    pub fn in_place(self) -> ViewMut<'a, B> {
        let Sorter { source: mut view, mut buffer, mut cmp, insertion_threshold } = self;
        sort_view(&mut view, buffer.as_mut(), &mut cmp, insertion_threshold);
        view
    }
}

/// Convenience for sorting a read-only view into a new vector.
pub fn sorted<B, F>(source: View<'_, B>, buffer_len: usize, mut cmp: F) -> Vec<B::Item>
where
    B: Backing + ?Sized,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    let mut out = source.to_vec();
    let mut scratch = out[..buffer_len.min(out.len())].to_vec();
    sort(&mut ViewMut::new(&mut out), &mut ViewMut::new(&mut scratch), &mut cmp);
    out
}
