//! Sorted-set combination by a two-cursor merge join.
//!
//! Both inputs must be sorted by the same comparator. Each step compares the
//! two cursor elements and, depending on [`SetOp`], emits the smaller one, one
//! copy of an equal pair, or nothing. When one side runs out, the other side is
//! drained for the operations that keep its unmatched elements.

use std::cmp::Ordering;

use log::trace;

use crate::backing::Backing;
use crate::emit::{AppendSink, CopySink, CountSink, JoinCopy, Sink};
use crate::errors::{Result, ViewError};
use crate::view::{Elem, Source, View, ViewMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// Every element of either side; equal pairs once.
    Union,
    /// Elements present on both sides, taken from the first.
    Intersect,
    /// Elements present on exactly one side.
    SymmetricDifference,
    /// Elements of the first side not matched on the second.
    Difference,
}

impl SetOp {
    /// Keeps first-side elements with no partner.
    #[inline(always)]
    fn keeps_first(self) -> bool {
        matches!(self, SetOp::Union | SetOp::SymmetricDifference | SetOp::Difference)
    }

    /// Keeps second-side elements with no partner.
    #[inline(always)]
    fn keeps_second(self) -> bool {
        matches!(self, SetOp::Union | SetOp::SymmetricDifference)
    }

    /// Keeps one element of each equal pair.
    #[inline(always)]
    fn keeps_matched(self) -> bool {
        matches!(self, SetOp::Union | SetOp::Intersect)
    }
}

/// Runs the join, feeding `sink` until both sides are done or the sink fills.
///
/// Returns how many elements of each side were consumed.
fn drive<B1, B2, F, K>(
    first: View<'_, B1>,
    second: View<'_, B2>,
    op: SetOp,
    cmp: &mut F,
    sink: &mut K,
) -> std::result::Result<(usize, usize), K::Error>
where
    B1: Backing + ?Sized,
    B2: Backing<Item = B1::Item> + ?Sized,
    F: FnMut(&B1::Item, &B1::Item) -> Ordering,
    K: Sink<B1::Item>,
{
    let (mut i, mut j) = (0, 0);
    while i < first.len() && j < second.len() {
        if sink.is_full() {
            return Ok((i, j));
        }
        match cmp(first.get(i), second.get(j)) {
            Ordering::Less => {
                if op.keeps_first() {
                    sink.emit(first.get(i).clone())?;
                }
                i += 1;
            }
            Ordering::Greater => {
                if op.keeps_second() {
                    sink.emit(second.get(j).clone())?;
                }
                j += 1;
            }
            Ordering::Equal => {
                if op.keeps_matched() {
                    sink.emit(first.get(i).clone())?;
                }
                i += 1;
                j += 1;
            }
        }
    }

    if op.keeps_first() {
        while i < first.len() && !sink.is_full() {
            sink.emit(first.get(i).clone())?;
            i += 1;
        }
    }
    if op.keeps_second() {
        while j < second.len() && !sink.is_full() {
            sink.emit(second.get(j).clone())?;
            j += 1;
        }
    }
    Ok((i, j))
}

/// A configured join of two sorted sources, materialized by one of
/// [`Join::in_place`], [`Join::copy_to`], [`Join::add_to`] or [`Join::collect`].
///
/// ```
/// use seqview::{Join, SetOp, View};
///
/// let a = [1, 3, 5];
/// let b = [2, 4, 6];
/// let union = Join::new(View::new(&a), View::new(&b), i32::cmp, SetOp::Union).collect();
/// assert_eq!(union, vec![1, 2, 3, 4, 5, 6]);
/// ```
pub struct Join<V, W, F> {
    first: V,
    second: W,
    cmp: F,
    op: SetOp,
}

impl<V, W, F> Join<V, W, F>
where
    V: Source,
    W: Source,
    W::Backing: Backing<Item = Elem<V>>,
    F: FnMut(&Elem<V>, &Elem<V>) -> Ordering,
{
    pub fn new(first: V, second: W, cmp: F, op: SetOp) -> Self {
        Self { first, second, cmp, op }
    }

    /// Number of elements the join produces.
    pub fn count(&mut self) -> usize {
        let mut sink = CountSink::default();
        let Ok(_) = drive(self.first.view(), self.second.view(), self.op, &mut self.cmp, &mut sink);
        sink.0
    }

    /// Overwrites `dest` from the front, stopping as soon as it is full.
    pub fn copy_to<D>(mut self, dest: &mut ViewMut<'_, D>) -> JoinCopy
    where
        D: Backing<Item = Elem<V>> + ?Sized,
    {
        let mut sink = CopySink::new(dest);
        let Ok((first, second)) = drive(self.first.view(), self.second.view(), self.op, &mut self.cmp, &mut sink);
        JoinCopy { first, second, written: sink.written() }
    }

    /// Appends the whole result after `dest`, growing it.
    ///
    /// Fails before touching anything when the result is non-empty and `dest`
    /// cannot grow.
    pub fn add_to<D>(mut self, dest: &mut ViewMut<'_, D>) -> Result<usize>
    where
        D: Backing<Item = Elem<V>> + ?Sized,
    {
        if !dest.is_expandable() {
            return match self.count() {
                0 => Ok(0),
                _ => Err(ViewError::NotExpandable),
            };
        }
        let mut sink = AppendSink::new(dest);
        drive(self.first.view(), self.second.view(), self.op, &mut self.cmp, &mut sink)?;
        Ok(sink.appended())
    }

    pub fn collect(mut self) -> Vec<Elem<V>> {
        let mut out = Vec::new();
        let Ok(_) = drive(self.first.view(), self.second.view(), self.op, &mut self.cmp, &mut out);
        out
    }
}

impl<'a, B, W, F> Join<ViewMut<'a, B>, W, F>
where
    B: Backing + ?Sized,
    W: Source,
    W::Backing: Backing<Item = B::Item>,
    F: FnMut(&B::Item, &B::Item) -> Ordering,
{
    /// Writes the result over the first source and resizes it to fit.
    ///
    /// A dry pass first measures how far the output would run ahead of the
    /// unread input. Expandable backings grow once by that amount and the input
    /// moves to the back of the window; fixed ones are rejected up front. The
    /// merge then writes from the front and never overtakes a read. Expandable
    /// backings are trimmed to the result; fixed ones only shrink the window.
    pub fn in_place(self) -> Result<ViewMut<'a, B>> {
        let Join { first: mut target, second, mut cmp, op } = self;
        let other = second.view();

        let deficit = growth_needed(target.as_view(), other, op, &mut cmp);
        if deficit > 0 {
            if !target.is_expandable() {
                return Err(ViewError::InsufficientCapacity {
                    needed: target.len() + deficit,
                    available: target.len(),
                });
            }
            trace!("in-place join growing window by {deficit}");
            let unread = target.len();
            target.push_n(deficit, other.get(0).clone())?;
            for k in (0..unread).rev() {
                target.copy_within(k, k + deficit);
            }
        }

        // `w` is the next slot to write; `r` the next unread target element.
        // Invariant: w <= r; a second-side write never lands on unread input.
        let (mut r, mut w, mut j) = (deficit, 0, 0);
        let len = target.len();
        while r < len && j < other.len() {
            match cmp(target.get(r), other.get(j)) {
                Ordering::Less => {
                    if op.keeps_first() {
                        target.copy_within(r, w);
                        w += 1;
                    }
                    r += 1;
                }
                Ordering::Greater => {
                    if op.keeps_second() {
                        target.set(w, other.get(j).clone());
                        w += 1;
                    }
                    j += 1;
                }
                Ordering::Equal => {
                    if op.keeps_matched() {
                        target.copy_within(r, w);
                        w += 1;
                    }
                    r += 1;
                    j += 1;
                }
            }
        }
        if op.keeps_first() {
            while r < len {
                target.copy_within(r, w);
                w += 1;
                r += 1;
            }
        }
        if op.keeps_second() {
            while j < other.len() {
                target.set(w, other.get(j).clone());
                w += 1;
                j += 1;
            }
        }

        if w < len {
            if target.is_expandable() {
                target.truncate(w)?;
            } else {
                target.resize(w, true)?;
            }
        }
        Ok(target)
    }
}

/// Dry run of [`Join::in_place`]: the number of slots past the window needed
/// so that no second-side element lands on unread input.
fn growth_needed<B1, B2, F>(target: View<'_, B1>, other: View<'_, B2>, op: SetOp, cmp: &mut F) -> usize
where
    B1: Backing + ?Sized,
    B2: Backing<Item = B1::Item> + ?Sized,
    F: FnMut(&B1::Item, &B1::Item) -> Ordering,
{
    if !op.keeps_second() {
        return 0;
    }
    let mut deficit = 0;
    let (mut i, mut j, mut w) = (0, 0, 0usize);
    while i < target.len() && j < other.len() {
        match cmp(target.get(i), other.get(j)) {
            Ordering::Less => {
                if op.keeps_first() {
                    w += 1;
                }
                i += 1;
            }
            Ordering::Greater => {
                // Writing slot `w` needs `i` unread elements to sit past it.
                deficit = deficit.max((w + 1).saturating_sub(i));
                w += 1;
                j += 1;
            }
            Ordering::Equal => {
                if op.keeps_matched() {
                    w += 1;
                }
                i += 1;
                j += 1;
            }
        }
    }
    // The drained second side lands after everything already written.
    deficit.max((w + other.len() - j).saturating_sub(target.len()))
}

fn collect_ord<T: Ord + Clone>(a: &[T], b: &[T], op: SetOp) -> Vec<T> {
    Join::new(View::new(a), View::new(b), T::cmp, op).collect()
}

pub fn union<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    collect_ord(a, b, SetOp::Union)
}

pub fn intersect<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    collect_ord(a, b, SetOp::Intersect)
}

pub fn symmetric_difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    collect_ord(a, b, SetOp::SymmetricDifference)
}

pub fn difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    collect_ord(a, b, SetOp::Difference)
}
