//! Output sinks shared by the sort and join operations.
//!
//! A computed result can be materialized three ways: over the source itself
//! (in place), into the existing slots of a destination window (copy, stops
//! when the window is full), or appended after a destination window (add,
//! never stops early). The two destination-backed disciplines are sinks; the
//! in-place discipline is specific to each algorithm.

use std::convert::Infallible;

use crate::backing::Backing;
use crate::errors::ViewError;
use crate::view::ViewMut;

/// Receives the elements of a result in order.
pub trait Sink<T> {
    type Error;

    /// Whether the sink can accept no more elements.
    fn is_full(&self) -> bool;

    fn emit(&mut self, value: T) -> Result<(), Self::Error>;
}

/// Overwrites the slots of a destination window from the front.
///
/// Producers check [`Sink::is_full`] before every emit; emitting into a full
/// sink panics like an out-of-bounds write.
pub struct CopySink<'d, 'v, D: ?Sized> {
    dest: &'d mut ViewMut<'v, D>,
    written: usize,
}

impl<'d, 'v, D: Backing + ?Sized> CopySink<'d, 'v, D> {
    pub fn new(dest: &'d mut ViewMut<'v, D>) -> Self {
        Self { dest, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl<D: Backing + ?Sized> Sink<D::Item> for CopySink<'_, '_, D> {
    type Error = Infallible;

    #[inline(always)]
    fn is_full(&self) -> bool {
        self.written >= self.dest.len()
    }

    #[inline(always)]
    fn emit(&mut self, value: D::Item) -> Result<(), Infallible> {
        self.dest.set(self.written, value);
        self.written += 1;
        Ok(())
    }
}

/// Appends after a destination window, growing it and its backing.
pub struct AppendSink<'d, 'v, D: ?Sized> {
    dest: &'d mut ViewMut<'v, D>,
    appended: usize,
}

impl<'d, 'v, D: Backing + ?Sized> AppendSink<'d, 'v, D> {
    pub fn new(dest: &'d mut ViewMut<'v, D>) -> Self {
        Self { dest, appended: 0 }
    }

    pub fn appended(&self) -> usize {
        self.appended
    }
}

impl<D: Backing + ?Sized> Sink<D::Item> for AppendSink<'_, '_, D> {
    type Error = ViewError;

    fn is_full(&self) -> bool {
        false
    }

    fn emit(&mut self, value: D::Item) -> Result<(), ViewError> {
        self.dest.push(value)?;
        self.appended += 1;
        Ok(())
    }
}

/// Counts elements without storing them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountSink(pub usize);

impl<T> Sink<T> for CountSink {
    type Error = Infallible;

    fn is_full(&self) -> bool {
        false
    }

    fn emit(&mut self, _value: T) -> Result<(), Infallible> {
        self.0 += 1;
        Ok(())
    }
}

impl<T> Sink<T> for Vec<T> {
    type Error = Infallible;

    fn is_full(&self) -> bool {
        false
    }

    fn emit(&mut self, value: T) -> Result<(), Infallible> {
        self.push(value);
        Ok(())
    }
}

/// How far a sort copied into a bounded destination.
///
/// `consumed` counts elements of the sorted result taken from the source;
/// the remaining `source.len() - consumed` were not emitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortCopy {
    pub consumed: usize,
    pub written: usize,
}

/// How far a join copied into a bounded destination.
///
/// The three counters advance independently: either source may still hold
/// unconsumed elements when the destination fills up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinCopy {
    pub first: usize,
    pub second: usize,
    pub written: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_sink_fills_front_slots() {
        let mut data = vec![0; 3];
        let mut dest = ViewMut::new(&mut data);
        let mut sink = CopySink::new(&mut dest);
        for value in [7, 8, 9] {
            assert!(!sink.is_full());
            let Ok(()) = sink.emit(value);
        }
        assert!(sink.is_full());
        assert_eq!(sink.written(), 3);
        assert_eq!(data, vec![7, 8, 9]);
    }

    #[test]
    fn test_append_sink_grows_window() {
        let mut data = vec![1, 2, 100];
        let mut dest = ViewMut::with_bounds(&mut data, 0, 2).unwrap();
        let mut sink = AppendSink::new(&mut dest);
        sink.emit(3).unwrap();
        sink.emit(4).unwrap();
        assert_eq!(sink.appended(), 2);
        assert_eq!(dest.len(), 4);
        assert_eq!(data, vec![1, 2, 3, 4, 100]);
    }

    #[test]
    fn test_append_sink_on_fixed_backing() {
        let mut data = [1, 2];
        let mut dest = ViewMut::new(&mut data);
        let mut sink = AppendSink::new(&mut dest);
        assert_eq!(sink.emit(3), Err(ViewError::NotExpandable));
        assert_eq!(sink.appended(), 0);
    }

    #[test]
    fn test_count_sink() {
        let mut sink = CountSink::default();
        for value in ["a", "b"] {
            let Ok(()) = sink.emit(value);
        }
        assert_eq!(sink, CountSink(2));
    }
}
