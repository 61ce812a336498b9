//! Backing sequences that views can be laid over.
//!
//! A backing is anything indexable and writable by position. Growable
//! collections additionally report `is_expandable` and support positional
//! insert/remove; fixed-size ones keep the default implementations, which
//! refuse with [`ViewError::NotExpandable`].

use std::collections::VecDeque;

use crate::errors::{Result, ViewError};

pub trait Backing {
    type Item: Clone;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn at(&self, index: usize) -> &Self::Item;

    fn put(&mut self, index: usize, value: Self::Item);

    fn swap_at(&mut self, a: usize, b: usize) {
        if a != b {
            let tmp = self.at(a).clone();
            let other = self.at(b).clone();
            self.put(a, other);
            self.put(b, tmp);
        }
    }

    fn is_expandable(&self) -> bool {
        false
    }

    /// Inserts `value` at `index`, shifting later elements up by one.
    fn insert(&mut self, _index: usize, _value: Self::Item) -> Result<()> {
        Err(ViewError::NotExpandable)
    }

    /// Inserts `count` copies of `value` at `index` in one shift of the tail.
    fn insert_n(&mut self, _index: usize, _count: usize, _value: Self::Item) -> Result<()> {
        Err(ViewError::NotExpandable)
    }

    /// Removes `count` elements starting at `index`, shifting later elements down.
    fn remove_range(&mut self, _index: usize, _count: usize) -> Result<()> {
        Err(ViewError::NotExpandable)
    }
}

impl<T: Clone> Backing for [T] {
    type Item = T;

    #[inline(always)]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline(always)]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }

    #[inline(always)]
    fn put(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    #[inline(always)]
    fn swap_at(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }
}

impl<T: Clone, const N: usize> Backing for [T; N] {
    type Item = T;

    #[inline(always)]
    fn len(&self) -> usize {
        N
    }

    #[inline(always)]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }

    #[inline(always)]
    fn put(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    #[inline(always)]
    fn swap_at(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }
}

impl<T: Clone> Backing for Vec<T> {
    type Item = T;

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline(always)]
    fn at(&self, index: usize) -> &T {
        &self[index]
    }

    #[inline(always)]
    fn put(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    #[inline(always)]
    fn swap_at(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > Vec::len(self) {
            return Err(ViewError::IndexOutOfBounds { index, count: Vec::len(self) });
        }
        Vec::insert(self, index, value);
        Ok(())
    }

    fn insert_n(&mut self, index: usize, count: usize, value: T) -> Result<()> {
        if index > Vec::len(self) {
            return Err(ViewError::IndexOutOfBounds { index, count: Vec::len(self) });
        }
        self.splice(index..index, std::iter::repeat_n(value, count));
        Ok(())
    }

    fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let len = Vec::len(self);
        if index.checked_add(count).is_none_or(|end| end > len) {
            return Err(ViewError::InvalidRange { offset: index, count, len });
        }
        self.drain(index..index + count);
        Ok(())
    }
}

impl<T: Clone> Backing for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn at(&self, index: usize) -> &T {
        &self[index]
    }

    fn put(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    fn swap_at(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > VecDeque::len(self) {
            return Err(ViewError::IndexOutOfBounds { index, count: VecDeque::len(self) });
        }
        VecDeque::insert(self, index, value);
        Ok(())
    }

    fn insert_n(&mut self, index: usize, count: usize, value: T) -> Result<()> {
        if index > VecDeque::len(self) {
            return Err(ViewError::IndexOutOfBounds { index, count: VecDeque::len(self) });
        }
        let mut tail = self.split_off(index);
        self.extend(std::iter::repeat_n(value, count));
        self.append(&mut tail);
        Ok(())
    }

    fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let len = VecDeque::len(self);
        if index.checked_add(count).is_none_or(|end| end > len) {
            return Err(ViewError::InvalidRange { offset: index, count, len });
        }
        self.drain(index..index + count);
        Ok(())
    }
}
