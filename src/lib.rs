//! In-place sorting, merging and sorted-set algorithms over windows of a
//! caller-owned sequence.
//!
//! A [`View`] or [`ViewMut`] is an offset/count window over any [`Backing`]
//! (slice, array, `Vec`, `VecDeque`, or a user type). The algorithms never own
//! data: they read and write through windows and materialize results in one of
//! three ways:
//!
//! * in place, over the source window;
//! * copied into the existing slots of a destination window, stopping early
//!   when it fills ([`SortCopy`], [`JoinCopy`] report how far they got);
//! * appended after a destination window on a growable backing.
//!
//! ```
//! use seqview::{SetOp, Join, Sorter, View, ViewMut};
//!
//! let mut data = vec![5, 1, 4, 2];
//! let mut scratch = vec![0; 2];
//! Sorter::new(ViewMut::new(&mut data), i32::cmp)
//!     .buffer(ViewMut::new(&mut scratch))
//!     .in_place();
//! assert_eq!(data, vec![1, 2, 4, 5]);
//!
//! let other = vec![2, 3];
//! let common = Join::new(View::new(&data), View::new(&other), i32::cmp, SetOp::Intersect).collect();
//! assert_eq!(common, vec![2]);
//! ```

pub mod backing;
pub mod emit;
pub mod errors;
pub mod join;
pub mod merge;
pub mod rotate;
pub mod search;
pub mod sort;
pub mod view;

pub use backing::Backing;
pub use emit::{JoinCopy, Sink, SortCopy};
pub use errors::{Result, ViewError};
pub use join::{Join, SetOp, difference, intersect, symmetric_difference, union};
pub use merge::adaptive_merge;
pub use rotate::{reverse, rotate};
pub use sort::{DEFAULT_INSERTION_THRESHOLD, Sorter, insertion_sort, sort, sort_in_place, sorted};
pub use view::{Elem, Source, View, ViewMut};
