//! Error types for view construction and the algorithms built on views.

use thiserror::Error;

/// Result type alias for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;

/// Error type for view operations.
///
/// Every fallible operation validates its arguments before touching an element,
/// so an `Err` always means the view and any destination are unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The window does not fit inside its backing sequence.
    #[error("Invalid range: offset {offset} + count {count} exceeds backing length {len}")]
    InvalidRange {
        /// Requested offset into the backing.
        offset: usize,
        /// Requested number of elements.
        count: usize,
        /// Length of the backing sequence.
        len: usize,
    },

    /// An element index lies outside the window.
    #[error("Index {index} out of bounds for view of {count} elements")]
    IndexOutOfBounds {
        /// The offending index, relative to the view.
        index: usize,
        /// Number of elements in the view.
        count: usize,
    },

    /// A split point lies outside `[0, count]`.
    #[error("Split point {mid} out of range for view of {count} elements")]
    MidOutOfRange {
        /// The requested split point.
        mid: usize,
        /// Number of elements in the view.
        count: usize,
    },

    /// The operation needs to grow or shrink a fixed-size backing.
    #[error("Backing sequence is not expandable")]
    NotExpandable,

    /// The destination cannot hold the result.
    #[error("Insufficient capacity: needed {needed}, available {available}")]
    InsufficientCapacity {
        /// Slots the operation needs.
        needed: usize,
        /// Slots the destination offers.
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let error = ViewError::InvalidRange { offset: 4, count: 3, len: 5 };
        let msg = format!("{error}");
        assert!(msg.contains("offset 4"));
        assert!(msg.contains("backing length 5"));
    }

    #[test]
    fn test_mid_out_of_range_message() {
        let error = ViewError::MidOutOfRange { mid: 7, count: 3 };
        assert_eq!(format!("{error}"), "Split point 7 out of range for view of 3 elements");
    }

    #[test]
    fn test_errors_compare_by_value() {
        assert_eq!(ViewError::NotExpandable, ViewError::NotExpandable);
        assert_ne!(
            ViewError::InsufficientCapacity { needed: 2, available: 1 },
            ViewError::InsufficientCapacity { needed: 3, available: 1 }
        );
    }
}
