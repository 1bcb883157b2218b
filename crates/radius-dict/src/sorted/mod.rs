//! Generic sorted-array engine
//!
//! A contiguous, comparator-ordered container with explicit duplicate
//! handling. The dictionary keeps its vendor, attribute and value tables in
//! [`SortedArray`]s; anything else that needs a small ordered set with
//! predictable memory layout can use it as well.
//!
//! # Duplicate handling
//!
//! Binary search lands on *some* member of a run of comparator-equal
//! elements. Which member is an implementation detail, so callers that care
//! ask for one explicitly with [`Select`]. Insertion behaviour on a hit is
//! chosen per call with [`Policy`]:
//!
//! | Policy            | Key present                                   | Key absent |
//! |-------------------|-----------------------------------------------|------------|
//! | [`Policy::Insert`]  | fails with [`ArrayError::Duplicate`]          | inserted   |
//! | [`Policy::Replace`] | old element handed to the destructor, swapped | inserted   |
//! | [`Policy::Merge`]   | inserted at the hit, run order untouched      | inserted   |
//! | [`Policy::Append`]  | inserted after the run's last member          | inserted   |
//!
//! # Example
//!
//! ```rust
//! use radius_dict::sorted::{Policy, SortedArray};
//!
//! let mut numbers = SortedArray::new(|a: &u32, b: &u32| a.cmp(b));
//! for n in [5, 3, 8, 1] {
//!     numbers.insert(n, Policy::Insert).unwrap();
//! }
//! assert_eq!(numbers.as_slice(), &[1, 3, 5, 8]);
//! assert!(numbers.insert(3, Policy::Insert).is_err());
//! ```

mod array;
mod linear;
mod storage;

pub use array::{Comparator, Destructor, SortedArray};
pub use linear::LinearArray;

use thiserror::Error;

/// Sorted-array operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// An equal element is already stored and the policy rejects duplicates
    #[error("Duplicate element at index {0}")]
    Duplicate(usize),

    /// No element matches the key
    #[error("Element not found")]
    NotFound,

    /// The array could not grow (capacity limit reached or allocation failed)
    #[error("Out of memory: cannot grow array to {requested} elements")]
    OutOfMemory { requested: usize },
}

/// Result type for sorted-array operations
pub type ArrayResult<T> = Result<T, ArrayError>;

/// What `insert` does when an equal element already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Reject the new element
    #[default]
    Insert,
    /// Overwrite the existing element in place
    Replace,
    /// Insert next to the existing run, after its last member
    Append,
    /// Insert at the position binary search discovered
    Merge,
}

/// Which member of a duplicate run a search or removal resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Select {
    /// Whatever member binary search landed on
    #[default]
    Any,
    /// Leftmost member of the run
    First,
    /// Rightmost member of the run
    Last,
}

/// Outcome of a binary search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// A matching element lives at this index
    Found(usize),
    /// No match; the key would be inserted at this index
    Vacant(usize),
}

impl SearchResult {
    /// Index of the match, if any
    pub fn found(self) -> Option<usize> {
        match self {
            SearchResult::Found(index) => Some(index),
            SearchResult::Vacant(_) => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    /// Index the result points at: the match, or the insertion point
    pub fn index(self) -> usize {
        match self {
            SearchResult::Found(index) | SearchResult::Vacant(index) => index,
        }
    }
}
