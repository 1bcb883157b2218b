use super::storage::Storage;
use super::ArrayResult;

/// Unsorted stack/queue over the same contiguous storage as [`SortedArray`].
///
/// `push`/`pop`/`peek` work at the tail (LIFO), `enqueue` appends at the tail
/// and `dequeue` takes from the head (FIFO). No comparator is involved.
///
/// [`SortedArray`]: super::SortedArray
#[derive(Debug, Clone)]
pub struct LinearArray<T> {
    storage: Storage<T>,
}

impl<T> Default for LinearArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinearArray<T> {
    pub fn new() -> Self {
        LinearArray {
            storage: Storage::new(),
        }
    }

    /// Cap the number of elements; growth beyond it fails with `OutOfMemory`
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.storage.set_limit(Some(limit));
        self
    }

    pub fn len(&self) -> usize {
        self.storage.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.storage.items
    }

    pub fn push(&mut self, element: T) -> ArrayResult<()> {
        self.storage.push(element)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.storage.items.pop()
    }

    /// Element `pop` would return next
    pub fn peek(&self) -> Option<&T> {
        self.storage.items.last()
    }

    pub fn enqueue(&mut self, element: T) -> ArrayResult<()> {
        self.storage.push(element)
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.storage.items.is_empty() {
            None
        } else {
            Some(self.storage.items.remove(0))
        }
    }
}
