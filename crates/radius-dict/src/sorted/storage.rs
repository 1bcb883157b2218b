use super::{ArrayError, ArrayResult};

/// Contiguous backing store shared by the sorted and linear arrays.
///
/// All growth goes through [`Storage::reserve_one`], so a failed reservation
/// never leaves a half-applied mutation behind.
#[derive(Debug, Clone)]
pub(crate) struct Storage<T> {
    pub(crate) items: Vec<T>,
    limit: Option<usize>,
}

impl<T> Storage<T> {
    pub(crate) fn new() -> Self {
        Storage {
            items: Vec::new(),
            limit: None,
        }
    }

    pub(crate) fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    pub(crate) fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Make room for one more element
    pub(crate) fn reserve_one(&mut self) -> ArrayResult<()> {
        let requested = self.items.len() + 1;

        if let Some(limit) = self.limit {
            if requested > limit {
                return Err(ArrayError::OutOfMemory { requested });
            }
        }

        self.items
            .try_reserve(1)
            .map_err(|_| ArrayError::OutOfMemory { requested })
    }

    /// Insert at `index`, shifting the tail one slot toward the end
    pub(crate) fn insert_at(&mut self, index: usize, element: T) -> ArrayResult<()> {
        self.reserve_one()?;
        self.items.insert(index, element);
        Ok(())
    }

    pub(crate) fn push(&mut self, element: T) -> ArrayResult<()> {
        self.reserve_one()?;
        self.items.push(element);
        Ok(())
    }
}
