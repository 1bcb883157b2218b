use super::storage::Storage;
use super::{ArrayError, ArrayResult, Policy, SearchResult, Select};
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Three-way comparator that defines the array's order
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Hook that receives every element the array displaces (replace, remove, clear)
pub type Destructor<T> = Box<dyn FnMut(T) + Send>;

/// Sorted, contiguous collection driven by a caller-supplied comparator.
///
/// The elements are kept in ascending comparator order between calls.
/// Equal elements may coexist when inserted with [`Policy::Append`] or
/// [`Policy::Merge`]; they always form one contiguous run.
pub struct SortedArray<T> {
    storage: Storage<T>,
    compare: Comparator<T>,
    destructor: Option<Destructor<T>>,
}

impl<T> SortedArray<T> {
    /// Create an empty array ordered by `compare`
    pub fn new(compare: Comparator<T>) -> Self {
        SortedArray {
            storage: Storage::new(),
            compare,
            destructor: None,
        }
    }

    /// Install a hook that receives displaced elements instead of dropping them
    pub fn with_destructor(mut self, destructor: impl FnMut(T) + Send + 'static) -> Self {
        self.destructor = Some(Box::new(destructor));
        self
    }

    /// Cap the number of elements; growth beyond it fails with `OutOfMemory`
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.storage.set_limit(Some(limit));
        self
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.storage.limit()
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

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.items.iter()
    }

    /// Element at a position previously returned by a search
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.storage.items.get(index)
    }

    /// Binary search for an element equal to `key`
    pub fn search(&self, key: &T) -> SearchResult {
        let compare = self.compare;
        self.search_by(|probe| compare(probe, key))
    }

    /// Binary search with a probe that orders an element relative to the key.
    ///
    /// The probe returns `Less` when the element sorts before the key,
    /// `Greater` when after, `Equal` on a match. A hit may be any member of
    /// a duplicate run.
    pub fn search_by<F>(&self, mut probe: F) -> SearchResult
    where
        F: FnMut(&T) -> Ordering,
    {
        let items = &self.storage.items;
        if items.is_empty() {
            return SearchResult::Vacant(0);
        }

        let mut low = 0;
        let mut high = items.len() - 1;
        while low < high {
            let mid = low + (high - low) / 2;
            match probe(&items[mid]) {
                Ordering::Less => low = mid + 1,
                Ordering::Equal | Ordering::Greater => high = mid,
            }
        }

        match probe(&items[low]) {
            Ordering::Equal => SearchResult::Found(low),
            Ordering::Greater => SearchResult::Vacant(low),
            Ordering::Less => SearchResult::Vacant(low + 1),
        }
    }

    /// Search, then move the hit to the requested member of its run
    pub fn search_select(&self, key: &T, select: Select) -> SearchResult {
        let compare = self.compare;
        self.search_by_select(|probe| compare(probe, key), select)
    }

    pub fn search_by_select<F>(&self, mut probe: F, select: Select) -> SearchResult
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.search_by(&mut probe) {
            SearchResult::Found(hit) => {
                let index = match select {
                    Select::Any => hit,
                    Select::First => self.run_start(hit, &mut probe),
                    Select::Last => self.run_end(hit, &mut probe),
                };
                SearchResult::Found(index)
            }
            vacant => vacant,
        }
    }

    pub fn get(&self, key: &T) -> Option<&T> {
        self.search(key).found().map(|i| &self.storage.items[i])
    }

    pub fn get_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.search_by(probe).found().map(|i| &self.storage.items[i])
    }

    pub fn get_select_by<F>(&self, probe: F, select: Select) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.search_by_select(probe, select)
            .found()
            .map(|i| &self.storage.items[i])
    }

    /// The whole duplicate run matching the probe (empty when absent)
    pub fn run_by<F>(&self, mut probe: F) -> &[T]
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.search_by(&mut probe) {
            SearchResult::Found(hit) => {
                let start = self.run_start(hit, &mut probe);
                let end = self.run_end(hit, &mut probe);
                &self.storage.items[start..=end]
            }
            SearchResult::Vacant(_) => &[],
        }
    }

    /// Insert `element` according to `policy`, returning where it landed
    pub fn insert(&mut self, element: T, policy: Policy) -> ArrayResult<usize> {
        let compare = self.compare;
        let found = self.search(&element);

        match (found, policy) {
            (SearchResult::Found(index), Policy::Insert) => Err(ArrayError::Duplicate(index)),
            (SearchResult::Found(index), Policy::Replace) => {
                let old = mem::replace(&mut self.storage.items[index], element);
                self.displace(old);
                Ok(index)
            }
            (SearchResult::Found(index), Policy::Merge) => {
                self.storage.insert_at(index, element)?;
                Ok(index)
            }
            (SearchResult::Found(hit), Policy::Append) => {
                let index = {
                    let key = &element;
                    self.run_end(hit, &mut |probe: &T| compare(probe, key)) + 1
                };
                self.storage.insert_at(index, element)?;
                Ok(index)
            }
            (SearchResult::Vacant(index), _) => {
                self.storage.insert_at(index, element)?;
                Ok(index)
            }
        }
    }

    /// Remove one element equal to `key`, handing it to the destructor
    pub fn remove(&mut self, key: &T, select: Select) -> ArrayResult<usize> {
        let found = self.search_select(key, select);
        self.remove_found(found)
    }

    pub fn remove_by<F>(&mut self, probe: F, select: Select) -> ArrayResult<usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        let found = self.search_by_select(probe, select);
        self.remove_found(found)
    }

    /// Drop every element through the destructor
    pub fn clear(&mut self) {
        let items = mem::take(&mut self.storage.items);
        for item in items {
            self.displace(item);
        }
    }

    fn remove_found(&mut self, found: SearchResult) -> ArrayResult<usize> {
        match found {
            SearchResult::Found(index) => {
                let removed = self.storage.items.remove(index);
                self.displace(removed);
                Ok(index)
            }
            SearchResult::Vacant(_) => Err(ArrayError::NotFound),
        }
    }

    fn displace(&mut self, element: T) {
        if let Some(destructor) = self.destructor.as_mut() {
            destructor(element);
        }
    }

    fn run_start<F>(&self, mut index: usize, probe: &mut F) -> usize
    where
        F: FnMut(&T) -> Ordering,
    {
        let items = &self.storage.items;
        while index > 0 && probe(&items[index - 1]) == Ordering::Equal {
            index -= 1;
        }
        index
    }

    fn run_end<F>(&self, mut index: usize, probe: &mut F) -> usize
    where
        F: FnMut(&T) -> Ordering,
    {
        let items = &self.storage.items;
        while index + 1 < items.len() && probe(&items[index + 1]) == Ordering::Equal {
            index += 1;
        }
        index
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedArray")
            .field("items", &self.storage.items)
            .field("limit", &self.storage.limit())
            .field("destructor", &self.destructor.is_some())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a SortedArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
