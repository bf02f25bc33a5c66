use std::collections::VecDeque;

/// Remembers the last `capacity` items pushed, oldest evicted first.
///
/// Lookups compare by value with a linear scan. The cache only has to catch
/// duplicates that show up close together in a search, so a small capacity
/// goes a long way, and no `Hash` implementation is required of `T`.
#[derive(Debug, Clone)]
pub struct DuplicateCache<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T: PartialEq> DuplicateCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::new(),
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|other| other == item)
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
