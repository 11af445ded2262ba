use crate::utilities::memory::Arena;

use std::ops::{Deref, DerefMut, Index, IndexMut};

/// Container supporting list-like behaviors built on top of arena memory.
///
/// Growing the list takes a fresh span from the arena and copies the live elements over. The old
/// span is simply abandoned; it is reclaimed when the arena is reset. Elements are always
/// addressed by index, never by a retained reference, so growth cannot invalidate anything.
pub struct QuickList<'a, T> {
    /// Backing memory containing the elements of the list.
    /// Indices from 0 to count-1 hold actual data. The rest holds default values.
    span: &'a mut [T],
    /// Number of elements in the list.
    count: usize,
}

impl<'a, T: Copy + Default> QuickList<'a, T> {
    const MINIMUM_CAPACITY: usize = 2;

    /// Creates an empty list with no backing memory.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            span: Default::default(),
            count: 0,
        }
    }

    /// Creates a new list with at least the given capacity.
    #[inline(always)]
    pub fn with_capacity(minimum_initial_count: usize, arena: &'a Arena) -> Self {
        Self {
            span: arena.alloc_slice_fill_default(minimum_initial_count),
            count: 0,
        }
    }

    /// Gets the capacity of the backing span.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.span.len()
    }

    /// Gets the number of elements in the list.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the list is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Swaps the backing span for a larger one, keeping the live elements.
    fn resize(&mut self, new_capacity: usize, arena: &'a Arena) {
        debug_assert!(new_capacity >= self.count);
        let new_span = arena.alloc_slice_fill_default::<T>(new_capacity);
        new_span[..self.count].copy_from_slice(&self.span[..self.count]);
        self.span = new_span;
    }

    /// Ensures that the list has enough room to hold the specified number of elements.
    #[inline(always)]
    pub fn ensure_capacity(&mut self, count: usize, arena: &'a Arena) {
        if count > self.span.len() {
            let mut new_capacity = (self.span.len() * 2).max(Self::MINIMUM_CAPACITY);
            while new_capacity < count {
                new_capacity *= 2;
            }
            self.resize(new_capacity, arena);
        }
    }

    /// Appends a default element and returns a reference to it, growing if necessary.
    #[inline(always)]
    pub fn push(&mut self, arena: &'a Arena) -> &mut T {
        self.ensure_capacity(self.count + 1, arena);
        let index = self.count;
        self.count += 1;
        self.span[index] = T::default();
        &mut self.span[index]
    }

    /// Adds an element to the list, resizing if necessary.
    #[inline(always)]
    pub fn add(&mut self, element: T, arena: &'a Arena) {
        *self.push(arena) = element;
    }

    /// Adds an element to the list without checking capacity.
    #[inline(always)]
    pub fn add_unsafely(&mut self, element: T) {
        debug_assert!(
            self.count < self.span.len(),
            "Adding would exceed capacity"
        );
        self.span[self.count] = element;
        self.count += 1;
    }

    /// Removes and returns the last element.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            None
        } else {
            self.count -= 1;
            Some(self.span[self.count])
        }
    }

    /// Gets the live elements.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.span[..self.count]
    }

    /// Gets the live elements mutably.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.span[..self.count]
    }

    /// Consumes the list, returning the live elements with the arena's lifetime.
    #[inline(always)]
    pub fn into_slice(self) -> &'a mut [T] {
        let QuickList { span, count } = self;
        span.split_at_mut(count).0
    }
}

impl<'a, T: Copy + Default> Default for QuickList<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Copy + Default> Deref for QuickList<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T: Copy + Default> DerefMut for QuickList<'a, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T: Copy + Default> Index<usize> for QuickList<'a, T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.count, "Index out of bounds");
        &self.span[index]
    }
}

impl<'a, T: Copy + Default> IndexMut<usize> for QuickList<'a, T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        debug_assert!(index < self.count, "Index out of bounds");
        &mut self.span[index]
    }
}

impl<'a, T: Copy + Default + std::fmt::Debug> std::fmt::Debug for QuickList<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_grows_by_doubling() {
        let arena = Arena::new();
        let mut list = QuickList::<u32>::new();
        assert_eq!(list.capacity(), 0);
        *list.push(&arena) = 10;
        assert_eq!(list.capacity(), 2);
        list.add(11, &arena);
        list.add(12, &arena);
        assert_eq!(list.capacity(), 4);
        assert_eq!(list.as_slice(), &[10, 11, 12]);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let arena = Arena::new();
        let mut list = QuickList::with_capacity(1, &arena);
        for i in 0..1000u32 {
            list.add(i, &arena);
        }
        assert_eq!(list.len(), 1000);
        assert!(list.iter().copied().eq(0..1000));
    }

    #[test]
    fn test_add_unsafely_and_pop() {
        let arena = Arena::new();
        let mut list = QuickList::with_capacity(3, &arena);
        list.add_unsafely(1i32);
        list.add_unsafely(2);
        assert_eq!(list.pop(), Some(2));
        assert_eq!(list.pop(), Some(1));
        assert_eq!(list.pop(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_into_slice_outlives_list() {
        let arena = Arena::new();
        let slice = {
            let mut list = QuickList::new();
            list.add(5u16, &arena);
            list.add(6, &arena);
            list.into_slice()
        };
        assert_eq!(slice, &[5, 6]);
    }

    #[test]
    fn test_ensure_capacity_jumps_to_requested_size() {
        let arena = Arena::new();
        let mut list = QuickList::<u8>::new();
        list.ensure_capacity(9, &arena);
        assert!(list.capacity() >= 9);
        assert_eq!(list.len(), 0);
    }
}
