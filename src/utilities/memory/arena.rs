use bumpalo::Bump;

/// Bump allocator used for both scratch and persistent storage.
///
/// Allocations are made through a shared reference and are never moved until [`Arena::reset`],
/// which requires exclusive access. Anything borrowed from the arena therefore cannot outlive
/// the memory backing it.
///
/// Nothing allocated here is ever dropped; only `Copy` data should be placed in an arena.
pub struct Arena {
    bump: Bump,
}

impl Arena {
    /// Creates an arena that allocates its first chunk lazily.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena with at least `byte_capacity` bytes available before it has to grow.
    pub fn with_capacity(byte_capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(byte_capacity),
        }
    }

    /// Allocates `count` elements, each initialized to `value`.
    #[inline]
    pub fn alloc_slice_fill_copy<T: Copy>(&self, count: usize, value: T) -> &mut [T] {
        self.bump.alloc_slice_fill_copy(count, value)
    }

    /// Allocates `count` default-initialized elements.
    #[inline]
    pub fn alloc_slice_fill_default<T: Copy + Default>(&self, count: usize) -> &mut [T] {
        self.bump.alloc_slice_fill_default(count)
    }

    /// Allocates `count` elements produced by `f(index)`.
    #[inline]
    pub fn alloc_slice_fill_with<T: Copy, F: FnMut(usize) -> T>(
        &self,
        count: usize,
        f: F,
    ) -> &mut [T] {
        self.bump.alloc_slice_fill_with(count, f)
    }

    /// Gets the number of bytes currently reserved by the arena's chunks.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Discards every allocation. The first chunk is kept for reuse.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}
