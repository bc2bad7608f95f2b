use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use refarray::{Backend, System};

/// Backend that forwards to [`System`] and records what it was asked for.
#[derive(Debug, Default)]
pub struct CountingBackend {
    allocations: Cell<usize>,
    reallocations: Cell<usize>,
    deallocations: Cell<usize>,
    outstanding_bytes: Cell<usize>,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations.get()
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.get()
    }

    /// Bytes handed out and not yet released.
    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding_bytes.get()
    }
}

impl Backend for CountingBackend {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.allocations.set(self.allocations.get() + 1);
        let ptr = System.allocate(layout)?;
        self.outstanding_bytes
            .set(self.outstanding_bytes.get() + layout.size());
        Some(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        self.reallocations.set(self.reallocations.get() + 1);
        // SAFETY: every block this backend hands out comes from `System`;
        // the caller's guarantees are passed through unchanged.
        let ptr = unsafe { System.reallocate(ptr, old_layout, new_size) }?;
        self.outstanding_bytes
            .set(self.outstanding_bytes.get() - old_layout.size() + new_size);
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.set(self.deallocations.get() + 1);
        self.outstanding_bytes
            .set(self.outstanding_bytes.get() - layout.size());
        // SAFETY: as in `reallocate`.
        unsafe { System.deallocate(ptr, layout) }
    }
}
