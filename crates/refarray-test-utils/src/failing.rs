use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use refarray::{Backend, System};

/// Backend that forwards to [`System`] until told to fail.
///
/// Faults are deterministic: [`fail_after(n)`](FailingBackend::fail_after)
/// lets exactly `n` more allocate/reallocate requests through, then
/// refuses every one until [`enable`](FailingBackend::enable).
/// Live blocks are counted so tests can assert that nothing leaked.
#[derive(Debug, Default)]
pub struct FailingBackend {
    /// `None` means unlimited.
    remaining: Cell<Option<usize>>,
    fail_next_reallocate: Cell<bool>,
    live_blocks: Cell<usize>,
    refused: Cell<usize>,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every request from now on.
    pub fn disable(&self) {
        self.remaining.set(Some(0));
    }

    /// Stop injecting faults.
    pub fn enable(&self) {
        self.remaining.set(None);
        self.fail_next_reallocate.set(false);
    }

    /// Let `n` more requests through, then refuse.
    pub fn fail_after(&self, n: usize) {
        self.remaining.set(Some(n));
    }

    /// Refuse only the next `reallocate`; allocations are unaffected.
    pub fn fail_next_reallocate(&self) {
        self.fail_next_reallocate.set(true);
    }

    /// Blocks handed out and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks.get()
    }

    /// Requests refused so far.
    pub fn refused(&self) -> usize {
        self.refused.get()
    }

    fn admit(&self) -> bool {
        match self.remaining.get() {
            None => true,
            Some(0) => {
                self.refused.set(self.refused.get() + 1);
                false
            }
            Some(n) => {
                self.remaining.set(Some(n - 1));
                true
            }
        }
    }
}

impl Backend for FailingBackend {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.admit() {
            return None;
        }
        let ptr = System.allocate(layout)?;
        self.live_blocks.set(self.live_blocks.get() + 1);
        Some(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if self.fail_next_reallocate.replace(false) {
            self.refused.set(self.refused.get() + 1);
            return None;
        }
        if !self.admit() {
            return None;
        }
        // SAFETY: every block this backend hands out comes from `System`;
        // the caller's guarantees are passed through unchanged.
        unsafe { System.reallocate(ptr, old_layout, new_size) }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live_blocks.set(self.live_blocks.get() - 1);
        // SAFETY: as in `reallocate`.
        unsafe { System.deallocate(ptr, layout) }
    }
}
