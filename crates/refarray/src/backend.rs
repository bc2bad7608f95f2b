//! Allocation backends.
//!
//! A [`Backend`] is the only thing a [`DynArray`](crate::DynArray) asks of
//! its environment: allocate a block, resize a block, release a block.
//! [`System`] forwards to the global allocator; tests substitute backends
//! that fail on command.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

/// Source of memory blocks for an array's slot buffer.
///
/// Failure is reported by returning `None`. Implementations must not panic
/// or abort on exhaustion; the array turns `None` into
/// [`ArrayError::AllocationFailure`](crate::ArrayError::AllocationFailure)
/// and leaves its state untouched.
///
/// Callers never request zero-sized blocks.
pub trait Backend {
    /// Allocate a block fitting `layout`.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Resize the block at `ptr` to `new_size` bytes, keeping its contents
    /// up to the smaller of the two sizes.
    ///
    /// On `None` the original block must still be valid and unchanged.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this backend for `old_layout` and
    /// not yet released. `new_size` must be non-zero and, rounded up to
    /// `old_layout.align()`, must not exceed `isize::MAX`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Release the block at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this backend for `layout` and not
    /// yet released.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<B: Backend + ?Sized> Backend for &B {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: the caller's guarantees are passed through unchanged.
        unsafe { (**self).reallocate(ptr, old_layout, new_size) }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller's guarantees are passed through unchanged.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The global allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Backend for System {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: `ptr` came from `std::alloc::alloc` with `old_layout`
        // (allocate above), and the size bounds are the caller's contract.
        NonNull::new(unsafe { std::alloc::realloc(ptr.as_ptr(), old_layout, new_size) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: `ptr` came from this backend with `layout`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
