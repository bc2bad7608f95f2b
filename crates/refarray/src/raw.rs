//! Slot buffer obtained from a [`Backend`].
//!
//! This is the only module that touches raw memory. Every slot in
//! `[0, capacity)` is initialised at all times (unused slots hold `None`),
//! so the rest of the crate works on plain slices. Each `unsafe` block
//! carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::mem;
use std::ptr::NonNull;
use std::slice;

use crate::backend::Backend;
use crate::error::ArrayError;

/// Owned, contiguous buffer of `capacity` slots.
pub(crate) struct RawBuf<T: Copy, A: Backend> {
    ptr: NonNull<Option<T>>,
    capacity: usize,
    backend: A,
}

impl<T: Copy, A: Backend> RawBuf<T, A> {
    /// Allocate `capacity` slots from `backend`, all set to `None`.
    pub(crate) fn with_capacity_in(capacity: usize, backend: A) -> Result<Self, ArrayError> {
        let layout = slot_layout::<T>(capacity)?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            backend
                .allocate(layout)
                .ok_or(ArrayError::AllocationFailure {
                    requested: layout.size(),
                })?
                .cast()
        };
        let mut buf = Self {
            ptr,
            capacity: 0,
            backend,
        };
        buf.clear_tail(capacity);
        Ok(buf)
    }

    /// Resize to `new_capacity` slots, keeping every existing slot at its
    /// index and setting the new ones to `None`.
    ///
    /// On error nothing has changed: same pointer, same capacity, same
    /// contents.
    pub(crate) fn grow_to(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        debug_assert!(new_capacity >= self.capacity);
        let old_layout = slot_layout::<T>(self.capacity)?;
        let new_layout = slot_layout::<T>(new_capacity)?;
        if new_layout.size() != 0 {
            let new_ptr = if old_layout.size() == 0 {
                self.backend.allocate(new_layout)
            } else {
                // SAFETY: `self.ptr` was handed out by `self.backend` for
                // `old_layout` and is still live. `new_layout` was built by
                // `Layout::array`, so its size is non-zero here and fits
                // `isize::MAX` at this alignment.
                unsafe {
                    self.backend
                        .reallocate(self.ptr.cast(), old_layout, new_layout.size())
                }
            };
            self.ptr = new_ptr
                .ok_or(ArrayError::AllocationFailure {
                    requested: new_layout.size(),
                })?
                .cast();
        }
        self.clear_tail(new_capacity);
        Ok(())
    }

    /// Write `None` into `[self.capacity, capacity)` and adopt `capacity`.
    fn clear_tail(&mut self, capacity: usize) {
        for index in self.capacity..capacity {
            // SAFETY: the block holds `capacity` slots, so `index` is in
            // bounds. `Option<T>` is `Copy`, so overwriting without reading
            // the old bytes drops nothing.
            unsafe { self.ptr.as_ptr().add(index).write(None) };
        }
        self.capacity = capacity;
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// All `capacity` slots.
    pub(crate) fn slots(&self) -> &[Option<T>] {
        // SAFETY: `ptr` is valid for `capacity` initialised slots and is
        // exclusively owned by `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.capacity) }
    }

    /// All `capacity` slots, mutably.
    pub(crate) fn slots_mut(&mut self) -> &mut [Option<T>] {
        // SAFETY: as in `slots`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity) }
    }

    pub(crate) fn backend(&self) -> &A {
        &self.backend
    }

    /// Bytes currently held from the backend.
    pub(crate) fn memory_bytes(&self) -> usize {
        self.capacity * mem::size_of::<Option<T>>()
    }
}

impl<T: Copy, A: Backend> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        // The layout was valid when the buffer reached this capacity.
        if let Ok(layout) = slot_layout::<T>(self.capacity) {
            if layout.size() != 0 {
                // SAFETY: `self.ptr` was handed out by `self.backend` for
                // exactly this layout and is released only here.
                unsafe { self.backend.deallocate(self.ptr.cast(), layout) };
            }
        }
    }
}

/// Layout of `capacity` slots, or `AllocationFailure` if it cannot exist.
fn slot_layout<T>(capacity: usize) -> Result<Layout, ArrayError> {
    Layout::array::<Option<T>>(capacity).map_err(|_| ArrayError::AllocationFailure {
        requested: capacity.saturating_mul(mem::size_of::<Option<T>>()),
    })
}
