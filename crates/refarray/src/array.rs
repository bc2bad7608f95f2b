//! The growable array of caller-owned references.
//!
//! A [`DynArray`] keeps an ordered run of `T` values in a buffer obtained
//! from a [`Backend`]. `T` is meant to be a reference or handle (`&E`,
//! `Option<&E>`, `NonNull<E>`, an id); the array copies it around but never
//! looks through it, so the referenced elements stay entirely the caller's.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::backend::{Backend, System};
use crate::config::ArrayConfig;
use crate::error::ArrayError;
use crate::raw::RawBuf;

/// Ordered, growable sequence of `T` references.
///
/// Slots `[0, len)` are live and always `Some`. Slots `[len, capacity)` are
/// `None`, including any slot vacated by a removal. Capacity never shrinks.
///
/// Every fallible operation is all-or-nothing: on `Err` (or a `None` from
/// a removal) the length, capacity and contents are exactly as before.
///
/// Not `Send` or `Sync`; an array is used from one thread at a time.
pub struct DynArray<T: Copy, A: Backend = System> {
    buf: RawBuf<T, A>,
    len: usize,
    config: ArrayConfig,
}

impl<T: Copy> DynArray<T> {
    /// Create an empty array on the global allocator with the default
    /// config (16 slots, doubling).
    pub fn create() -> Result<Self, ArrayError> {
        Self::create_in(System, ArrayConfig::default())
    }

    /// Create an empty array on the global allocator.
    pub fn with_config(config: ArrayConfig) -> Result<Self, ArrayError> {
        Self::create_in(System, config)
    }
}

impl<T: Copy, A: Backend> DynArray<T, A> {
    /// Create an empty array whose buffer comes from `backend`.
    ///
    /// Fails with `InvalidConfig` before touching the backend, or with
    /// `AllocationFailure` if the initial buffer cannot be obtained.
    pub fn create_in(backend: A, config: ArrayConfig) -> Result<Self, ArrayError> {
        config.validate()?;
        let buf = RawBuf::with_capacity_in(config.initial_capacity, backend).inspect_err(|err| {
            debug!(capacity = config.initial_capacity, %err, "initial buffer allocation failed");
        })?;
        Ok(Self {
            buf,
            len: 0,
            config,
        })
    }

    /// Release the buffer. The referenced elements are left alone.
    ///
    /// Equivalent to dropping the array.
    pub fn release(self) {
        drop(self);
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The config this array was created with.
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// The backend supplying this array's buffer.
    pub fn backend(&self) -> &A {
        self.buf.backend()
    }

    /// Bytes currently held from the backend.
    pub fn memory_bytes(&self) -> usize {
        self.buf.memory_bytes()
    }

    /// Insert `element` at `index`, shifting `[index, len)` up by one.
    ///
    /// `index == len` appends. Grows the buffer first if it is full.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), ArrayError> {
        if index > self.len {
            return Err(ArrayError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        if self.len == self.buf.capacity() {
            self.grow()?;
        }
        let len = self.len;
        let slots = self.buf.slots_mut();
        slots.copy_within(index..len, index + 1);
        slots[index] = Some(element);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting `(index, len)`
    /// down by one.
    ///
    /// Returns `None` without touching anything if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        let len = self.len;
        let slots = self.buf.slots_mut();
        let removed = slots[index];
        slots.copy_within(index + 1..len, index);
        slots[len - 1] = None;
        self.len -= 1;
        removed
    }

    /// Append `element`.
    pub fn push(&mut self, element: T) -> Result<(), ArrayError> {
        self.insert(self.len, element)
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.len.checked_sub(1)?;
        self.remove(last)
    }

    /// The element at `index`, or `None` if `index >= len`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.live().get(index).copied().flatten()
    }

    /// Replace the element at `index`. Never shifts or grows.
    pub fn set(&mut self, index: usize, element: T) -> Result<(), ArrayError> {
        let len = self.len;
        match self.live_mut().get_mut(index) {
            Some(slot) => {
                *slot = Some(element);
                Ok(())
            }
            None => Err(ArrayError::IndexOutOfBounds { index, len }),
        }
    }

    /// The last element, or `None` if empty.
    pub fn last(&self) -> Option<T> {
        self.get(self.len.checked_sub(1)?)
    }

    /// Reorder the elements by `compare`.
    ///
    /// `compare` must be a total order. The sort is not stable: elements
    /// comparing `Equal` may end up in any relative order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.live_mut().sort_unstable_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => compare(a, b),
            _ => unreachable!("live slots are always Some"),
        });
    }

    fn live(&self) -> &[Option<T>] {
        &self.buf.slots()[..self.len]
    }

    fn live_mut(&mut self) -> &mut [Option<T>] {
        let len = self.len;
        &mut self.buf.slots_mut()[..len]
    }

    /// Multiply capacity by the growth factor. Leaves the buffer untouched
    /// on failure.
    fn grow(&mut self) -> Result<(), ArrayError> {
        let old_capacity = self.buf.capacity();
        let grown = match self.config.grown_capacity(old_capacity) {
            Some(new_capacity) => self.buf.grow_to(new_capacity).map(|()| new_capacity),
            None => Err(ArrayError::AllocationFailure {
                requested: usize::MAX,
            }),
        };
        match grown {
            Ok(new_capacity) => {
                trace!(old_capacity, new_capacity, "grew array buffer");
                Ok(())
            }
            Err(err) => {
                debug!(
                    old_capacity,
                    growth_factor = self.config.growth_factor,
                    %err,
                    "array growth failed"
                );
                Err(err)
            }
        }
    }
}

impl<T: Copy + fmt::Debug, A: Backend> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.live().iter().flatten()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[u32]) -> DynArray<u32> {
        let mut array = DynArray::create().unwrap();
        for &v in values {
            array.push(v).unwrap();
        }
        array
    }

    fn contents<A: Backend>(array: &DynArray<u32, A>) -> Vec<u32> {
        (0..array.len()).filter_map(|i| array.get(i)).collect()
    }

    #[test]
    fn create_is_empty_with_capacity() {
        let array = DynArray::<u32>::create().unwrap();
        assert_eq!(array.len(), 0);
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 16);
    }

    #[test]
    fn create_rejects_invalid_config() {
        let result = DynArray::<u32>::with_config(ArrayConfig::new(0));
        assert!(matches!(result, Err(ArrayError::InvalidConfig { .. })));
    }

    #[test]
    fn insert_at_beginning_reverses() {
        let mut array = DynArray::create().unwrap();
        array.insert(0, 1u32).unwrap();
        array.insert(0, 2).unwrap();
        array.insert(0, 3).unwrap();
        assert_eq!(contents(&array), vec![3, 2, 1]);
    }

    #[test]
    fn insert_at_middle_shifts_tail() {
        let mut array = DynArray::create().unwrap();
        array.insert(0, 1u32).unwrap();
        array.insert(1, 2).unwrap();
        array.insert(1, 3).unwrap();
        assert_eq!(contents(&array), vec![1, 3, 2]);
    }

    #[test]
    fn insert_at_len_appends() {
        let mut array = filled(&[1, 2]);
        array.insert(2, 3).unwrap();
        assert_eq!(contents(&array), vec![1, 2, 3]);
    }

    #[test]
    fn insert_past_len_fails_without_mutation() {
        let mut array = filled(&[1]);
        assert_eq!(
            array.insert(2, 9),
            Err(ArrayError::IndexOutOfBounds { index: 2, len: 1 })
        );
        assert_eq!(contents(&array), vec![1]);
    }

    #[test]
    fn insert_into_empty_at_one_fails() {
        let mut array = DynArray::<u32>::create().unwrap();
        assert!(array.insert(1, 5).is_err());
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn stored_null_is_distinct_from_absent() {
        let mut array = DynArray::<Option<&u32>>::create().unwrap();
        array.insert(0, None).unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(0), Some(None));
        assert_eq!(array.get(1), None);
    }

    #[test]
    fn remove_from_beginning_middle_end() {
        let mut array = filled(&[1, 2, 3, 4, 5]);
        assert_eq!(array.remove(0), Some(1));
        assert_eq!(contents(&array), vec![2, 3, 4, 5]);
        assert_eq!(array.remove(1), Some(3));
        assert_eq!(contents(&array), vec![2, 4, 5]);
        assert_eq!(array.remove(2), Some(5));
        assert_eq!(contents(&array), vec![2, 4]);
    }

    #[test]
    fn remove_clears_vacated_slot() {
        let mut array = filled(&[1, 2, 3]);
        array.remove(0);
        assert_eq!(array.buf.slots()[2], None);
        assert_eq!(array.buf.slots()[..2], [Some(2), Some(3)]);
    }

    #[test]
    fn remove_out_of_bounds_is_none() {
        let mut array = filled(&[1, 2]);
        assert_eq!(array.remove(2), None);
        assert_eq!(array.remove(usize::MAX), None);
        assert_eq!(contents(&array), vec![1, 2]);

        let mut empty = DynArray::<u32>::create().unwrap();
        assert_eq!(empty.remove(0), None);
    }

    #[test]
    fn pop_returns_last_pushed() {
        let mut array = filled(&[7, 8]);
        assert_eq!(array.pop(), Some(8));
        assert_eq!(array.pop(), Some(7));
        assert_eq!(array.pop(), None);
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let array = filled(&[1, 2, 3]);
        assert_eq!(array.get(2), Some(3));
        assert_eq!(array.get(3), None);
        assert_eq!(DynArray::<u32>::create().unwrap().get(0), None);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut array = filled(&[1, 2, 3]);
        array.set(1, 20).unwrap();
        assert_eq!(contents(&array), vec![1, 20, 3]);
        assert_eq!(array.capacity(), 16);
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let mut array = filled(&[1]);
        assert_eq!(
            array.set(1, 5),
            Err(ArrayError::IndexOutOfBounds { index: 1, len: 1 })
        );
        let mut empty = DynArray::<u32>::create().unwrap();
        assert!(empty.set(0, 5).is_err());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn last_tracks_tail() {
        let mut array = DynArray::<u32>::create().unwrap();
        assert_eq!(array.last(), None);
        array.push(1).unwrap();
        array.push(2).unwrap();
        assert_eq!(array.last(), Some(2));
    }

    #[test]
    fn capacity_doubles_past_initial() {
        let mut array = DynArray::<u32>::create().unwrap();
        for i in 0..16 {
            array.push(i).unwrap();
        }
        assert_eq!(array.capacity(), 16);
        array.push(16).unwrap();
        assert_eq!(array.capacity(), 32);
        assert_eq!(contents(&array), (0..17).collect::<Vec<_>>());
    }

    #[test]
    fn custom_growth_factor_applies() {
        let config = ArrayConfig {
            initial_capacity: 2,
            growth_factor: 3,
        };
        let mut array = DynArray::<u32>::with_config(config).unwrap();
        for i in 0..3 {
            array.push(i).unwrap();
        }
        assert_eq!(array.capacity(), 6);
    }

    #[test]
    fn sort_by_referenced_values() {
        let values = [8, 3, 25, 87, 2, 17, 5, 9, 16];
        let mut array = DynArray::<&i32>::create().unwrap();
        for v in &values {
            array.push(v).unwrap();
        }
        array.sort_by(|a, b| a.cmp(b));
        let sorted: Vec<i32> = (0..array.len()).map(|i| *array.get(i).unwrap()).collect();
        assert_eq!(sorted, vec![2, 3, 5, 8, 9, 16, 17, 25, 87]);
    }

    #[test]
    fn sort_keeps_references_not_copies() {
        let values = [3, 1, 2];
        let mut array = DynArray::<&i32>::create().unwrap();
        for v in &values {
            array.push(v).unwrap();
        }
        array.sort_by(|a, b| a.cmp(b));
        assert!(std::ptr::eq(array.get(0).unwrap(), &values[1]));
    }

    #[test]
    fn sort_empty_is_noop() {
        let mut array = DynArray::<u32>::create().unwrap();
        array.sort_by(|a, b| a.cmp(b));
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 16);
    }

    #[test]
    fn debug_lists_live_elements() {
        let array = filled(&[1, 2]);
        assert_eq!(format!("{array:?}"), "[1, 2]");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Insert(usize, u32),
            Remove(usize),
            Push(u32),
            Pop,
            Set(usize, u32),
            Sort,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..40, any::<u32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                (0usize..40).prop_map(Op::Remove),
                any::<u32>().prop_map(Op::Push),
                Just(Op::Pop),
                (0usize..40, any::<u32>()).prop_map(|(i, v)| Op::Set(i, v)),
                Just(Op::Sort),
            ]
        }

        proptest! {
            #[test]
            fn push_then_get_in_order(values in proptest::collection::vec(any::<u32>(), 0..100)) {
                let array = filled(&values);
                prop_assert_eq!(array.len(), values.len());
                for (i, &v) in values.iter().enumerate() {
                    prop_assert_eq!(array.get(i), Some(v));
                }
            }

            #[test]
            fn push_pop_round_trip(
                values in proptest::collection::vec(any::<u32>(), 0..40),
                extra in any::<u32>(),
            ) {
                let mut array = filled(&values);
                array.push(extra).unwrap();
                prop_assert_eq!(array.pop(), Some(extra));
                prop_assert_eq!(array.len(), values.len());
            }

            #[test]
            fn remove_shifts_tail_down(
                values in proptest::collection::vec(any::<u32>(), 1..40),
                pick in any::<proptest::sample::Index>(),
            ) {
                let mut array = filled(&values);
                let index = pick.index(values.len());
                prop_assert_eq!(array.remove(index), Some(values[index]));
                prop_assert_eq!(array.len(), values.len() - 1);
                for j in index..array.len() {
                    prop_assert_eq!(array.get(j), Some(values[j + 1]));
                }
            }

            #[test]
            fn matches_vec_model(ops in proptest::collection::vec(op(), 0..200)) {
                let mut array = DynArray::<u32>::with_config(ArrayConfig::new(1)).unwrap();
                let mut model: Vec<u32> = Vec::new();
                let mut capacity = array.capacity();
                for op in ops {
                    match op {
                        Op::Insert(i, v) => {
                            let ok = array.insert(i, v).is_ok();
                            prop_assert_eq!(ok, i <= model.len());
                            if ok {
                                model.insert(i, v);
                            }
                        }
                        Op::Remove(i) => {
                            let expected = (i < model.len()).then(|| model.remove(i));
                            prop_assert_eq!(array.remove(i), expected);
                        }
                        Op::Push(v) => {
                            array.push(v).unwrap();
                            model.push(v);
                        }
                        Op::Pop => {
                            prop_assert_eq!(array.pop(), model.pop());
                        }
                        Op::Set(i, v) => {
                            let ok = array.set(i, v).is_ok();
                            prop_assert_eq!(ok, i < model.len());
                            if ok {
                                model[i] = v;
                            }
                        }
                        Op::Sort => {
                            array.sort_by(|a, b| a.cmp(b));
                            model.sort_unstable();
                        }
                    }
                    prop_assert!(array.capacity() >= capacity);
                    capacity = array.capacity();
                    prop_assert!(array.len() <= array.capacity());
                    prop_assert_eq!(contents(&array), model.clone());
                    prop_assert!(array.buf.slots()[array.len()..].iter().all(Option::is_none));
                }
            }
        }
    }
}
