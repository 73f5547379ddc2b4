//! Conversions between logical offsets and physical slots of a ring of
//! `capacity` slots. Every function is total: a zero capacity maps everything
//! to slot 0, and offsets larger than the ring are reduced first.

/// Folds an index that is known to be below `2 * capacity` back into the ring.
#[inline]
pub(crate) const fn wrap_index(index: usize, capacity: usize) -> usize {
  debug_assert!((index == 0 && capacity == 0) || index < capacity || (index - capacity) < capacity);
  if index >= capacity {
    index - capacity
  } else {
    index
  }
}

/// `(index + k) mod capacity`.
#[inline]
pub(crate) const fn advance(index: usize, k: usize, capacity: usize) -> usize {
  if capacity == 0 {
    return 0;
  }
  // `index < capacity` and `k % capacity < capacity`, so the sum stays below
  // `2 * capacity` and `capacity - x` never underflows.
  let k = k % capacity;
  if index >= capacity - k {
    index - (capacity - k)
  } else {
    index + k
  }
}

/// `(index - k + capacity) mod capacity`.
#[inline]
pub(crate) const fn retreat(index: usize, k: usize, capacity: usize) -> usize {
  if capacity == 0 {
    return 0;
  }
  let k = k % capacity;
  if index >= k {
    index - k
  } else {
    index + (capacity - k)
  }
}

/// The physical slot of the element at `logical` when the ring starts at `head`.
#[inline]
pub(crate) const fn physical_slot(head: usize, logical: usize, capacity: usize) -> usize {
  advance(head, logical, capacity)
}

/// The offset of `physical` from `head`, i.e. the inverse of [`physical_slot`].
#[inline]
pub(crate) const fn logical_position(physical: usize, head: usize, capacity: usize) -> usize {
  retreat(physical, head, capacity)
}
