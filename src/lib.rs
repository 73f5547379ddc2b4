#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs, warnings)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

use alloc::vec::Vec;
use core::{
  fmt,
  hash::{Hash, Hasher},
  hint::assert_unchecked,
  mem,
  ops::{Index, IndexMut, Range},
  slice,
  sync::atomic::{AtomicUsize, Ordering},
};
use macros::*;
use raw::RawStorage;

pub use cursor::{Cursor, CursorMut};
pub use error::TryReserveError;
pub use into_iter::IntoIter;
pub use iter::Iter;
pub use iter_mut::IterMut;
pub use position::Position;

mod cursor;
mod error;
mod into_iter;
mod iter;
mod iter_mut;
mod position;
mod raw;
mod ring;


mod macros;

/// Number of slots allocated by the first growth of an empty buffer.
pub const MIN_CAPACITY: usize = 4;

/// A growable double-ended queue stored in a single ring of slots.
///
/// Elements can be pushed and popped at both ends in amortized *O*(1), read
/// by logical index in *O*(1), and inserted or erased at logical index `k` in
/// *O*(min(k, n - k)): the shorter side of the split is shifted.
///
/// # Layout
///
/// The buffer owns one block of [`capacity`](Self::capacity) slots. The live
/// elements occupy the slots starting at the begin slot and walking forward,
/// wrapping at the end of the block. The buffer always keeps at least one slot
/// free (`len < capacity` whenever storage is allocated), so an empty ring and
/// a full ring never look alike.
///
/// Growth doubles the slot count. A reallocation moves every element to the
/// new block in logical order, so afterwards the begin slot is 0.
///
/// # Positions
///
/// [`begin`](Self::begin) and [`end`](Self::end) hand out [`Position`]s, plain
/// random-access values that can be stepped, offset, ordered and subtracted,
/// and passed back to [`insert`](Self::insert) and [`erase`](Self::erase). A
/// position is valid until the next reallocation, [`clear`](Self::clear), or
/// removal of the element it points at.
///
/// ## Examples
///
/// ```rust
/// use circular_deque::CircularBuffer;
///
/// let mut buf = CircularBuffer::new();
/// buf.push_back(1);
/// buf.push_back(2);
/// buf.push_back(3);
/// buf.push_front(0);
/// assert_eq!(buf, [0, 1, 2, 3]);
///
/// let third = buf.begin() + 2;
/// let next = buf.erase(third);
/// assert_eq!(buf, [0, 1, 3]);
/// assert_eq!(buf[next], 3);
///
/// assert_eq!(buf.pop_front(), Some(0));
/// assert_eq!(buf.pop_back(), Some(3));
/// assert_eq!(buf.len(), 1);
/// ```
pub struct CircularBuffer<T> {
  buf: RawStorage<T>,
  head: usize,
  len: usize,
  epoch: usize,
}

// SAFETY: the buffer owns its elements outright, like `Vec<T>`.
unsafe impl<T: Send> Send for CircularBuffer<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for CircularBuffer<T> {}

impl<T: Clone> Clone for CircularBuffer<T> {
  fn clone(&self) -> Self {
    let mut copy = Self::with_capacity(self.len);
    // A panicking `clone` unwinds through `copy`, which drops the prefix
    // cloned so far and releases its block. `self` is never touched.
    for item in self.iter() {
      let value = item.clone();
      // SAFETY: `copy` has room for `self.len` elements.
      unsafe {
        push_back_unchecked!(copy(value));
      }
    }
    copy
  }

  /// Builds the copy in isolation, then takes it over with a single swap. If
  /// cloning panics, `self` is left as it was.
  fn clone_from(&mut self, source: &Self) {
    let mut fresh = source.clone();
    self.swap(&mut fresh);
  }
}

impl<T> Default for CircularBuffer<T> {
  #[cfg_attr(not(tarpaulin), inline(always))]
  fn default() -> Self {
    Self::new()
  }
}

impl<T: fmt::Debug> fmt::Debug for CircularBuffer<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T: PartialEq> PartialEq for CircularBuffer<T> {
  fn eq(&self, other: &Self) -> bool {
    self.len == other.len && self.iter().eq(other.iter())
  }
}

impl<T: Eq> Eq for CircularBuffer<T> {}

macro_rules! __impl_slice_eq1 {
  ([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
    impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs
    where
      T: PartialEq<U>,
    {
      fn eq(&self, other: &$rhs) -> bool {
        if self.len() != other.len() {
          return false;
        }
        let (sa, sb) = self.as_slices();
        let (oa, ob) = other[..].split_at(sa.len());
        sa == oa && sb == ob
      }
    }
  };
}

__impl_slice_eq1! { [] CircularBuffer<T>, Vec<U> }
__impl_slice_eq1! { [] CircularBuffer<T>, &[U] }
__impl_slice_eq1! { [] CircularBuffer<T>, &mut [U] }
__impl_slice_eq1! { [const N: usize] CircularBuffer<T>, [U; N] }
__impl_slice_eq1! { [const N: usize] CircularBuffer<T>, &[U; N] }

impl<T: Hash> Hash for CircularBuffer<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_usize(self.len);
    // Element by element: the split between the two halves depends on where
    // the ring starts, so hashing the slices would differ for equal buffers.
    self.iter().for_each(|elem| elem.hash(state));
  }
}

impl<T> Index<usize> for CircularBuffer<T> {
  type Output = T;

  #[inline]
  #[track_caller]
  fn index(&self, index: usize) -> &T {
    match self.get(index) {
      Some(elem) => elem,
      None => index_out_of_bounds(index, self.len),
    }
  }
}

impl<T> IndexMut<usize> for CircularBuffer<T> {
  #[inline]
  #[track_caller]
  fn index_mut(&mut self, index: usize) -> &mut T {
    let len = self.len;
    match self.get_mut(index) {
      Some(elem) => elem,
      None => index_out_of_bounds(index, len),
    }
  }
}

impl<T> Index<Position> for CircularBuffer<T> {
  type Output = T;

  #[inline]
  #[track_caller]
  fn index(&self, pos: Position) -> &T {
    self.at(pos)
  }
}

impl<T> IndexMut<Position> for CircularBuffer<T> {
  #[inline]
  #[track_caller]
  fn index_mut(&mut self, pos: Position) -> &mut T {
    self.at_mut(pos)
  }
}

impl<T> IntoIterator for CircularBuffer<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  /// Consumes the buffer into a front-to-back iterator yielding elements by
  /// value.
  fn into_iter(self) -> IntoIter<T> {
    IntoIter::new(self)
  }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Iter<'a, T> {
    self.iter()
  }
}

impl<'a, T> IntoIterator for &'a mut CircularBuffer<T> {
  type Item = &'a mut T;
  type IntoIter = IterMut<'a, T>;

  fn into_iter(self) -> IterMut<'a, T> {
    self.iter_mut()
  }
}

impl<T> Extend<T> for CircularBuffer<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    let iter = iter.into_iter();
    let (lower, _) = iter.size_hint();
    self.reserve(lower);
    iter.for_each(|item| self.push_back(item));
  }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for CircularBuffer<T> {
  fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
    self.extend(iter.into_iter().copied());
  }
}

impl<T> FromIterator<T> for CircularBuffer<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut buf = Self::new();
    buf.extend(iter);
    buf
  }
}

impl<T, const N: usize> From<[T; N]> for CircularBuffer<T> {
  fn from(arr: [T; N]) -> Self {
    let mut buf = Self::with_capacity(N);
    for value in arr {
      // SAFETY: `with_capacity(N)` leaves room for `N` elements.
      unsafe {
        push_back_unchecked!(buf(value));
      }
    }
    buf
  }
}

impl<T> From<Vec<T>> for CircularBuffer<T> {
  fn from(vec: Vec<T>) -> Self {
    let mut buf = Self::with_capacity(vec.len());
    for value in vec {
      // SAFETY: `with_capacity(vec.len())` leaves room for every element.
      unsafe {
        push_back_unchecked!(buf(value));
      }
    }
    buf
  }
}

impl<T> From<CircularBuffer<T>> for Vec<T> {
  fn from(buf: CircularBuffer<T>) -> Self {
    let mut vec = Vec::with_capacity(buf.len());
    vec.extend(buf);
    vec
  }
}

impl<T> CircularBuffer<T> {
  /// Creates an empty buffer. Nothing is allocated until the first insertion.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let buf: CircularBuffer<u32> = CircularBuffer::new();
  /// assert_eq!(buf.capacity(), 0);
  /// ```
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub const fn new() -> Self {
    Self {
      buf: RawStorage::dangling(),
      head: 0,
      len: 0,
      epoch: 0,
    }
  }

  /// Creates an empty buffer with room for at least `capacity` elements.
  ///
  /// ## Panics
  ///
  /// Panics if the slot count overflows, and aborts through
  /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if the allocator
  /// refuses the request.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let buf: CircularBuffer<u32> = CircularBuffer::with_capacity(10);
  /// assert!(buf.capacity() > 10);
  /// ```
  #[track_caller]
  pub fn with_capacity(capacity: usize) -> Self {
    match Self::try_with_capacity(capacity) {
      Ok(buf) => buf,
      Err(err) => err.handle(),
    }
  }

  /// Creates an empty buffer with room for at least `capacity` elements,
  /// reporting allocation failure instead of aborting.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::{CircularBuffer, TryReserveError};
  ///
  /// let buf = CircularBuffer::<u64>::try_with_capacity(usize::MAX);
  /// assert_eq!(buf.err(), Some(TryReserveError::CapacityOverflow));
  /// ```
  pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
    let mut buf = Self::new();
    buf.try_reserve(capacity)?;
    Ok(buf)
  }

  /// Returns the number of physical slots. The buffer holds at most
  /// `capacity() - 1` elements before it has to grow.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::{CircularBuffer, MIN_CAPACITY};
  ///
  /// let mut buf = CircularBuffer::new();
  /// buf.push_back(1);
  /// assert_eq!(buf.capacity(), MIN_CAPACITY);
  /// ```
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub const fn capacity(&self) -> usize {
    self.buf.capacity()
  }

  /// Returns the number of elements in the buffer.
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub const fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the buffer holds no elements.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// assert!(buf.is_empty());
  /// buf.push_front(1);
  /// assert!(!buf.is_empty());
  /// ```
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Reserves room for at least `additional` more elements.
  ///
  /// Does nothing if the capacity already suffices. Otherwise the buffer grows
  /// to the larger of the required slot count and twice its current capacity.
  ///
  /// ## Panics
  ///
  /// Panics if the slot count overflows, and aborts through
  /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if the allocator
  /// refuses the request.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [1].into();
  /// buf.reserve(10);
  /// assert!(buf.capacity() > 11);
  /// ```
  #[track_caller]
  pub fn reserve(&mut self, additional: usize) {
    if let Err(err) = self.try_reserve(additional) {
      err.handle()
    }
  }

  /// Tries to reserve room for at least `additional` more elements.
  ///
  /// On error the buffer is left exactly as it was.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::{CircularBuffer, TryReserveError};
  ///
  /// let mut buf: CircularBuffer<u32> = [1, 2].into();
  /// assert_eq!(buf.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
  /// assert_eq!(buf, [1, 2]);
  ///
  /// buf.try_reserve(100).unwrap();
  /// assert!(buf.capacity() > 102);
  /// ```
  pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
    if additional == 0 {
      return Ok(());
    }
    let required = self
      .len
      .checked_add(additional)
      .and_then(|n| n.checked_add(1))
      .ok_or(TryReserveError::CapacityOverflow)?;
    if required <= self.capacity() {
      return Ok(());
    }
    let new_cap = required
      .max(self.capacity().saturating_mul(2))
      .max(MIN_CAPACITY);
    self.grow_to(new_cap)
  }

  /// Returns a front-to-back iterator.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// buf.push_back(5);
  /// buf.push_back(3);
  /// buf.push_front(4);
  /// let collected: Vec<&i32> = buf.iter().collect();
  /// assert_eq!(collected, vec![&4, &5, &3]);
  /// let reversed: Vec<&i32> = buf.iter().rev().collect();
  /// assert_eq!(reversed, vec![&3, &5, &4]);
  /// ```
  pub fn iter(&self) -> Iter<'_, T> {
    let (a, b) = self.as_slices();
    Iter::new(a.iter(), b.iter())
  }

  /// Returns a front-to-back iterator that returns mutable references.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [5, 3, 4].into();
  /// for value in buf.iter_mut() {
  ///     *value -= 2;
  /// }
  /// assert_eq!(buf, [3, 1, 2]);
  /// ```
  pub fn iter_mut(&mut self) -> IterMut<'_, T> {
    let (a, b) = self.as_mut_slices();
    IterMut::new(a.iter_mut(), b.iter_mut())
  }

  /// Returns a pair of slices which contain, in order, the contents of the
  /// buffer. The second slice is non-empty only when the live region wraps
  /// around the end of the block.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::with_capacity(7);
  /// buf.push_back(0);
  /// buf.push_back(1);
  /// buf.push_front(10);
  ///
  /// let (front, back) = buf.as_slices();
  /// assert_eq!(front, &[10]);
  /// assert_eq!(back, &[0, 1]);
  /// ```
  pub fn as_slices(&self) -> (&[T], &[T]) {
    let (a, b) = self.slice_ranges();
    let base = self.buf.as_ptr();
    // SAFETY: `slice_ranges` covers exactly the live slots.
    unsafe {
      (
        slice::from_raw_parts(base.add(a.start), a.end - a.start),
        slice::from_raw_parts(base.add(b.start), b.end - b.start),
      )
    }
  }

  /// Returns a pair of mutable slices which contain, in order, the contents
  /// of the buffer.
  pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
    let (a, b) = self.slice_ranges();
    let base = self.buf.as_mut_ptr();
    // SAFETY: `slice_ranges` covers exactly the live slots, and the two
    // ranges never overlap.
    unsafe {
      (
        slice::from_raw_parts_mut(base.add(a.start), a.end - a.start),
        slice::from_raw_parts_mut(base.add(b.start), b.end - b.start),
      )
    }
  }

  /// Provides a reference to the front element, or `None` if the buffer is
  /// empty.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// assert_eq!(buf.front(), None);
  /// buf.push_back(1);
  /// buf.push_back(2);
  /// assert_eq!(buf.front(), Some(&1));
  /// ```
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub fn front(&self) -> Option<&T> {
    self.get(0)
  }

  /// Provides a mutable reference to the front element, or `None` if the
  /// buffer is empty.
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub fn front_mut(&mut self) -> Option<&mut T> {
    self.get_mut(0)
  }

  /// Provides a reference to the back element, or `None` if the buffer is
  /// empty.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// assert_eq!(buf.back(), None);
  /// buf.push_back(1);
  /// buf.push_back(2);
  /// assert_eq!(buf.back(), Some(&2));
  /// ```
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub fn back(&self) -> Option<&T> {
    self.get(self.len.wrapping_sub(1))
  }

  /// Provides a mutable reference to the back element, or `None` if the
  /// buffer is empty.
  #[cfg_attr(not(tarpaulin), inline(always))]
  pub fn back_mut(&mut self) -> Option<&mut T> {
    self.get_mut(self.len.wrapping_sub(1))
  }

  /// Provides a reference to the element at logical `index`; index 0 is the
  /// front.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// buf.push_back(10);
  /// buf.push_front(20);
  /// assert_eq!(buf.get(0), Some(&20));
  /// assert_eq!(buf.get(1), Some(&10));
  /// assert_eq!(buf.get(2), None);
  /// ```
  #[inline]
  pub fn get(&self, index: usize) -> Option<&T> {
    if index < self.len {
      let slot = self.to_physical_idx(index);
      // SAFETY: `index < len`, so `slot` holds a live element.
      Some(unsafe { self.buf.slot_ref(slot) })
    } else {
      None
    }
  }

  /// Provides a mutable reference to the element at logical `index`.
  #[inline]
  pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
    if index < self.len {
      let slot = self.to_physical_idx(index);
      // SAFETY: `index < len`, so `slot` holds a live element.
      Some(unsafe { self.buf.slot_mut(slot) })
    } else {
      None
    }
  }

  /// Appends an element to the back of the buffer, growing it if needed.
  ///
  /// ## Panics
  ///
  /// Panics if the slot count overflows, and aborts through
  /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if the allocator
  /// refuses to grow the buffer.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// buf.push_back(1);
  /// buf.push_back(3);
  /// assert_eq!(buf.back(), Some(&3));
  /// ```
  #[track_caller]
  pub fn push_back(&mut self, value: T) {
    if let Err(err) = self.grow_for_push() {
      err.handle()
    }
    // SAFETY: `grow_for_push` left a free slot at the back.
    unsafe {
      push_back_unchecked!(self(value));
    }
  }

  /// Appends an element to the back of the buffer, reporting allocation
  /// failure instead of aborting. On error `value` is dropped and the buffer
  /// is unchanged.
  pub fn try_push_back(&mut self, value: T) -> Result<(), TryReserveError> {
    self.grow_for_push()?;
    // SAFETY: `grow_for_push` left a free slot at the back.
    unsafe {
      push_back_unchecked!(self(value));
    }
    Ok(())
  }

  /// Prepends an element to the front of the buffer, growing it if needed.
  ///
  /// Growth follows the same rule as [`push_back`](Self::push_back).
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// buf.push_front(1);
  /// buf.push_front(2);
  /// assert_eq!(buf.front(), Some(&2));
  /// ```
  #[track_caller]
  pub fn push_front(&mut self, value: T) {
    if let Err(err) = self.grow_for_push() {
      err.handle()
    }
    // SAFETY: `grow_for_push` left a free slot before the head.
    unsafe {
      push_front_unchecked!(self(value));
    }
  }

  /// Prepends an element to the front of the buffer, reporting allocation
  /// failure instead of aborting. On error `value` is dropped and the buffer
  /// is unchanged.
  pub fn try_push_front(&mut self, value: T) -> Result<(), TryReserveError> {
    self.grow_for_push()?;
    // SAFETY: `grow_for_push` left a free slot before the head.
    unsafe {
      push_front_unchecked!(self(value));
    }
    Ok(())
  }

  /// Removes the first element and returns it, or `None` if the buffer is
  /// empty. Capacity never shrinks.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [1, 2].into();
  /// assert_eq!(buf.pop_front(), Some(1));
  /// assert_eq!(buf.pop_front(), Some(2));
  /// assert_eq!(buf.pop_front(), None);
  /// ```
  pub fn pop_front(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }
    let old_head = self.head;
    self.head = self.to_physical_idx(1);
    self.len -= 1;
    // SAFETY: `old_head` held the first live element and is now outside the
    // live region.
    unsafe {
      assert_unchecked(self.len < self.capacity());
      Some(self.buf.read_at(old_head))
    }
  }

  /// Removes the last element and returns it, or `None` if the buffer is
  /// empty. Capacity never shrinks.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::new();
  /// assert_eq!(buf.pop_back(), None);
  /// buf.push_back(1);
  /// buf.push_back(3);
  /// assert_eq!(buf.pop_back(), Some(3));
  /// ```
  pub fn pop_back(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }
    self.len -= 1;
    let slot = self.to_physical_idx(self.len);
    // SAFETY: `slot` held the last live element and is now outside the live
    // region.
    unsafe {
      assert_unchecked(self.len < self.capacity());
      Some(self.buf.read_at(slot))
    }
  }

  /// The position of the first element, or [`end`](Self::end) when empty.
  #[inline]
  pub fn begin(&self) -> Position {
    self.position_at(0)
  }

  /// The position one past the last element.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let buf: CircularBuffer<_> = ['x', 'y'].into();
  /// assert_eq!(buf.begin() + 2, buf.end());
  /// assert_eq!(buf[buf.end().prev()], 'y');
  ///
  /// let empty = CircularBuffer::<char>::new();
  /// assert_eq!(empty.begin(), empty.end());
  /// ```
  #[inline]
  pub fn end(&self) -> Position {
    self.position_at(self.len)
  }

  /// Returns the element at `pos`.
  ///
  /// ## Panics
  ///
  /// Panics if `pos` was taken from another buffer or an earlier storage epoch, or
  /// does not point at a live element.
  #[track_caller]
  pub fn at(&self, pos: Position) -> &T {
    let index = self.resolve(pos);
    match self.get(index) {
      Some(elem) => elem,
      None => panic!("position does not point at a live element"),
    }
  }

  /// Returns the element at `pos` mutably.
  ///
  /// ## Panics
  ///
  /// Same conditions as [`at`](Self::at).
  #[track_caller]
  pub fn at_mut(&mut self, pos: Position) -> &mut T {
    let index = self.resolve(pos);
    match self.get_mut(index) {
      Some(elem) => elem,
      None => panic!("position does not point at a live element"),
    }
  }

  /// A read-only cursor on the first element.
  #[inline]
  pub fn cursor_front(&self) -> Cursor<'_, T> {
    Cursor::new(self, 0)
  }

  /// A read-only cursor at `pos`.
  ///
  /// ## Panics
  ///
  /// Panics if `pos` was taken from another buffer or an earlier storage epoch, or
  /// lies past the end.
  #[track_caller]
  pub fn cursor_at(&self, pos: Position) -> Cursor<'_, T> {
    let index = self.resolve_bounded(pos);
    Cursor::new(self, index)
  }

  /// A mutable cursor on the first element.
  #[inline]
  pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
    CursorMut::new(self, 0)
  }

  /// A mutable cursor at `pos`.
  ///
  /// ## Panics
  ///
  /// Same conditions as [`cursor_at`](Self::cursor_at).
  #[track_caller]
  pub fn cursor_at_mut(&mut self, pos: Position) -> CursorMut<'_, T> {
    let index = self.resolve_bounded(pos);
    CursorMut::new(self, index)
  }

  /// Inserts `value` before the element at `pos` and returns the position of
  /// the new element. Inserting at [`end`](Self::end) appends.
  ///
  /// Whichever side of `pos` is shorter is shifted by one slot, so the cost
  /// is *O*(min(k, n - k)) for logical offset `k` in a buffer of `n`
  /// elements. The buffer may reallocate, which invalidates every other
  /// position.
  ///
  /// ## Panics
  ///
  /// Panics if `pos` was taken from another buffer or an earlier storage epoch, or
  /// lies past the end. Allocation failure is handled like
  /// [`push_back`](Self::push_back).
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = ['a', 'b', 'c'].into();
  /// let pos = buf.insert(buf.begin() + 1, 'd');
  /// assert_eq!(buf[pos], 'd');
  /// let pos = buf.insert(buf.end(), 'e');
  /// assert_eq!(pos, buf.end().prev());
  /// assert_eq!(buf, ['a', 'd', 'b', 'c', 'e']);
  /// ```
  #[track_caller]
  pub fn insert(&mut self, pos: Position, value: T) -> Position {
    let index = self.resolve(pos);
    self.insert_at(index, value);
    self.position_at(index)
  }

  /// Like [`insert`](Self::insert), but reports allocation failure instead of
  /// aborting. On error `value` is dropped and the buffer is unchanged.
  ///
  /// ## Panics
  ///
  /// Panics if `pos` is invalid, as [`insert`](Self::insert) does.
  #[track_caller]
  pub fn try_insert(&mut self, pos: Position, value: T) -> Result<Position, TryReserveError> {
    let index = self.resolve(pos);
    self.insert_shifting(index, value)?;
    Ok(self.position_at(index))
  }

  /// Inserts `value` at logical `index`, shifting the shorter side.
  ///
  /// ## Panics
  ///
  /// Panics if `index > len`.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [1, 2, 4].into();
  /// buf.insert_at(2, 3);
  /// buf.insert_at(0, 0);
  /// assert_eq!(buf, [0, 1, 2, 3, 4]);
  /// ```
  #[track_caller]
  pub fn insert_at(&mut self, index: usize, value: T) {
    if let Err(err) = self.insert_shifting(index, value) {
      err.handle()
    }
  }

  /// Drops the element at `pos` and returns the position of the element that
  /// followed it, which is [`end`](Self::end) when the last element was
  /// erased.
  ///
  /// Whichever side of `pos` is shorter is shifted by one slot. Never
  /// reallocates.
  ///
  /// ## Panics
  ///
  /// Panics if `pos` was taken from another buffer or an earlier storage epoch, or
  /// does not point at a live element.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [0, 1, 2, 3].into();
  /// let next = buf.erase(buf.begin() + 2);
  /// assert_eq!(buf, [0, 1, 3]);
  /// assert_eq!(buf[next], 3);
  ///
  /// let next = buf.erase(buf.end().prev());
  /// assert_eq!(next, buf.end());
  /// ```
  #[track_caller]
  pub fn erase(&mut self, pos: Position) -> Position {
    let index = self.resolve(pos);
    let len = self.len;
    assert!(index < len, "erase position (is {index}) should be < len (is {len})");
    let _ = self.remove_shifting(index);
    self.position_at(index)
  }

  /// Removes and returns the element at logical `index`, shifting the shorter
  /// side. Returns `None` if `index` is out of bounds.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = ['a', 'b', 'c'].into();
  /// assert_eq!(buf.remove(1), Some('b'));
  /// assert_eq!(buf.remove(5), None);
  /// assert_eq!(buf, ['a', 'c']);
  /// ```
  pub fn remove(&mut self, index: usize) -> Option<T> {
    self.remove_shifting(index).map(|(value, _)| value)
  }

  /// Swaps the contents of two buffers. Positions follow their storage.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut a: CircularBuffer<_> = [1, 2].into();
  /// let mut b: CircularBuffer<_> = [3].into();
  /// a.swap(&mut b);
  /// assert_eq!(a, [3]);
  /// assert_eq!(b, [1, 2]);
  /// ```
  #[inline]
  pub fn swap(&mut self, other: &mut Self) {
    mem::swap(self, other);
  }

  /// Swaps the elements at logical indices `i` and `j`.
  ///
  /// ## Panics
  ///
  /// Panics if either index is out of bounds.
  #[track_caller]
  pub fn swap_elements(&mut self, i: usize, j: usize) {
    assert!(i < self.len, "swap index (is {i}) should be < len (is {})", self.len);
    assert!(j < self.len, "swap index (is {j}) should be < len (is {})", self.len);
    self.swap_logical(i, j);
  }

  /// Shortens the buffer to `len` elements, dropping the rest from the back.
  /// Has no effect if the buffer is already shorter.
  pub fn truncate(&mut self, len: usize) {
    while self.len > len {
      self.len -= 1;
      let slot = self.to_physical_idx(self.len);
      // SAFETY: `slot` held the last live element and is now outside the live
      // region.
      unsafe { self.buf.destroy_at(slot) }
    }
  }

  /// Drops every element and releases the storage, returning the buffer to
  /// its unallocated state. Every outstanding position becomes invalid.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [1, 2, 3].into();
  /// buf.clear();
  /// assert!(buf.is_empty());
  /// assert_eq!(buf.capacity(), 0);
  /// ```
  pub fn clear(&mut self) {
    self.truncate(0);
    let released = mem::replace(&mut self.buf, RawStorage::dangling());
    trace_event!(trace, capacity = released.capacity(), "released ring storage");
    drop(released);
    self.head = 0;
    self.epoch = next_epoch();
  }

  /// Returns `true` if the buffer contains an element equal to `x`.
  #[inline]
  pub fn contains(&self, x: &T) -> bool
  where
    T: PartialEq,
  {
    self.iter().any(|elem| elem == x)
  }

  /// Resizes the buffer in place so that its length equals `new_len`,
  /// appending clones of `value` or dropping elements from the back.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = [5, 10].into();
  /// buf.resize(4, 0);
  /// assert_eq!(buf, [5, 10, 0, 0]);
  /// buf.resize(1, 0);
  /// assert_eq!(buf, [5]);
  /// ```
  #[track_caller]
  pub fn resize(&mut self, new_len: usize, value: T)
  where
    T: Clone,
  {
    if new_len <= self.len {
      self.truncate(new_len);
      return;
    }
    let extra = new_len - self.len;
    self.reserve(extra);
    for item in repeat_n(value, extra) {
      // SAFETY: `reserve(extra)` left room for `extra` more elements.
      unsafe {
        push_back_unchecked!(self(item));
      }
    }
  }
}

impl<T> Drop for CircularBuffer<T> {
  fn drop(&mut self) {
    self.truncate(0);
  }
}

impl<T> CircularBuffer<T> {
  /// Grows the ring so one more element fits. The first growth allocates
  /// [`MIN_CAPACITY`] slots, every later one doubles the slot count.
  fn grow_for_push(&mut self) -> Result<(), TryReserveError> {
    let cap = self.capacity();
    if cap == 0 {
      self.grow_to(MIN_CAPACITY)
    } else if self.len == cap - 1 {
      let new_cap = cap.checked_mul(2).ok_or(TryReserveError::CapacityOverflow)?;
      self.grow_to(new_cap)
    } else {
      Ok(())
    }
  }

  /// Moves every element, in logical order, into a fresh block of `new_cap`
  /// slots and adopts it. Nothing changes unless the allocation succeeds.
  fn grow_to(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
    debug_assert!(new_cap > self.len);
    let mut fresh = match RawStorage::allocate(new_cap) {
      Ok(fresh) => fresh,
      Err(err) => {
        trace_event!(debug, requested = new_cap, len = self.len, error = %err, "ring storage reservation failed");
        return Err(err);
      }
    };

    let (front, back) = self.as_slices();
    // SAFETY: `fresh` has room for `len` values and does not overlap the
    // current block. After the copy the old slots are treated as moved-from.
    unsafe {
      let dst = fresh.as_mut_ptr();
      core::ptr::copy_nonoverlapping(front.as_ptr(), dst, front.len());
      core::ptr::copy_nonoverlapping(back.as_ptr(), dst.add(front.len()), back.len());
    }

    let old = mem::replace(&mut self.buf, fresh);
    self.head = 0;
    self.epoch = next_epoch();
    trace_event!(
      trace,
      old_capacity = old.capacity(),
      new_capacity = new_cap,
      len = self.len,
      "reallocated ring storage"
    );
    // Only releases the block: its slots no longer hold live values.
    drop(old);
    Ok(())
  }

  /// Inserts at logical `index` and returns how many adjacent swaps it took.
  ///
  /// The new element enters at the end closer to `index` and is swapped
  /// towards it one slot at a time.
  #[track_caller]
  pub(crate) fn insert_shifting(&mut self, index: usize, value: T) -> Result<usize, TryReserveError> {
    let len = self.len;
    assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
    self.grow_for_push()?;

    if index <= len / 2 {
      // SAFETY: `grow_for_push` left a free slot before the head.
      unsafe {
        push_front_unchecked!(self(value));
      }
      for i in 0..index {
        self.swap_logical(i, i + 1);
      }
      Ok(index)
    } else {
      // SAFETY: `grow_for_push` left a free slot at the back.
      unsafe {
        push_back_unchecked!(self(value));
      }
      for i in (index..len).rev() {
        self.swap_logical(i, i + 1);
      }
      Ok(len - index)
    }
  }

  /// Removes logical `index` and returns the value with the number of
  /// adjacent swaps it took.
  pub(crate) fn remove_shifting(&mut self, index: usize) -> Option<(T, usize)> {
    let len = self.len;
    if index >= len {
      return None;
    }
    if index + 1 == len {
      return self.pop_back().map(|value| (value, 0));
    }

    if index <= len / 2 {
      for i in (0..index).rev() {
        self.swap_logical(i, i + 1);
      }
      self.pop_front().map(|value| (value, index))
    } else {
      for i in index..len - 1 {
        self.swap_logical(i, i + 1);
      }
      self.pop_back().map(|value| (value, len - 1 - index))
    }
  }

  #[inline]
  fn swap_logical(&mut self, i: usize, j: usize) {
    debug_assert!(i < self.len && j < self.len);
    let (a, b) = (self.to_physical_idx(i), self.to_physical_idx(j));
    // SAFETY: both logical indices are live.
    unsafe { self.buf.swap_slots(a, b) }
  }

  pub(crate) fn position_at(&self, index: usize) -> Position {
    debug_assert!(index <= self.len);
    Position::new(
      self.to_physical_idx(index),
      self.capacity(),
      self.buf.identity(),
      self.epoch,
      self.head,
    )
  }

  /// Maps `pos` to a logical index using the current begin slot, so a
  /// position survives front insertions that did not reallocate.
  #[track_caller]
  fn resolve(&self, pos: Position) -> usize {
    assert!(
      pos.same_storage(self.buf.identity(), self.epoch),
      "position does not belong to the current storage of this buffer"
    );
    ring::logical_position(pos.slot(), self.head, self.capacity())
  }

  #[track_caller]
  fn resolve_bounded(&self, pos: Position) -> usize {
    let index = self.resolve(pos);
    let len = self.len;
    assert!(index <= len, "position (is {index}) should be <= len (is {len})");
    index
  }

  /// The two physical ranges holding the live elements, front part first.
  fn slice_ranges(&self) -> (Range<usize>, Range<usize>) {
    if self.len == 0 {
      return (0..0, 0..0);
    }
    // `head < capacity` whenever storage is allocated, and it is whenever
    // `len > 0`.
    let head_len = self.capacity() - self.head;
    if head_len >= self.len {
      (self.head..self.head + self.len, 0..0)
    } else {
      (self.head..self.capacity(), 0..self.len - head_len)
    }
  }

  #[inline]
  const fn to_physical_idx(&self, idx: usize) -> usize {
    ring::physical_slot(self.head, idx, self.capacity())
  }

  /// Returns the index in the underlying buffer for a given logical element
  /// index - subtrahend.
  #[inline]
  const fn wrap_sub(&self, idx: usize, subtrahend: usize) -> usize {
    ring::wrap_index(
      idx.wrapping_sub(subtrahend).wrapping_add(self.capacity()),
      self.capacity(),
    )
  }
}

/// Source of storage epochs. Each allocation and each `clear` draws a value no
/// other storage in the process has held, so reused addresses and the shared
/// dangling pointer of zero-sized elements never alias. Buffers that never
/// allocated stay at epoch 0; their only position is `begin() == end()`.
static NEXT_EPOCH: AtomicUsize = AtomicUsize::new(1);

#[inline]
fn next_epoch() -> usize {
  NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
  panic!("index out of bounds: the len is {len} but the index is {index}")
}

#[rustversion::since(1.82)]
#[inline]
fn repeat_n<T: Clone>(element: T, count: usize) -> impl Iterator<Item = T> {
  core::iter::repeat_n(element, count)
}

#[rustversion::before(1.82)]
#[inline]
fn repeat_n<T: Clone>(element: T, mut count: usize) -> impl Iterator<Item = T> {
  core::iter::from_fn(move || {
    if count == 0 {
      None
    } else {
      count -= 1;
      Some(element.clone())
    }
  })
}
