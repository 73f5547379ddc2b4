use core::{
  cmp::Ordering,
  ops::{Add, AddAssign, Sub, SubAssign},
};

use super::ring;

/// A random-access position inside a [`CircularBuffer`].
///
/// A `Position` is a plain value: the physical slot it points at, the size of
/// the ring, the identity of the storage it was taken from, and the slot the
/// buffer started at when the position was created. It does not borrow the
/// buffer, so it can be handed back to mutating methods such as
/// [`insert`](crate::CircularBuffer::insert) and [`erase`](crate::CircularBuffer::erase).
///
/// Stepping and offset arithmetic wrap around the ring and never fail. Walking
/// past the logical bounds of the buffer is the caller's responsibility, just
/// as with slice indices.
///
/// ## Validity
///
/// Every reallocation and every [`clear`](crate::CircularBuffer::clear) starts a new
/// storage epoch. Positions from an older epoch compare unequal to every
/// position of the new one, and handing one to the buffer panics.
///
/// Ordering and distance are computed relative to the begin slot captured at
/// creation time. A [`push_front`](crate::CircularBuffer::push_front) that does not
/// reallocate moves the begin slot, so two positions created on either side of
/// it have no defined order: [`partial_cmp`](PartialOrd::partial_cmp) returns
/// `None` and [`offset_from`](Position::offset_from) returns `None` for such a
/// pair. Each of them still addresses the same element as before.
///
/// ## Examples
///
/// ```
/// use circular_deque::CircularBuffer;
///
/// let mut buf: CircularBuffer<_> = [10, 20, 30].into();
/// let first = buf.begin();
/// let third = first + 2;
///
/// assert_eq!(buf[third], 30);
/// assert_eq!(third - first, 2);
/// assert!(first < third);
/// assert_eq!(third.next(), buf.end());
///
/// let pos = buf.insert(third, 25);
/// assert_eq!(buf, [10, 20, 25, 30]);
/// assert_eq!(buf[pos], 25);
/// ```
///
/// [`CircularBuffer`]: crate::CircularBuffer
#[derive(Debug, Clone, Copy)]
pub struct Position {
  slot: usize,
  cap: usize,
  storage: usize,
  epoch: usize,
  head: usize,
}

impl Position {
  #[inline]
  pub(crate) const fn new(slot: usize, cap: usize, storage: usize, epoch: usize, head: usize) -> Self {
    Self {
      slot,
      cap,
      storage,
      epoch,
      head,
    }
  }

  /// The physical slot this position points at.
  #[inline]
  pub(crate) const fn slot(&self) -> usize {
    self.slot
  }

  /// The offset of this position from the begin slot captured when it was
  /// created.
  #[inline]
  pub const fn logical_position(&self) -> usize {
    ring::logical_position(self.slot, self.head, self.cap)
  }

  /// The position one step towards the back.
  #[inline]
  #[must_use]
  pub const fn next(self) -> Self {
    self.forward(1)
  }

  /// The position one step towards the front.
  #[inline]
  #[must_use]
  pub const fn prev(self) -> Self {
    self.backward(1)
  }

  /// The signed distance from `origin` to `self`, or `None` when the two
  /// positions do not share a storage epoch and begin slot.
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf: CircularBuffer<_> = (0..5).collect();
  /// let (a, b) = (buf.begin() + 1, buf.begin() + 4);
  /// assert_eq!(b.offset_from(a), Some(3));
  /// assert_eq!(a.offset_from(b), Some(-3));
  ///
  /// buf.push_front(9);
  /// assert_eq!(buf.begin().offset_from(a), None);
  /// ```
  pub fn offset_from(self, origin: Self) -> Option<isize> {
    if !self.same_frame(&origin) {
      return None;
    }
    let (a, b) = (self.logical_position(), origin.logical_position());
    Some(if a >= b {
      (a - b) as isize
    } else {
      -((b - a) as isize)
    })
  }

  #[inline]
  const fn forward(self, k: usize) -> Self {
    Self {
      slot: ring::advance(self.slot, k, self.cap),
      ..self
    }
  }

  #[inline]
  const fn backward(self, k: usize) -> Self {
    Self {
      slot: ring::retreat(self.slot, k, self.cap),
      ..self
    }
  }

  #[inline]
  pub(crate) const fn same_storage(&self, storage: usize, epoch: usize) -> bool {
    self.storage == storage && self.epoch == epoch
  }

  #[inline]
  const fn same_frame(&self, other: &Self) -> bool {
    self.same_storage(other.storage, other.epoch) && self.head == other.head
  }
}

impl PartialEq for Position {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.slot == other.slot && self.same_storage(other.storage, other.epoch)
  }
}

impl Eq for Position {}

impl PartialOrd for Position {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    if self == other {
      return Some(Ordering::Equal);
    }
    if !self.same_frame(other) {
      return None;
    }
    Some(self.logical_position().cmp(&other.logical_position()))
  }
}

impl Add<usize> for Position {
  type Output = Self;

  #[inline]
  fn add(self, k: usize) -> Self {
    self.forward(k)
  }
}

impl AddAssign<usize> for Position {
  #[inline]
  fn add_assign(&mut self, k: usize) {
    *self = self.forward(k);
  }
}

impl Sub<usize> for Position {
  type Output = Self;

  #[inline]
  fn sub(self, k: usize) -> Self {
    self.backward(k)
  }
}

impl SubAssign<usize> for Position {
  #[inline]
  fn sub_assign(&mut self, k: usize) {
    *self = self.backward(k);
  }
}

impl Sub for Position {
  type Output = isize;

  /// The signed distance between two positions of the same frame.
  ///
  /// ## Panics
  ///
  /// Panics if the positions come from different storage epochs or were taken
  /// on either side of a front insertion. Use
  /// [`offset_from`](Position::offset_from) to check instead.
  #[track_caller]
  fn sub(self, origin: Self) -> isize {
    match self.offset_from(origin) {
      Some(distance) => distance,
      None => panic!("positions do not share a storage epoch and begin slot"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Position;
  use core::cmp::Ordering;

  fn at(slot: usize, head: usize) -> Position {
    Position::new(slot, 8, 0x1000, 0, head)
  }

  #[test]
  fn stepping_wraps_around_the_ring() {
    let p = at(7, 6);
    assert_eq!(p.next().slot(), 0);
    assert_eq!(p.next().prev(), p);
    assert_eq!((p + 3).slot(), 2);
    assert_eq!((p - 9).slot(), 6);

    let mut q = p;
    q += 2;
    q -= 1;
    assert_eq!(q.slot(), 0);
  }

  #[test]
  fn ordering_follows_logical_offsets() {
    // begin at slot 6: slot 1 is logically after slot 7.
    let (a, b) = (at(7, 6), at(1, 6));
    assert!(a < b);
    assert!(b >= a);
    assert_eq!(b - a, 2);
    assert_eq!(a - b, -2);
    assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
  }

  #[test]
  fn different_frames_are_unordered() {
    let a = at(3, 6);
    let b = at(4, 5);
    assert_eq!(a.partial_cmp(&b), None);
    assert_eq!(a.offset_from(b), None);

    // Equal positions stay equal even across begin snapshots.
    assert_eq!(at(3, 6), at(3, 5));
    assert_eq!(at(3, 6).partial_cmp(&at(3, 5)), Some(Ordering::Equal));
  }

  #[test]
  fn other_epochs_never_compare_equal() {
    let old = Position::new(2, 8, 0x1000, 0, 0);
    let new = Position::new(2, 8, 0x1000, 1, 0);
    assert_ne!(old, new);
    assert_eq!(old.partial_cmp(&new), None);
  }

  #[test]
  #[should_panic(expected = "positions do not share")]
  fn distance_across_frames_panics() {
    let _ = at(3, 6) - at(3, 2).next();
  }
}
