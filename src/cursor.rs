use core::fmt;

use super::{CircularBuffer, Position};

/// A read-only cursor over a [`CircularBuffer`].
///
/// The cursor sits either on an element or on the end of the buffer, one
/// past the last element. It is created by [`CircularBuffer::cursor_front`]
/// and [`CircularBuffer::cursor_at`], or by downgrading a [`CursorMut`].
///
/// ## Examples
///
/// ```
/// use circular_deque::CircularBuffer;
///
/// let buf: CircularBuffer<_> = ['a', 'b', 'c'].into();
/// let mut cursor = buf.cursor_front();
/// assert_eq!(cursor.get(), Some(&'a'));
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.peek_prev(), Some(&'b'));
/// cursor.move_next();
/// assert_eq!(cursor.get(), None);
/// assert_eq!(cursor.position(), buf.end());
/// ```
pub struct Cursor<'a, T> {
  buf: &'a CircularBuffer<T>,
  index: usize,
}

impl<T> Clone for Cursor<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Cursor").field(&self.index).field(&self.get()).finish()
  }
}

impl<'a, T> Cursor<'a, T> {
  pub(super) const fn new(buf: &'a CircularBuffer<T>, index: usize) -> Self {
    Self { buf, index }
  }

  /// The logical index of the cursor; equal to the buffer length at the end.
  #[inline]
  pub const fn index(&self) -> usize {
    self.index
  }

  /// The cursor's location as a detached [`Position`].
  #[inline]
  pub fn position(&self) -> Position {
    self.buf.position_at(self.index)
  }

  /// The element under the cursor, or `None` at the end.
  #[inline]
  pub fn get(&self) -> Option<&'a T> {
    self.buf.get(self.index)
  }

  /// The element after the cursor.
  #[inline]
  pub fn peek_next(&self) -> Option<&'a T> {
    self.buf.get(self.index + 1)
  }

  /// The element before the cursor.
  #[inline]
  pub fn peek_prev(&self) -> Option<&'a T> {
    self.index.checked_sub(1).and_then(|idx| self.buf.get(idx))
  }

  /// Steps towards the back. Stays put at the end.
  #[inline]
  pub fn move_next(&mut self) {
    if self.index < self.buf.len() {
      self.index += 1;
    }
  }

  /// Steps towards the front. Stays put at the first element.
  #[inline]
  pub fn move_prev(&mut self) {
    self.index = self.index.saturating_sub(1);
  }
}

/// A cursor over a [`CircularBuffer`] that can mutate, insert and remove.
///
/// Created by [`CircularBuffer::cursor_front_mut`] and
/// [`CircularBuffer::cursor_at_mut`]. It can be downgraded into a [`Cursor`],
/// but a [`Cursor`] can never be upgraded.
///
/// ## Examples
///
/// ```
/// use circular_deque::{CircularBuffer, Cursor};
///
/// let mut buf: CircularBuffer<_> = [1, 2, 4, 5].into();
/// let mut cursor = buf.cursor_front_mut();
/// cursor.move_next();
/// cursor.move_next();
/// cursor.insert_before(3);
/// assert_eq!(cursor.get(), Some(&3));
///
/// cursor.move_next();
/// *cursor.get_mut().unwrap() *= 10;
/// assert_eq!(cursor.remove_current(), Some(40));
///
/// let cursor: Cursor<'_, _> = cursor.into();
/// assert_eq!(cursor.get(), Some(&5));
/// assert_eq!(buf, [1, 2, 3, 5]);
/// ```
pub struct CursorMut<'a, T> {
  buf: &'a mut CircularBuffer<T>,
  index: usize,
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("CursorMut").field(&self.index).field(&self.get()).finish()
  }
}

impl<'a, T> CursorMut<'a, T> {
  pub(super) fn new(buf: &'a mut CircularBuffer<T>, index: usize) -> Self {
    Self { buf, index }
  }

  /// The logical index of the cursor; equal to the buffer length at the end.
  #[inline]
  pub const fn index(&self) -> usize {
    self.index
  }

  /// The cursor's location as a detached [`Position`].
  #[inline]
  pub fn position(&self) -> Position {
    self.buf.position_at(self.index)
  }

  /// The element under the cursor, or `None` at the end.
  #[inline]
  pub fn get(&self) -> Option<&T> {
    self.buf.get(self.index)
  }

  /// The element under the cursor, mutably.
  #[inline]
  pub fn get_mut(&mut self) -> Option<&mut T> {
    self.buf.get_mut(self.index)
  }

  /// The element after the cursor.
  #[inline]
  pub fn peek_next(&self) -> Option<&T> {
    self.buf.get(self.index + 1)
  }

  /// The element before the cursor.
  #[inline]
  pub fn peek_prev(&self) -> Option<&T> {
    self.index.checked_sub(1).and_then(|idx| self.buf.get(idx))
  }

  /// Steps towards the back. Stays put at the end.
  #[inline]
  pub fn move_next(&mut self) {
    if self.index < self.buf.len() {
      self.index += 1;
    }
  }

  /// Steps towards the front. Stays put at the first element.
  #[inline]
  pub fn move_prev(&mut self) {
    self.index = self.index.saturating_sub(1);
  }

  /// A read-only cursor at the same location, borrowing this one.
  #[inline]
  pub fn as_cursor(&self) -> Cursor<'_, T> {
    Cursor::new(&*self.buf, self.index)
  }

  /// Inserts `value` before the element under the cursor (or at the back when
  /// the cursor is at the end) and moves the cursor onto it.
  ///
  /// Shifts whichever side of the cursor is shorter.
  pub fn insert_before(&mut self, value: T) {
    self.buf.insert_at(self.index, value);
  }

  /// Removes the element under the cursor and returns it. The cursor then
  /// sits on the element that followed it. Returns `None` at the end.
  pub fn remove_current(&mut self) -> Option<T> {
    self.buf.remove(self.index)
  }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
  fn from(cursor: CursorMut<'a, T>) -> Self {
    let CursorMut { buf, index } = cursor;
    Cursor::new(buf, index)
  }
}
