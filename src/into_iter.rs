use core::{fmt, iter::FusedIterator};

use super::CircularBuffer;

/// An owning iterator over the elements of a [`CircularBuffer`].
///
/// This `struct` is created by the [`into_iter`] method on [`CircularBuffer`]
/// (provided by the [`IntoIterator`] trait). Elements not yet yielded are
/// dropped together with the iterator.
///
/// [`into_iter`]: CircularBuffer::into_iter
#[derive(Clone)]
pub struct IntoIter<T> {
  inner: CircularBuffer<T>,
}

impl<T> IntoIter<T> {
  pub(super) const fn new(inner: CircularBuffer<T>) -> Self {
    Self { inner }
  }

  /// Returns the remaining elements as a buffer without consuming them.
  pub fn into_inner(self) -> CircularBuffer<T> {
    self.inner
  }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("IntoIter").field(&self.inner).finish()
  }
}

impl<T> Iterator for IntoIter<T> {
  type Item = T;

  #[inline]
  fn next(&mut self) -> Option<T> {
    self.inner.pop_front()
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = self.inner.len();
    (len, Some(len))
  }

  #[inline]
  fn count(self) -> usize {
    self.inner.len()
  }

  #[inline]
  fn last(mut self) -> Option<T> {
    self.inner.pop_back()
  }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
  #[inline]
  fn next_back(&mut self) -> Option<T> {
    self.inner.pop_back()
  }
}

impl<T> ExactSizeIterator for IntoIter<T> {
  #[inline]
  fn len(&self) -> usize {
    self.inner.len()
  }
}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
  use crate::CircularBuffer;
  use std::{rc::Rc, vec::Vec};

  #[test]
  fn drains_from_both_ends() {
    let mut buf = CircularBuffer::new();
    for value in 0..3 {
      buf.push_back(value);
      buf.push_front(-value - 1);
    }
    // [-3, -2, -1, 0, 1, 2]
    let mut iter = buf.into_iter();
    assert_eq!(iter.size_hint(), (6, Some(6)));
    assert_eq!(iter.next(), Some(-3));
    assert_eq!(iter.next_back(), Some(2));
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.clone().into_inner(), [-2, -1, 0, 1]);
    assert_eq!(iter.last(), Some(1));
  }

  #[test]
  fn unyielded_elements_are_dropped() {
    let marker = Rc::new(());
    let buf: CircularBuffer<_> = (0..6).map(|_| Rc::clone(&marker)).collect();
    assert_eq!(Rc::strong_count(&marker), 7);

    let mut iter = buf.into_iter();
    let first = iter.next();
    assert_eq!(Rc::strong_count(&marker), 7);
    drop(iter);
    assert_eq!(Rc::strong_count(&marker), 2);
    drop(first);
    assert_eq!(Rc::strong_count(&marker), 1);
  }

  #[test]
  fn collects_in_logical_order() {
    let mut buf = CircularBuffer::with_capacity(4);
    for value in [3, 4, 5] {
      buf.push_back(value);
    }
    buf.pop_front();
    buf.push_back(6);
    buf.push_back(7);
    assert_eq!(buf.into_iter().collect::<Vec<_>>(), [4, 5, 6, 7]);
  }
}
