use core::{fmt, iter::FusedIterator, mem, slice};

/// A front-to-back iterator over the elements of a
/// [`CircularBuffer`](crate::CircularBuffer).
///
/// This `struct` is created by
/// [`CircularBuffer::iter`](crate::CircularBuffer::iter). Walk it with
/// [`rev`](Iterator::rev) for back-to-front order.
#[derive(Clone)]
pub struct Iter<'a, T> {
  i1: slice::Iter<'a, T>,
  i2: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
  pub(super) const fn new(i1: slice::Iter<'a, T>, i2: slice::Iter<'a, T>) -> Self {
    Self { i1, i2 }
  }

  /// The elements not yet yielded, as the two contiguous runs of the ring.
  ///
  /// ## Examples
  ///
  /// ```
  /// use circular_deque::CircularBuffer;
  ///
  /// let mut buf = CircularBuffer::with_capacity(7);
  /// buf.push_back(0);
  /// buf.push_back(1);
  /// buf.push_back(2);
  /// buf.push_front(10);
  /// buf.push_front(9);
  ///
  /// let mut iter = buf.iter();
  /// iter.next();
  /// iter.next_back();
  /// assert_eq!(iter.as_slices(), (&[10][..], &[0, 1][..]));
  /// ```
  pub fn as_slices(&self) -> (&'a [T], &'a [T]) {
    (self.i1.as_slice(), self.i2.as_slice())
  }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Iter")
      .field(&self.i1.as_slice())
      .field(&self.i2.as_slice())
      .finish()
  }
}

impl<T> Default for Iter<'_, T> {
  fn default() -> Self {
    Self::new(Default::default(), Default::default())
  }
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  #[inline]
  fn next(&mut self) -> Option<&'a T> {
    match self.i1.next() {
      Some(val) => Some(val),
      None => {
        // `i1` is spent, continue with the back half.
        mem::swap(&mut self.i1, &mut self.i2);
        self.i1.next()
      }
    }
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = self.len();
    (len, Some(len))
  }

  fn fold<Acc, F>(self, accum: Acc, mut f: F) -> Acc
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    let accum = self.i1.fold(accum, &mut f);
    self.i2.fold(accum, &mut f)
  }

  #[inline]
  fn last(mut self) -> Option<&'a T> {
    self.next_back()
  }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
  #[inline]
  fn next_back(&mut self) -> Option<&'a T> {
    match self.i2.next_back() {
      Some(val) => Some(val),
      None => {
        mem::swap(&mut self.i1, &mut self.i2);
        self.i2.next_back()
      }
    }
  }

  fn rfold<Acc, F>(self, accum: Acc, mut f: F) -> Acc
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    let accum = self.i2.rfold(accum, &mut f);
    self.i1.rfold(accum, &mut f)
  }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
  fn len(&self) -> usize {
    self.i1.len() + self.i2.len()
  }
}

impl<T> FusedIterator for Iter<'_, T> {}
