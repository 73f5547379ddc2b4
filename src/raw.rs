use alloc::alloc::{alloc, dealloc};
use core::{
  alloc::Layout,
  marker::PhantomData,
  mem::{self, MaybeUninit},
  ptr::NonNull,
};

use super::TryReserveError;

/// An owned, uninitialized block of `capacity` slots for values of type `T`.
///
/// The block never tracks which slots are live. Constructing into and
/// destroying out of slots is the owner's business; dropping the block only
/// returns the memory to the allocator.
pub(crate) struct RawStorage<T> {
  ptr: NonNull<T>,
  cap: usize,
  _marker: PhantomData<T>,
}

impl<T> RawStorage<T> {
  const IS_ZST: bool = mem::size_of::<T>() == 0;

  /// The unallocated state: no backing memory and zero slots.
  #[inline]
  pub(crate) const fn dangling() -> Self {
    Self {
      ptr: NonNull::dangling(),
      cap: 0,
      _marker: PhantomData,
    }
  }

  /// Reserves raw space for `cap` values without constructing any of them.
  ///
  /// Zero-sized types and `cap == 0` never reach the allocator.
  pub(crate) fn allocate(cap: usize) -> Result<Self, TryReserveError> {
    if cap == 0 {
      return Ok(Self::dangling());
    }

    if Self::IS_ZST {
      return Ok(Self {
        ptr: NonNull::dangling(),
        cap,
        _marker: PhantomData,
      });
    }

    let layout = Self::layout(cap)?;
    // SAFETY: `layout` has a non-zero size, `T` is not zero-sized and `cap > 0`.
    let raw = unsafe { alloc(layout) };
    match NonNull::new(raw.cast::<T>()) {
      Some(ptr) => Ok(Self {
        ptr,
        cap,
        _marker: PhantomData,
      }),
      None => Err(TryReserveError::AllocError { layout }),
    }
  }

  fn layout(cap: usize) -> Result<Layout, TryReserveError> {
    Layout::array::<T>(cap).map_err(|_| TryReserveError::CapacityOverflow)
  }

  #[inline]
  pub(crate) const fn capacity(&self) -> usize {
    self.cap
  }

  #[inline]
  pub(crate) const fn as_ptr(&self) -> *const T {
    self.ptr.as_ptr()
  }

  #[inline]
  pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
    self.ptr.as_ptr()
  }

  /// Address of the block, used to tell positions from different storages apart.
  #[inline]
  pub(crate) fn identity(&self) -> usize {
    self.ptr.as_ptr() as usize
  }

  /// Writes `value` into an uninitialized slot and returns a reference to it.
  ///
  /// # Safety
  ///
  /// `slot < self.capacity()` and the slot must not hold a live value.
  #[inline]
  pub(crate) unsafe fn construct_at(&mut self, slot: usize, value: T) -> &mut T {
    debug_assert!(slot < self.cap);
    unsafe {
      let cell = &mut *self.ptr.as_ptr().add(slot).cast::<MaybeUninit<T>>();
      cell.write(value)
    }
  }

  /// Runs the destructor of the live value in `slot`, leaving it uninitialized.
  ///
  /// # Safety
  ///
  /// `slot < self.capacity()` and the slot must hold a live value.
  #[inline]
  pub(crate) unsafe fn destroy_at(&mut self, slot: usize) {
    debug_assert!(slot < self.cap);
    unsafe { self.ptr.as_ptr().add(slot).drop_in_place() }
  }

  /// Moves the live value out of `slot`, leaving it uninitialized.
  ///
  /// # Safety
  ///
  /// `slot < self.capacity()` and the slot must hold a live value. The caller
  /// must treat the slot as uninitialized afterwards.
  #[inline]
  pub(crate) unsafe fn read_at(&self, slot: usize) -> T {
    debug_assert!(slot < self.cap);
    unsafe { self.ptr.as_ptr().add(slot).read() }
  }

  /// # Safety
  ///
  /// `slot < self.capacity()` and the slot must hold a live value.
  #[inline]
  pub(crate) unsafe fn slot_ref(&self, slot: usize) -> &T {
    debug_assert!(slot < self.cap);
    unsafe { &*self.ptr.as_ptr().add(slot) }
  }

  /// # Safety
  ///
  /// `slot < self.capacity()` and the slot must hold a live value.
  #[inline]
  pub(crate) unsafe fn slot_mut(&mut self, slot: usize) -> &mut T {
    debug_assert!(slot < self.cap);
    unsafe { &mut *self.ptr.as_ptr().add(slot) }
  }

  /// Swaps the values of two live slots.
  ///
  /// # Safety
  ///
  /// Both slots are in bounds and hold live values.
  #[inline]
  pub(crate) unsafe fn swap_slots(&mut self, a: usize, b: usize) {
    debug_assert!(a < self.cap && b < self.cap);
    unsafe {
      let base = self.ptr.as_ptr();
      core::ptr::swap(base.add(a), base.add(b));
    }
  }
}

impl<T> Drop for RawStorage<T> {
  fn drop(&mut self) {
    if self.cap == 0 || Self::IS_ZST {
      return;
    }
    // SAFETY: the same layout was accepted by `allocate`.
    unsafe {
      let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
      dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
    }
  }
}
