use core::alloc::Layout;

/// The error type for `try_reserve` and the other fallible growth methods.
///
/// When one of these is returned the container is left exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
  /// The requested slot count overflows `usize`, or its byte size exceeds
  /// `isize::MAX`.
  #[error("capacity overflow")]
  CapacityOverflow,
  /// The allocator could not satisfy the request.
  #[error("memory allocation of {} bytes failed", .layout.size())]
  AllocError {
    /// The layout of the refused allocation.
    layout: Layout,
  },
}

impl TryReserveError {
  /// Turns the error into the matching abort or panic, the way `Vec` does for
  /// its infallible growth paths.
  #[cold]
  #[track_caller]
  pub(crate) fn handle(self) -> ! {
    match self {
      Self::CapacityOverflow => panic!("capacity overflow"),
      Self::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::TryReserveError;
  use core::alloc::Layout;
  use std::string::ToString;

  #[test]
  fn messages_name_the_failure() {
    assert_eq!(TryReserveError::CapacityOverflow.to_string(), "capacity overflow");

    let layout = Layout::array::<u64>(8).unwrap();
    let err = TryReserveError::AllocError { layout };
    assert_eq!(err.to_string(), "memory allocation of 64 bytes failed");
  }
}
