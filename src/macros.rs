/// Writes `value` into the free slot at the back. Capacity must already allow
/// one more element without reaching `len == capacity`.
macro_rules! push_back_unchecked {
  ($this:ident($value:ident)) => {{
    debug_assert!($this.len + 1 < $this.capacity());
    let slot = $this.to_physical_idx($this.len);
    $this.len += 1;
    // SAFETY: `slot` is in bounds and outside the live region.
    $this.buf.construct_at(slot, $value)
  }};
}

/// Writes `value` into the free slot just before the head. Capacity must
/// already allow one more element without reaching `len == capacity`.
macro_rules! push_front_unchecked {
  ($this:ident($value:ident)) => {{
    debug_assert!($this.len + 1 < $this.capacity());
    $this.head = $this.wrap_sub($this.head, 1);
    $this.len += 1;
    // SAFETY: the new head slot is in bounds and was outside the live region.
    $this.buf.construct_at($this.head, $value)
  }};
}

/// Forwards to `tracing` when the `tracing` feature is on, and expands to
/// nothing otherwise.
macro_rules! trace_event {
  ($level:ident, $($arg:tt)+) => {{
    #[cfg(feature = "tracing")]
    {
      tracing::$level!(target: "circular_deque", $($arg)+);
    }
  }};
}

pub(super) use push_back_unchecked;
pub(super) use push_front_unchecked;
pub(super) use trace_event;
