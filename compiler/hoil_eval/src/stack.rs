//! Stack headroom for HOIL function calls.
//!
//! One HOIL call costs several Rust frames (call, block, node, expression,
//! nested calls inside the expression). Before each call we check how much of
//! the current stack segment is left and switch to a fresh heap-allocated
//! segment when it runs low, so a deep HOIL recursion ends in a HOIL error or
//! completes instead of overflowing the native stack.

/// Switch segments when less than this is left.
const MIN_HEADROOM: usize = 96 * 1024;

/// Size of each new segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f` with at least [`MIN_HEADROOM`] bytes of stack available.
///
/// On targets where the remaining stack cannot be measured `f` runs on the
/// current stack.
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    match stacker::remaining_stack() {
        Some(left) if left < MIN_HEADROOM => {
            tracing::trace!(left, segment = SEGMENT_SIZE, "switching to a new stack segment");
            stacker::grow(SEGMENT_SIZE, f)
        }
        _ => f(),
    }
}
