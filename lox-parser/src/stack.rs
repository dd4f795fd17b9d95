// Stack growth for the recursive passes
// Parser, resolver and evaluator all recurse once per nesting level of the
// script; wrapping each level keeps the host stack from overflowing before
// the interpreter's own call-depth limit is reached.

/// Grow the stack when less than this much remains
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a fresh stack segment if the current one is nearly exhausted
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    f()
}
