/// Remaining stack below which a fresh segment is allocated.
const RED_ZONE: usize = 100 * 1024;
/// Size of each freshly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first growing the stack when less than the red zone is left.
///
/// Every recursive entry point of the parser and the evaluator goes through
/// here, so deeply nested source cannot overflow the host stack.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> usize {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn deep_recursion_completes() {
        assert_eq!(depth(200_000), 200_000);
    }
}
