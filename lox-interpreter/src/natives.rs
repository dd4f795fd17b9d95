//! Native functions predefined in the global environment.

use crate::callable::Callable;
use crate::value::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Every native, as (global name, callable)
pub fn all() -> Vec<(&'static str, Callable)> {
    vec![("clock", Callable::native("clock", 0, clock))]
}

/// Seconds since the Unix epoch
fn clock(_args: &[Value]) -> Result<Value, String> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("system clock is before the Unix epoch: {e}"))?;
    Ok(Value::Number(elapsed.as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_positive_and_monotonic_enough() {
        let first = clock(&[]).ok().and_then(|v| v.as_number()).unwrap_or(-1.0);
        let second = clock(&[]).ok().and_then(|v| v.as_number()).unwrap_or(-1.0);

        assert!(first > 0.0);
        assert!(second >= first);
    }

    #[test]
    fn test_natives_are_zero_arity_callables() {
        let natives = all();
        assert_eq!(natives.len(), 1);
        assert_eq!(natives[0].0, "clock");
        assert_eq!(natives[0].1.arity(), 0);
        assert_eq!(natives[0].1.to_string(), "<native fn clock>");
    }
}
