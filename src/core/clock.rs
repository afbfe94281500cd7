//! Wall-clock timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch (0 if the clock is before the epoch).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(a > 1_600_000_000_000);
        assert!(b >= a);
    }
}
