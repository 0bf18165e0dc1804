//! Backoff schedule shared by the HTTP clients.

/// Delay before retry number `attempt` (1-based): `base_ms * 2^(attempt-1)`
///
/// Saturates instead of overflowing for large bases or attempt counts.
pub fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor)
}
