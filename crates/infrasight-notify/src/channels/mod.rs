pub mod email;
pub mod webhook;

use std::time::Duration;

/// Delivery attempts per alert before a channel gives up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Exponential backoff between attempts: 100ms, 200ms, ...
pub(crate) fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2u64.pow(attempt))
}
