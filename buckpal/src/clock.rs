//! Source of the current time for use cases.

use crate::types::Timestamp;

/// Supplies "now" to the services.
///
/// Production code uses [`SystemClock`]; tests inject a fixed clock so
/// activity timestamps and baseline dates are deterministic.
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
