//! Driver configuration

use std::time::Duration;

use huskylens_core::constants::{retries, timing};

/// Delays and retry bounds
///
/// Defaults are the firmware's settling times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait after every command write
    pub after_write: Duration,

    /// Wait between a V2 result request and its info frame
    pub v2_initial: Duration,

    /// Wait before each V2 result frame
    pub v2_between: Duration,

    /// Wait after each unsuccessful V1 knock read
    pub knock_retry_v1: Duration,

    /// Wait between V2 knock rounds
    pub knock_retry_v2: Duration,

    /// 3-byte windows inspected while looking for a V1 header
    pub header_sync_attempts: usize,

    /// Frame reads while waiting for a V1 knock acknowledgement
    pub knock_attempts_v1: usize,

    /// Knock rounds for V2
    pub knock_attempts_v2: usize,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            after_write: timing::AFTER_WRITE,
            v2_initial: timing::V2_INITIAL,
            v2_between: timing::V2_BETWEEN,
            knock_retry_v1: timing::KNOCK_RETRY_V1,
            knock_retry_v2: timing::KNOCK_RETRY_V2,
            header_sync_attempts: retries::HEADER_SYNC,
            knock_attempts_v1: retries::KNOCK_V1,
            knock_attempts_v2: retries::KNOCK_V2,
        }
    }
}

impl Timing {
    pub fn with_after_write(mut self, delay: Duration) -> Self {
        self.after_write = delay;
        self
    }

    pub fn with_v2_initial(mut self, delay: Duration) -> Self {
        self.v2_initial = delay;
        self
    }

    pub fn with_v2_between(mut self, delay: Duration) -> Self {
        self.v2_between = delay;
        self
    }

    pub fn with_knock_retry_v1(mut self, delay: Duration) -> Self {
        self.knock_retry_v1 = delay;
        self
    }

    pub fn with_knock_retry_v2(mut self, delay: Duration) -> Self {
        self.knock_retry_v2 = delay;
        self
    }

    pub fn with_header_sync_attempts(mut self, attempts: usize) -> Self {
        self.header_sync_attempts = attempts;
        self
    }

    pub fn with_knock_attempts_v1(mut self, attempts: usize) -> Self {
        self.knock_attempts_v1 = attempts;
        self
    }

    pub fn with_knock_attempts_v2(mut self, attempts: usize) -> Self {
        self.knock_attempts_v2 = attempts;
        self
    }
}

/// Driver configuration
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use huskylens::{Config, Timing};
///
/// let config = Config::default()
///     .with_timing(Timing::default().with_after_write(Duration::from_millis(10)))
///     .with_verify_v2_checksum(true);
///
/// assert!(config.verify_v2_checksum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub timing: Timing,

    /// Drop V2 responses whose checksum does not match (off by default)
    pub verify_v2_checksum: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set delays and retry bounds
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Enable checksum verification of V2 responses
    pub fn with_verify_v2_checksum(mut self, verify: bool) -> Self {
        self.verify_v2_checksum = verify;
        self
    }
}
