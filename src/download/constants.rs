//! Constants for the download module (timeouts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read idle timeout (5 minutes without receiving any bytes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Largest accepted timeout value in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;
