use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(90);

/// How long to wait for the emulator to answer the liveness probe
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Size of a single wire report, both over UDP and USB
pub const REPORT_SIZE: usize = 64;

/// Largest payload accepted in either direction
pub const MAX_MESSAGE_SIZE: usize = 1 << 20;

pub const DEFAULT_EMULATOR_ADDR: &str = "127.0.0.1:21324";
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:21325";

/// The bridge refuses requests without an allowed origin
pub const BRIDGE_ORIGIN: &str = "https://python.trezor.io";
