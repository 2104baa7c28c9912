//! Wall clock for token timestamps.
//!
//! Token claims store whole seconds since the epoch. [`now`] reads the clock
//! on native and `wasm32` targets alike and [`unix_seconds`] converts to the
//! claim representation.

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The current time.
#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> SystemTime {
    SystemTime::now()
}

/// The current time, read through `web-time` in the browser.
#[cfg(target_arch = "wasm32")]
pub fn now() -> SystemTime {
    use web_time::web::SystemTimeExt;
    web_time::SystemTime::now().to_std()
}

/// Whole seconds since the UNIX epoch. Times before the epoch clamp to zero.
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
