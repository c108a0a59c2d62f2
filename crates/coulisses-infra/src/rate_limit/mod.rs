//! Rate limiting implementations.

mod memory;

pub use memory::InMemoryRateLimiter;

#[cfg(feature = "throttle")]
mod throttle;
#[cfg(feature = "throttle")]
pub use throttle::{RequestThrottle, ThrottleConfig};
