//! Middleware modules.

pub mod error;

#[cfg(feature = "throttle")]
pub mod throttle;
