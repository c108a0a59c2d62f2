//! Repository implementations - hosted backend and in-memory fallback.

mod memory;

pub use memory::{InMemoryContactRepository, InMemoryNewsletterRepository};

#[cfg(feature = "remote")]
mod rest;
#[cfg(feature = "remote")]
pub use rest::{BackendConfig, RestBackend, RestContactRepository, RestNewsletterRepository};
