//! # Coulisses Core
//!
//! The domain layer of the Coulisses site backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the fixed-window rate limiting rules, contact and newsletter validation,
//! and the ports that infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
