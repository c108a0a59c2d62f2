//! # Coulisses Shared
//!
//! Request and response types of the public site API.
//! Kept free of server dependencies so the front-end can share them.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
