//! Background maintenance.

mod scheduler;

pub use scheduler::{Scheduler, register_rate_limit_sweep};
