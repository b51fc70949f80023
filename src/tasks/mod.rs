//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Periodic sweep: removes expired cache files even when no writes arrive

mod sweep;

pub use sweep::spawn_sweep_task;
