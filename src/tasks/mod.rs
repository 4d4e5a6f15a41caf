//! Background Tasks Module
//!
//! Periodic housekeeping that runs alongside the server.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
