//! Background Tasks Module
//!
//! # Tasks
//! - Purge: removes expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_purge_task;
