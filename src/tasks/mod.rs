//! Background Tasks Module
//!
//! # Tasks
//! - TTL Reaper: removes expired entries at the configured interval

mod reaper;

pub use reaper::{Reaper, ReaperContext};
