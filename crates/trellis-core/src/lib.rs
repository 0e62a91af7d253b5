//! Trellis Core
//!
//! Shared infrastructure for the Trellis attribute system: hash collections,
//! the generational arena backing widget handles, logging and profiling.

pub mod alloc;
pub mod logging;
pub mod profiling;
