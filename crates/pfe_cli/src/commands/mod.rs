//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod benchmark;
pub mod classical;
pub mod compare;
pub mod profile;
pub mod quantum;
