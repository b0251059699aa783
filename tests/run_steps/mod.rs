//! Step definitions for run execution scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
