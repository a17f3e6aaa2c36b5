//! Step definitions for review reminder scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
