//! Unit tests for the review module.
//!
//! Tests are organised by concern: the forgetting curve, domain value types,
//! the task state machine, lifecycle orchestration and timer scheduling.
