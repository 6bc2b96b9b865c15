//! Worker implementations for the pipeline loops.

pub mod base;
pub mod consumer;
pub mod producer;
