//! Library side of the heapscope driver: settings, logging and the batch loop.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
