//! Boundary-facing hooks fired by the pipeline core.
//!
//! The core reports what happened (an item produced, consumed, processed,
//! the run cancelled or finished) and stays agnostic about what the host
//! does with it. The binary attaches [`LogObserver`]; tests attach
//! [`MemoryObserver`] and assert on the recorded calls.

mod base;
mod log;
mod memory;

pub use base::*;
pub use log::*;
pub use memory::*;
