//! # System Interaction Layer
//!
//! The boundary between option resolution and the code that acts on it.
//!
//! - **`executor`**: the `CommandExecutor` seam and the reporting executor
//!   shipped with the binary.

pub mod executor;
