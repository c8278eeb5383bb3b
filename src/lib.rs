// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    AppState, BatchReport, DisplayHandle, EntryId, ImageEntry, ImageRegistry, OptimizationResult,
    OptimizerConfig, RawFile, RegistryEvent,
};
pub use crate::processing::{BatchExecutor, Encoder, JpegReencoder};
pub use crate::utils::{OptimizerError, OptimizerResult};
pub use crate::commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The command-line entry point is in main.rs.
