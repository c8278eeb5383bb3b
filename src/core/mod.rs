//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`ImageRegistry`]: Ordered collection of tracked images and owner of their handles
//! - [`HandleStore`]: Releasable display references for image bytes
//! - [`AppState`]: Lock-protected registry plus executor shared with the host
//! - [`OptimizationResult`]: Result of optimizing one entry
//! - [`Progress`]: Progress tracking for optimize-all runs

mod config;
mod entry;
mod handle;
mod progress;
mod registry;
mod state;
mod task;
mod types;

pub use config::{OptimizerConfig, DEFAULT_QUALITY, QUALITY_ENV, OUTPUT_DIR_ENV};
pub use entry::{EntryId, EntrySummary, ImageEntry, OptimizedImage};
pub use handle::{DisplayHandle, HandleData, HandleStore};
pub use progress::{Progress, ProgressType};
pub use registry::{ImageRegistry, RegistryEvent};
pub use state::AppState;
pub use task::{EncodeOutcome, OptimizeJob, OptimizeTask};
pub use types::{BatchReport, Download, EncodedImage, OptimizationResult, RawFile};
