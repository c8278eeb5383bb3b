//! A tracked image and its optimization state.

use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use uuid::Uuid;
use crate::core::{DisplayHandle, RawFile};

/// Opaque identifier of an entry, stable for the entry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Encoded bytes together with the handle that displays them.
///
/// Kept as one value so the bytes and the handle are always replaced together.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub(crate) bytes: Arc<[u8]>,
    pub(crate) handle: DisplayHandle,
}

impl OptimizedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn handle(&self) -> &DisplayHandle {
        &self.handle
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// One image tracked by the registry.
#[derive(Debug)]
pub struct ImageEntry {
    pub(crate) id: EntryId,
    pub(crate) source: RawFile,
    pub(crate) preview: DisplayHandle,
    pub(crate) optimized: Option<OptimizedImage>,
    pub(crate) last_error: Option<String>,
    /// Generation of the newest optimize run applied to this entry; 0 before any.
    pub(crate) applied_generation: u64,
}

impl ImageEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn source(&self) -> &RawFile {
        &self.source
    }

    pub fn file_name(&self) -> &str {
        self.source.name()
    }

    /// Handle for the original image.
    pub fn preview(&self) -> &DisplayHandle {
        &self.preview
    }

    pub fn optimized(&self) -> Option<&OptimizedImage> {
        self.optimized.as_ref()
    }

    /// Handle a view should render: the optimized image when there is one.
    pub fn display_handle(&self) -> &DisplayHandle {
        self.optimized
            .as_ref()
            .map(|o| &o.handle)
            .unwrap_or(&self.preview)
    }

    pub fn original_size(&self) -> u64 {
        self.source.size()
    }

    pub fn optimized_size(&self) -> Option<u64> {
        self.optimized.as_ref().map(OptimizedImage::size)
    }

    /// Error from the most recent optimize run, if it failed for this entry.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            file_name: self.source.name().to_string(),
            media_type: self.source.media_type().to_string(),
            original_size: self.original_size(),
            optimized_size: self.optimized_size(),
            preview: self.preview.clone(),
            optimized: self.optimized.as_ref().map(|o| o.handle.clone()),
            last_error: self.last_error.clone(),
        }
    }
}

/// Serializable read model of an entry for view layers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: EntryId,
    pub file_name: String,
    pub media_type: String,
    pub original_size: u64,
    pub optimized_size: Option<u64>,
    pub preview: DisplayHandle,
    pub optimized: Option<DisplayHandle>,
    pub last_error: Option<String>,
}
