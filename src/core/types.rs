//! Core types for image intake, encoding outcomes and reports.

use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use crate::utils::savings_percent;
use super::EntryId;

/// An image file as handed over by the host: name, declared media type and content.
///
/// The content is reference counted so snapshots taken for encoding never copy it.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFile {
    name: String,
    media_type: String,
    data: Arc<[u8]>,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for RawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Output of one successful encode.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
    media_type: &'static str,
    width: u32,
    height: u32,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, media_type: &'static str, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            media_type,
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Result of optimizing one entry.
///
/// Contains the original and optimized sizes along with compression statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Entry the result belongs to
    pub id: EntryId,
    /// Original file name
    pub file_name: String,
    /// Original file size in bytes
    pub original_size: u64,
    /// Optimized size in bytes, 0 when the encode failed
    pub optimized_size: u64,
    /// Whether the optimization succeeded
    pub success: bool,
    /// Error message if optimization failed
    pub error: Option<String>,
    /// Bytes saved (negative if the file grew)
    pub saved_bytes: i64,
    /// Rounded percentage saved
    pub compression_ratio: i64,
}

impl OptimizationResult {
    pub fn succeeded(id: EntryId, file_name: &str, original_size: u64, optimized_size: u64) -> Self {
        Self {
            id,
            file_name: file_name.to_string(),
            original_size,
            optimized_size,
            success: true,
            error: None,
            saved_bytes: original_size as i64 - optimized_size as i64,
            compression_ratio: savings_percent(original_size, Some(optimized_size)),
        }
    }

    pub fn failed(id: EntryId, file_name: &str, original_size: u64, error: String) -> Self {
        Self {
            id,
            file_name: file_name.to_string(),
            original_size,
            optimized_size: 0,
            success: false,
            error: Some(error),
            saved_bytes: 0,
            compression_ratio: 0,
        }
    }
}

/// Summary of an optimize-all run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// One result per entry that still existed when the run was committed, in collection order
    pub results: Vec<OptimizationResult>,
    /// Outcomes dropped because their entry was removed while encoding
    pub discarded: usize,
    /// Outcomes dropped because a later run already settled their entry
    pub superseded: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// A file ready to be saved for an optimized entry.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}
