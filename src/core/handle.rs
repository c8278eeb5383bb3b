//! Releasable display references for in-memory image bytes.
//!
//! A [`DisplayHandle`] plays the role of a browser object URL: an opaque
//! `blob:` reference that a view can render from until it is released. The
//! [`HandleStore`] owns the bytes behind every live handle and enforces that
//! each handle is released at most once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

const HANDLE_SCHEME: &str = "blob:image-optimizer/";

/// Opaque reference to image bytes held by a [`HandleStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DisplayHandle(String);

impl DisplayHandle {
    fn generate() -> Self {
        Self(format!("{HANDLE_SCHEME}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content behind a live handle.
#[derive(Debug, Clone)]
pub struct HandleData {
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// Owner of every live display handle.
#[derive(Debug, Default)]
pub struct HandleStore {
    live: HashMap<DisplayHandle, HandleData>,
    created: u64,
    released: u64,
}

impl HandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh handle for `bytes`.
    pub fn create(&mut self, media_type: &str, bytes: Arc<[u8]>) -> DisplayHandle {
        let handle = DisplayHandle::generate();
        self.live.insert(
            handle.clone(),
            HandleData {
                media_type: media_type.to_string(),
                bytes,
            },
        );
        self.created += 1;
        handle
    }

    /// Looks up a live handle. Released or foreign handles resolve to `None`.
    pub fn resolve(&self, handle: &DisplayHandle) -> Option<&HandleData> {
        self.live.get(handle)
    }

    /// Releases a handle and drops its bytes.
    ///
    /// Returns `false` when the handle was not live, which means a double
    /// release or a handle from another store.
    pub fn release(&mut self, handle: &DisplayHandle) -> bool {
        match self.live.remove(handle) {
            Some(_) => {
                self.released += 1;
                debug!("Released {}", handle);
                true
            }
            None => {
                warn!("Release of unknown display handle {}", handle);
                false
            }
        }
    }

    pub fn is_live(&self, handle: &DisplayHandle) -> bool {
        self.live.contains_key(handle)
    }

    /// Number of handles created and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}
