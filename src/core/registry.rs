//! Ordered collection of tracked images.
//!
//! The registry is the only owner of display handles: it creates a preview
//! handle for every added file, swaps optimized handles when an encode
//! succeeds, and releases every handle of an entry when it is removed or the
//! collection is cleared.

use std::collections::{HashMap, HashSet};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::core::{
    BatchReport, DisplayHandle, Download, EncodeOutcome, EntryId, HandleData, HandleStore,
    ImageEntry, OptimizationResult, OptimizeJob, OptimizeTask, OptimizedImage, RawFile,
};
use crate::processing::BatchExecutor;
use crate::utils::{
    OptimizerResult, is_image_media_type, optimized_file_name, unique_file_name, validate_quality,
};

const EVENT_CAPACITY: usize = 64;

/// Change notifications for views that mirror the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Added(Vec<EntryId>),
    Removed(EntryId),
    Optimized(EntryId),
    OptimizeFailed { id: EntryId, error: String },
    Cleared { count: usize },
}

pub struct ImageRegistry {
    entries: Vec<ImageEntry>,
    handles: HandleStore,
    events: broadcast::Sender<RegistryEvent>,
    next_generation: u64,
}

impl ImageRegistry {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: Vec::new(),
            handles: HandleStore::new(),
            events,
            next_generation: 1,
        }
    }

    /// Subscribes to collection changes.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Appends one entry per image file, in input order.
    ///
    /// Files whose media type is not `image/*` are skipped without error.
    pub fn add(&mut self, files: impl IntoIterator<Item = RawFile>) -> Vec<EntryId> {
        let mut added = Vec::new();

        for file in files {
            if !is_image_media_type(file.media_type()) {
                debug!("Skipping {} ({})", file.name(), file.media_type());
                continue;
            }

            let id = EntryId::generate();
            let preview = self.handles.create(file.media_type(), file.shared_bytes());
            debug!("Added {} as {} ({} bytes)", file.name(), id, file.size());

            self.entries.push(ImageEntry {
                id,
                source: file,
                preview,
                optimized: None,
                last_error: None,
                applied_generation: 0,
            });
            added.push(id);
        }

        if !added.is_empty() {
            self.notify(RegistryEvent::Added(added.clone()));
        }
        added
    }

    /// Removes an entry and releases its handles. Unknown ids are a no-op.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("Remove of unknown entry {} ignored", id);
            return false;
        };

        let entry = self.entries.remove(index);
        self.release_entry(entry);
        self.notify(RegistryEvent::Removed(id));
        true
    }

    /// Releases every handle and empties the collection.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        if count == 0 {
            return 0;
        }

        for entry in std::mem::take(&mut self.entries) {
            self.release_entry(entry);
        }

        info!("Cleared {} images", count);
        self.notify(RegistryEvent::Cleared { count });
        count
    }

    /// Encodes every entry at `quality` and applies the results.
    ///
    /// A failed entry keeps its previous optimized result; other entries are
    /// unaffected.
    pub async fn optimize_all(
        &mut self,
        quality: u32,
        executor: &BatchExecutor,
    ) -> OptimizerResult<BatchReport> {
        let job = self.begin_optimize(quality)?;
        let outcomes = executor.execute(job).await;
        Ok(self.commit(outcomes))
    }

    /// Snapshots the current entries into an encode job.
    ///
    /// Every job gets a generation higher than all jobs begun before it.
    pub fn begin_optimize(&mut self, quality: u32) -> OptimizerResult<OptimizeJob> {
        let quality = validate_quality(quality)?;
        let generation = self.next_generation;
        self.next_generation += 1;

        let tasks = self
            .entries
            .iter()
            .map(|entry| OptimizeTask {
                id: entry.id,
                source: entry.source.clone(),
                quality,
            })
            .collect();

        Ok(OptimizeJob::new(generation, tasks))
    }

    /// Applies settled encode outcomes.
    ///
    /// Outcomes for entries that no longer exist are discarded before any
    /// handle is created for them. Outcomes from a job older than the newest
    /// one already applied to their entry are dropped, so overlapping runs
    /// leave each entry with the result of the run begun last.
    pub fn commit(&mut self, outcomes: Vec<EncodeOutcome>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut by_id: HashMap<EntryId, EncodeOutcome> =
            outcomes.into_iter().map(|o| (o.id, o)).collect();

        for index in 0..self.entries.len() {
            let id = self.entries[index].id;
            let Some(outcome) = by_id.remove(&id) else {
                continue;
            };

            if outcome.generation < self.entries[index].applied_generation {
                debug!(
                    "Dropping result of run {} for {}: run {} already applied",
                    outcome.generation, id, self.entries[index].applied_generation
                );
                report.superseded += 1;
                continue;
            }
            self.entries[index].applied_generation = outcome.generation;

            match outcome.result {
                Ok(encoded) => {
                    let entry = &mut self.entries[index];
                    if let Some(previous) = entry.optimized.take() {
                        self.handles.release(&previous.handle);
                    }

                    let bytes = encoded.shared_bytes();
                    let handle = self.handles.create(encoded.media_type(), bytes.clone());
                    entry.optimized = Some(OptimizedImage { bytes, handle });
                    entry.last_error = None;

                    report.results.push(OptimizationResult::succeeded(
                        id,
                        entry.source.name(),
                        entry.source.size(),
                        encoded.size(),
                    ));
                    self.notify(RegistryEvent::Optimized(id));
                }
                Err(err) => {
                    let entry = &mut self.entries[index];
                    let error = err.to_string();
                    warn!("Optimization failed for {}: {}", entry.source.name(), error);
                    entry.last_error = Some(error.clone());

                    report.results.push(OptimizationResult::failed(
                        id,
                        entry.source.name(),
                        entry.source.size(),
                        error.clone(),
                    ));
                    self.notify(RegistryEvent::OptimizeFailed { id, error });
                }
            }
        }

        report.discarded = by_id.len();
        if report.discarded > 0 {
            debug!("Discarded {} results for removed entries", report.discarded);
        }

        info!(
            "Optimize run committed: {} succeeded, {} failed, {} discarded, {} superseded",
            report.succeeded(),
            report.failed(),
            report.discarded,
            report.superseded
        );
        report
    }

    /// File to save for one optimized entry.
    pub fn download(&self, id: EntryId, prefix: &str) -> Option<Download> {
        self.get(id).and_then(|entry| self.download_for(entry, prefix))
    }

    /// Files to save for every optimized entry, in collection order.
    ///
    /// Entries whose saved names would collide get ` (n)` before the
    /// extension, so every entry maps to its own file.
    pub fn downloads(&self, prefix: &str) -> Vec<Download> {
        let mut taken = HashSet::new();
        self.entries
            .iter()
            .filter_map(|entry| self.download_for(entry, prefix))
            .map(|mut download| {
                download.file_name = unique_file_name(&download.file_name, &taken);
                taken.insert(download.file_name.clone());
                download
            })
            .collect()
    }

    fn download_for(&self, entry: &ImageEntry, prefix: &str) -> Option<Download> {
        let optimized = entry.optimized.as_ref()?;
        let data = self.handles.resolve(&optimized.handle)?;
        Some(Download {
            file_name: optimized_file_name(prefix, entry.source.name()),
            media_type: data.media_type.clone(),
            bytes: data.bytes.clone(),
        })
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry has an optimized result to download.
    pub fn has_optimized(&self) -> bool {
        self.entries.iter().any(|e| e.optimized.is_some())
    }

    /// Resolves a handle for rendering. Released handles resolve to `None`.
    pub fn resolve(&self, handle: &DisplayHandle) -> Option<&HandleData> {
        self.handles.resolve(handle)
    }

    /// Number of handles currently alive.
    pub fn live_handles(&self) -> usize {
        self.handles.live_count()
    }

    pub fn handle_store(&self) -> &HandleStore {
        &self.handles
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn release_entry(&mut self, entry: ImageEntry) {
        self.handles.release(&entry.preview);
        if let Some(optimized) = entry.optimized {
            self.handles.release(&optimized.handle);
        }
        debug!("Released handles of {}", entry.id);
    }

    fn notify(&self, event: RegistryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for ImageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ImageRegistry {
    fn drop(&mut self) {
        for entry in std::mem::take(&mut self.entries) {
            self.release_entry(entry);
        }
    }
}
