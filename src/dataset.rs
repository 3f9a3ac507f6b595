//! The dataset index: every image record, every per-image tag list, and
//! the global tag aggregate derived from them.
//!
//! All aggregate mutation lives here. Single-tag operations keep the
//! counts incrementally; the bulk operations and anything else where
//! incremental bookkeeping would be error-prone fall back to
//! [`rebuild_aggregate`](DatasetIndex::rebuild_aggregate), a full recount.

use std::path::{Path, PathBuf};

use crossbeam::channel;
use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::DatasetError;
use crate::storage;

/// Tag identity for aggregation: case-insensitive, whitespace-trimmed.
/// Display text stays case-preserving; only grouping goes through here.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// One image of the dataset: its absolute path, its display name relative
/// to the dataset root, and its ordered, case-preserving tag list.
///
/// `baseline` snapshots the tag values at load/save time; the image is
/// dirty while its current tag set differs from the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    path: PathBuf,
    name: String,
    tags: Vec<String>,
    #[serde(skip)]
    baseline: HashSet<String>,
}

impl ImageRecord {
    fn new(path: PathBuf, name: String, tags: Vec<String>) -> Self {
        let baseline = tags.iter().cloned().collect();
        Self { path, name, tags, baseline }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the image carries at least one tag with the given
    /// normalized identity.
    pub fn has_tag_key(&self, key: &str) -> bool {
        self.tags.iter().any(|tag| normalize(tag) == key)
    }

    pub fn is_dirty(&self) -> bool {
        let current: HashSet<String> = self.tags.iter().cloned().collect();
        current != self.baseline
    }

    fn mark_saved(&mut self) {
        self.baseline = self.tags.iter().cloned().collect();
    }
}

/// Aggregate entry for one normalized tag: the display variant and the
/// number of images carrying at least one matching tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTag {
    pub key: String,
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub image_count: usize,
    pub tag_count: usize,
    pub failed_reads: usize,
}

#[derive(Debug, Clone)]
pub struct SaveFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub saved: usize,
    pub failures: Vec<SaveFailure>,
}

struct SidecarRead {
    idx: usize,
    tags: Vec<String>,
    failed: bool,
}

/// The single source of truth: owns the image records and the global tag
/// aggregate, and is the only module allowed to touch the counts.
#[derive(Default)]
pub struct DatasetIndex {
    root: Option<PathBuf>,
    images: Vec<ImageRecord>,
    aggregate: HashMap<String, GlobalTag>,
    saving: bool,
}

impl DatasetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn image(&self, image_idx: usize) -> Option<&ImageRecord> {
        self.images.get(image_idx)
    }

    pub fn global_tags(&self) -> impl Iterator<Item = &GlobalTag> {
        self.aggregate.values()
    }

    pub fn global_tag(&self, key: &str) -> Option<&GlobalTag> {
        self.aggregate.get(key)
    }

    pub fn any_dirty(&self) -> bool {
        self.images.iter().any(ImageRecord::is_dirty)
    }

    /// Replace all state with the dataset under `root`.
    ///
    /// Sidecar reads fan out one rayon task per image and the operation
    /// joins before anything becomes visible; completion order does not
    /// matter because the aggregate is grouped from the complete set
    /// afterwards. An unreadable sidecar degrades to "no tags" and is
    /// counted in the summary; a bad root aborts and leaves any
    /// previously loaded dataset untouched.
    pub fn load(&mut self, root: &Path) -> Result<LoadSummary, DatasetError> {
        if self.saving {
            return Err(DatasetError::SaveInProgress);
        }

        let files = storage::enumerate_images(root)?;
        info!("loading {} images from {}", files.len(), root.display());

        let (tx, rx) = channel::unbounded();
        files.par_iter().enumerate().for_each_with(tx, |tx, (idx, path)| {
            let read = match storage::load_tags(path) {
                Ok(tags) => SidecarRead { idx, tags, failed: false },
                Err(err) => {
                    warn!("treating {} as untagged, sidecar read failed: {}", path.display(), err);
                    SidecarRead { idx, tags: Vec::new(), failed: true }
                }
            };
            let _ = tx.send(read);
        });

        // The fan-out has joined and every sender is gone; drain the
        // channel and slot results back into enumeration order.
        let mut tags_by_idx: Vec<Option<Vec<String>>> = vec![None; files.len()];
        let mut failed_reads = 0;
        while let Ok(read) = rx.try_recv() {
            if read.failed {
                failed_reads += 1;
            }
            tags_by_idx[read.idx] = Some(read.tags);
        }

        let root = root.to_path_buf();
        self.images = files
            .into_iter()
            .zip(tags_by_idx)
            .map(|(path, tags)| {
                let name = path
                    .strip_prefix(&root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .into_owned();
                ImageRecord::new(path, name, tags.unwrap_or_default())
            })
            .collect();
        self.root = Some(root);
        self.rebuild_aggregate();

        let summary = LoadSummary {
            image_count: self.images.len(),
            tag_count: self.aggregate.len(),
            failed_reads,
        };
        info!(
            "dataset loaded: {} images, {} distinct tags, {} failed sidecar reads",
            summary.image_count, summary.tag_count, summary.failed_reads
        );
        Ok(summary)
    }

    /// Drop all state. Rejected while a save is outstanding.
    pub fn close(&mut self) -> Result<(), DatasetError> {
        if self.saving {
            return Err(DatasetError::SaveInProgress);
        }
        self.root = None;
        self.images.clear();
        self.aggregate.clear();
        Ok(())
    }

    /// Append a tag to an image. Refused while the image still has a
    /// blank tag pending edit, so at most one blank row exists at a time.
    pub fn add_tag(&mut self, image_idx: usize, text: &str) -> bool {
        match self.images.get_mut(image_idx) {
            Some(image) => {
                if image.tags.iter().any(|tag| is_blank(tag)) {
                    return false;
                }
                image.tags.push(text.to_string());
            }
            None => return false,
        }
        self.note_tag_added(image_idx, text);
        true
    }

    /// Remove one tag by position, returning its value.
    pub fn remove_tag(&mut self, image_idx: usize, tag_idx: usize) -> Option<String> {
        let removed = {
            let image = self.images.get_mut(image_idx)?;
            if tag_idx >= image.tags.len() {
                return None;
            }
            image.tags.remove(tag_idx)
        };
        self.note_tag_removed(image_idx, &removed);
        Some(removed)
    }

    /// Change a tag's text in place, keeping its list position. For the
    /// aggregate this is remove-old plus add-new; a rename within the
    /// same normalized identity leaves the counts alone.
    pub fn rename_tag(&mut self, image_idx: usize, tag_idx: usize, new_text: &str) -> bool {
        let old = {
            let Some(image) = self.images.get_mut(image_idx) else {
                return false;
            };
            let Some(slot) = image.tags.get_mut(tag_idx) else {
                return false;
            };
            std::mem::replace(slot, new_text.to_string())
        };
        if normalize(&old) != normalize(new_text) {
            self.note_tag_removed(image_idx, &old);
            self.note_tag_added(image_idx, new_text);
        }
        true
    }

    /// Swap a tag with its neighbor. Boundary moves are no-ops; the
    /// aggregate never changes.
    pub fn move_tag(&mut self, image_idx: usize, tag_idx: usize, direction: MoveDirection) -> bool {
        let Some(image) = self.images.get_mut(image_idx) else {
            return false;
        };
        if tag_idx >= image.tags.len() {
            return false;
        }
        let target = match direction {
            MoveDirection::Up if tag_idx > 0 => tag_idx - 1,
            MoveDirection::Down if tag_idx + 1 < image.tags.len() => tag_idx + 1,
            _ => return false,
        };
        image.tags.swap(tag_idx, target);
        true
    }

    /// Append `text` to every image that does not already carry it
    /// (case-insensitively). Returns the number of images changed.
    pub fn apply_tag_to_all(&mut self, text: &str) -> usize {
        if is_blank(text) {
            return 0;
        }
        let key = normalize(text);
        let mut changed = 0;
        for image in &mut self.images {
            if !image.has_tag_key(&key) {
                image.tags.push(text.to_string());
                changed += 1;
            }
        }
        if changed > 0 {
            self.rebuild_aggregate();
        }
        info!("applied tag '{}' to {} images", text, changed);
        changed
    }

    /// Drop every case-insensitive match of `text` from every image.
    /// Returns the number of images changed.
    pub fn remove_tag_from_all(&mut self, text: &str) -> usize {
        let key = normalize(text);
        let mut changed = 0;
        for image in &mut self.images {
            let before = image.tags.len();
            image.tags.retain(|tag| normalize(tag) != key);
            if image.tags.len() != before {
                changed += 1;
            }
        }
        if changed > 0 {
            self.rebuild_aggregate();
        }
        info!("removed tag '{}' from {} images", text, changed);
        changed
    }

    /// Remove exact-duplicate tag values from one image, keeping first
    /// occurrences. Duplicates never affected the aggregate, so no
    /// recount is needed.
    pub fn dedup_tags(&mut self, image_idx: usize) -> usize {
        let Some(image) = self.images.get_mut(image_idx) else {
            return 0;
        };
        let before = image.tags.len();
        let mut seen = HashSet::new();
        image.tags.retain(|tag| seen.insert(tag.clone()));
        before - image.tags.len()
    }

    pub fn dedup_tags_all(&mut self) -> usize {
        (0..self.images.len()).map(|idx| self.dedup_tags(idx)).sum()
    }

    /// Sort one image's tag list. List order is presentation state, so
    /// the aggregate is untouched.
    pub fn sort_tags(&mut self, image_idx: usize, order: TagSortOrder) {
        let Some(image) = self.images.get_mut(image_idx) else {
            return;
        };
        match order {
            TagSortOrder::Ascending => image.tags.sort(),
            TagSortOrder::Descending => image.tags.sort_by(|a, b| b.cmp(a)),
        }
    }

    /// Recount the aggregate from scratch. Display text is the first
    /// variant encountered in image-enumeration order.
    pub fn rebuild_aggregate(&mut self) {
        let mut aggregate: HashMap<String, GlobalTag> = HashMap::new();
        for image in &self.images {
            let mut seen: HashSet<String> = HashSet::new();
            for tag in &image.tags {
                if is_blank(tag) {
                    continue;
                }
                let key = normalize(tag);
                if !seen.insert(key.clone()) {
                    continue;
                }
                if let Some(entry) = aggregate.get_mut(&key) {
                    entry.count += 1;
                } else {
                    aggregate.insert(
                        key.clone(),
                        GlobalTag { key, text: tag.clone(), count: 1 },
                    );
                }
            }
        }
        debug!("aggregate rebuilt: {} distinct tags", aggregate.len());
        self.aggregate = aggregate;
    }

    /// Write the sidecar of every dirty image, one rayon task per image,
    /// joining before the report is assembled. A failing write is
    /// reported per image and never aborts the rest; successful images
    /// get their baseline snapshot re-captured.
    pub fn save_all(&mut self) -> Result<SaveReport, DatasetError> {
        if self.saving {
            return Err(DatasetError::SaveInProgress);
        }
        self.saving = true;

        let dirty: Vec<(usize, PathBuf, Vec<String>)> = self
            .images
            .iter()
            .enumerate()
            .filter(|(_, image)| image.is_dirty())
            .map(|(idx, image)| (idx, image.path.clone(), image.tags.clone()))
            .collect();

        let failures: Mutex<Vec<(usize, SaveFailure)>> = Mutex::new(Vec::new());
        dirty.par_iter().for_each(|(idx, path, tags)| {
            if let Err(err) = storage::save_tags(path, tags) {
                warn!("failed to write sidecar for {}: {}", path.display(), err);
                failures.lock().push((
                    *idx,
                    SaveFailure { path: path.clone(), error: err.to_string() },
                ));
            }
        });

        let failures = failures.into_inner();
        let failed_indices: HashSet<usize> = failures.iter().map(|(idx, _)| *idx).collect();
        let mut saved = 0;
        for (idx, _, _) in &dirty {
            if !failed_indices.contains(idx) {
                self.images[*idx].mark_saved();
                saved += 1;
            }
        }
        self.saving = false;

        let report = SaveReport {
            saved,
            failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        };
        info!("save-all finished: {} written, {} failed", report.saved, report.failures.len());
        Ok(report)
    }

    /// Record that `text` now exists on the image. Counts move only when
    /// the image crossed the "did not have this tag" boundary; blank
    /// pending edits stay out of the aggregate entirely.
    fn note_tag_added(&mut self, image_idx: usize, text: &str) {
        if is_blank(text) {
            return;
        }
        let key = normalize(text);
        let occurrences = self.images[image_idx]
            .tags
            .iter()
            .filter(|tag| normalize(tag) == key)
            .count();
        if occurrences > 1 {
            return;
        }
        if let Some(entry) = self.aggregate.get_mut(&key) {
            entry.count += 1;
        } else {
            self.aggregate.insert(
                key.clone(),
                GlobalTag { key, text: text.to_string(), count: 1 },
            );
        }
    }

    /// Record that `text` left the image. The count drops only when the
    /// image no longer has any tag with that identity; an entry reaching
    /// zero is deleted. Counts never go negative: in debug builds an
    /// underflow asserts, in release it clamps.
    fn note_tag_removed(&mut self, image_idx: usize, text: &str) {
        if is_blank(text) {
            return;
        }
        let key = normalize(text);
        if self.images[image_idx].has_tag_key(&key) {
            return;
        }
        let Some(entry) = self.aggregate.get_mut(&key) else {
            debug_assert!(false, "aggregate entry missing for removed tag '{}'", key);
            return;
        };
        if entry.count <= 1 {
            debug_assert!(entry.count == 1, "aggregate count underflow for '{}'", key);
            self.aggregate.remove(&key);
        } else {
            entry.count -= 1;
        }
    }
}
