//! The image record store and its JSON sidecar file.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{CropdeskError, Result};
use crate::record::{Crop, ImageRecord, is_image_file};

/// Counts of records by curation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub total: usize,
    pub processed: usize,
    pub approved: usize,
    /// Records with no decision yet.
    pub pending: usize,
}

impl StoreSummary {
    /// Fraction of records that have been processed (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Mapping from filename to [`ImageRecord`], bound to a backing JSON file.
///
/// The backing file is a single JSON object keyed by filename. Keys are kept
/// sorted so the file and listings come out in a stable order.
#[derive(Debug, Clone)]
pub struct ImageDatabase {
    images: BTreeMap<String, ImageRecord>,
    save_path: PathBuf,
}

impl ImageDatabase {
    /// Create an empty store bound to `save_path`. Nothing is read or written.
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            images: BTreeMap::new(),
            save_path: save_path.into(),
        }
    }

    /// Startup sequence for the service.
    ///
    /// Loads the backing file if it exists, discovers new images in
    /// `image_dir`, then saves, so the backing file matches the visible image
    /// set before any request is served.
    pub fn open(save_path: impl Into<PathBuf>, image_dir: impl AsRef<Path>) -> Result<Self> {
        let mut db = Self::new(save_path);
        if db.save_path.is_file() {
            db.load()?;
            info!(path = %db.save_path.display(), records = db.len(), "Loaded image database");
        }

        let added = db.discover(image_dir)?;
        if added > 0 {
            info!(added, "Discovered new images");
        }

        db.save()?;
        Ok(db)
    }

    /// Load a store from `path` without discovering or saving.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let mut db = Self::new(path);
        db.load()?;
        Ok(db)
    }

    /// Scan `dir` (non-recursively) and add a default record for every
    /// recognized image that is not already tracked.
    ///
    /// Existing records are left untouched and records for files that have
    /// disappeared are kept. Returns the number of records added. The store is
    /// not persisted.
    pub fn discover(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| CropdeskError::io(dir, e))?;

        let mut added = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CropdeskError::io(dir, e))?;
            let path = entry.path();
            if !path.is_file() || !is_image_file(&path) {
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    warn!(name = ?name, "Skipping image with non UTF-8 filename");
                    continue;
                }
            };

            if let Entry::Vacant(slot) = self.images.entry(name) {
                debug!(filename = %slot.key(), "New image");
                slot.insert(ImageRecord::default());
                added += 1;
            }
        }

        Ok(added)
    }

    /// Replace the in-memory mapping with the contents of the backing file.
    pub fn load(&mut self) -> Result<()> {
        let path = &self.save_path;
        let file = File::open(path).map_err(|e| CropdeskError::io(path, e))?;

        let reader = BufReader::new(file);
        let images: BTreeMap<String, ImageRecord> =
            serde_json::from_reader(reader).map_err(|e| CropdeskError::json(path, e))?;

        self.images = images;
        Ok(())
    }

    /// Write the whole mapping to the backing file.
    ///
    /// The JSON is written to a temporary file in the same directory and then
    /// renamed over the backing path, so a crash leaves either the old or the
    /// new file, never a partial one.
    pub fn save(&self) -> Result<()> {
        let path = &self.save_path;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| CropdeskError::io(dir, e))?;
        }

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| CropdeskError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &self.images)
                .map_err(|e| CropdeskError::json(path, e))?;
            writer.flush().map_err(|e| CropdeskError::io(path, e))?;
        }

        temp.persist(path)
            .map_err(|e| CropdeskError::io(path, e.error))?;

        debug!(path = %path.display(), records = self.len(), "Saved image database");
        Ok(())
    }

    /// Look up the record for `filename`.
    pub fn get(&self, filename: &str) -> Option<&ImageRecord> {
        self.images.get(filename)
    }

    /// Replace all fields of an existing record.
    ///
    /// Returns `false` and leaves the store unchanged if `filename` is not
    /// tracked.
    pub fn update(&mut self, filename: &str, record: ImageRecord) -> bool {
        match self.images.get_mut(filename) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Set the approval flag and mark the record processed.
    pub fn set_approved(&mut self, filename: &str, approved: bool) -> bool {
        match self.images.get_mut(filename) {
            Some(existing) => {
                existing.approved = approved;
                existing.processed = true;
                true
            }
            None => false,
        }
    }

    /// Replace only the crop window of a record.
    pub fn set_crop(&mut self, filename: &str, crop: Crop) -> bool {
        match self.images.get_mut(filename) {
            Some(existing) => {
                existing.set_crop(crop);
                true
            }
            None => false,
        }
    }

    /// Apply `change` to the record for `filename` and save.
    ///
    /// `change` is one of the mutators above (it returns whether the key
    /// exists). If saving fails the record is restored, so the store never
    /// holds a change that did not reach disk. Returns `Ok(false)` without
    /// saving when `filename` is not tracked.
    pub fn commit<F>(&mut self, filename: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let Some(previous) = self.images.get(filename).copied() else {
            return Ok(false);
        };

        if !change(self) {
            return Ok(false);
        }

        if let Err(e) = self.save() {
            warn!(filename, error = %e, "Save failed, reverting record");
            self.images.insert(filename.to_string(), previous);
            return Err(e);
        }

        Ok(true)
    }

    /// Iterate over `(filename, record)` pairs in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageRecord)> {
        self.images.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of tracked images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.save_path
    }

    /// Count records by curation state.
    pub fn summary(&self) -> StoreSummary {
        self.images
            .values()
            .fold(StoreSummary::default(), |mut summary, record| {
                summary.total += 1;
                if record.processed {
                    summary.processed += 1;
                } else {
                    summary.pending += 1;
                }
                if record.approved {
                    summary.approved += 1;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(names: &[&str]) -> ImageDatabase {
        let mut db = ImageDatabase::new("unused.json");
        for name in names {
            db.images.insert(name.to_string(), ImageRecord::default());
        }
        db
    }

    #[test]
    fn test_get_missing() {
        let db = store_with(&["a.jpg"]);
        assert!(db.get("a.jpg").is_some());
        assert!(db.get("b.jpg").is_none());
    }

    #[test]
    fn test_update_existing() {
        let mut db = store_with(&["a.jpg"]);
        let record = ImageRecord::new(true, true, Crop::new(10, 5, 50));
        assert!(db.update("a.jpg", record));
        assert_eq!(db.get("a.jpg"), Some(&record));
    }

    #[test]
    fn test_update_unknown_leaves_store_unchanged() {
        let mut db = store_with(&["a.jpg"]);
        let record = ImageRecord::new(true, true, Crop::new(1, 2, 3));
        assert!(!db.update("b.jpg", record));
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("a.jpg"), Some(&ImageRecord::default()));
        assert!(db.get("b.jpg").is_none());
    }

    #[test]
    fn test_set_approved_marks_processed() {
        let mut db = store_with(&["a.jpg"]);
        assert!(db.set_approved("a.jpg", true));
        let record = db.get("a.jpg").unwrap();
        assert!(record.approved);
        assert!(record.processed);

        assert!(db.set_approved("a.jpg", false));
        let record = db.get("a.jpg").unwrap();
        assert!(!record.approved);
        assert!(record.processed);

        assert!(!db.set_approved("missing.jpg", true));
    }

    #[test]
    fn test_set_crop_only_touches_crop() {
        let mut db = store_with(&["a.jpg"]);
        db.set_approved("a.jpg", true);
        assert!(db.set_crop("a.jpg", Crop::new(7, 8, 9)));
        let record = db.get("a.jpg").unwrap();
        assert!(record.approved);
        assert_eq!(record.crop(), Crop::new(7, 8, 9));
        assert!(!db.set_crop("missing.jpg", Crop::new(1, 1, 1)));
    }

    #[test]
    fn test_summary() {
        let mut db = store_with(&["a.jpg", "b.jpg", "c.png"]);
        db.set_approved("a.jpg", true);
        db.set_approved("b.jpg", false);

        let summary = db.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.pending, 1);
        assert!((summary.progress() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_progress() {
        let db = ImageDatabase::new("unused.json");
        assert!(db.is_empty());
        assert_eq!(db.summary().progress(), 1.0);
    }

    #[test]
    fn test_iter_is_sorted() {
        let db = store_with(&["c.jpg", "a.jpg", "b.jpg"]);
        let names: Vec<&str> = db.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }
}
