//! Per-image curation records.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{CropdeskError, Result};

/// File extensions recognized as images during discovery (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Square crop window, relative to the source image origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    /// Left edge of the window in source pixels. May be negative.
    pub left: i64,
    /// Top edge of the window in source pixels. May be negative.
    pub top: i64,
    /// Side length of the window.
    pub size: u32,
}

impl Crop {
    /// Create a new crop window.
    pub fn new(left: i64, top: i64, size: u32) -> Self {
        Self { left, top, size }
    }

    /// A zero-sized crop has nothing to export.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Curation metadata for one image.
///
/// The filename is the key in the store and is not part of the record itself.
/// Every field is required when parsing, so a record with a missing or
/// mistyped field is rejected rather than silently defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// A curation decision has been made.
    pub processed: bool,
    /// The image is selected for export.
    pub approved: bool,
    pub crop_left: i64,
    pub crop_top: i64,
    pub crop_size: u32,
}

impl ImageRecord {
    /// Create a record with explicit values.
    pub fn new(processed: bool, approved: bool, crop: Crop) -> Self {
        Self {
            processed,
            approved,
            crop_left: crop.left,
            crop_top: crop.top,
            crop_size: crop.size,
        }
    }

    /// The crop window stored in this record.
    pub fn crop(&self) -> Crop {
        Crop::new(self.crop_left, self.crop_top, self.crop_size)
    }

    /// Replace the crop window, leaving the flags alone.
    pub fn set_crop(&mut self, crop: Crop) {
        self.crop_left = crop.left;
        self.crop_top = crop.top;
        self.crop_size = crop.size;
    }
}

/// Check whether a file name ends in `.` plus one of the recognized extensions.
///
/// The comparison is case-insensitive, so `photo.JPG` matches. Only the name
/// suffix counts, so a bare `.jpg` is an image too.
pub fn is_image_file(path: impl AsRef<Path>) -> bool {
    let Some(name) = path.as_ref().file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();

    IMAGE_EXTENSIONS.iter().any(|ext| {
        name.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Ensure a filename names a single entry directly inside the image directory.
///
/// Rejects empty names, absolute paths, `..`, and anything with more than one
/// path component.
pub fn validate_filename(filename: &str) -> Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !filename.contains(['/', '\\']) => Ok(()),
        _ => Err(CropdeskError::InvalidFilename(filename.to_string())),
    }
}
