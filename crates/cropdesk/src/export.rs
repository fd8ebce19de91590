//! Batch export of approved crops into a fixed-size dataset.

use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use image::{DynamicImage, Rgb, RgbImage, imageops};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CropdeskError, Result};
use crate::record::{Crop, validate_filename};
use crate::store::ImageDatabase;

/// Background used for canvas area not covered by the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtendMode {
    White,
    #[default]
    Black,
}

impl ExtendMode {
    /// Fill color for the canvas.
    pub fn background(&self) -> Rgb<u8> {
        match self {
            ExtendMode::White => Rgb([255, 255, 255]),
            ExtendMode::Black => Rgb([0, 0, 0]),
        }
    }
}

/// `"white"` selects a white background; any other value means black.
impl FromStr for ExtendMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s == "white" {
            ExtendMode::White
        } else {
            ExtendMode::Black
        })
    }
}

impl std::fmt::Display for ExtendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtendMode::White => write!(f, "white"),
            ExtendMode::Black => write!(f, "black"),
        }
    }
}

/// Largest canvas side length the exporter will allocate.
pub const MAX_CROP_SIZE: u32 = 16_384;

/// Produce a `crop.size × crop.size` canvas showing `source` shifted by
/// `(-crop.left, -crop.top)`.
///
/// Canvas pixel `(x, y)` is source pixel `(x + crop.left, y + crop.top)` when
/// that lies inside the source, and the background color otherwise. Alpha is
/// dropped. Fails with [`CropdeskError::CropTooLarge`] above [`MAX_CROP_SIZE`].
pub fn crop_and_pad(source: &DynamicImage, crop: Crop, mode: ExtendMode) -> Result<RgbImage> {
    if crop.size > MAX_CROP_SIZE {
        return Err(CropdeskError::CropTooLarge {
            size: crop.size,
            max: MAX_CROP_SIZE,
        });
    }

    let mut canvas = RgbImage::from_pixel(crop.size, crop.size, mode.background());
    let source = source.to_rgb8();
    let x = paste_offset(crop.left, source.width(), crop.size);
    let y = paste_offset(crop.top, source.height(), crop.size);
    imageops::replace(&mut canvas, &source, x, y);
    Ok(canvas)
}

/// Canvas position of the source origin along one axis.
///
/// Clamped to `[-source_len, canvas_len]`; both ends already mean no overlap,
/// so clamping only keeps extreme offsets from overflowing.
fn paste_offset(crop_start: i64, source_len: u32, canvas_len: u32) -> i64 {
    crop_start
        .saturating_neg()
        .clamp(-i64::from(source_len), i64::from(canvas_len))
}

/// Inputs for [`export_dataset`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory holding the original images.
    pub image_dir: PathBuf,
    /// Metadata JSON file written by the record store.
    pub db_path: PathBuf,
    /// Destination directory for the exported crops.
    pub out_dir: PathBuf,
    pub extend_mode: ExtendMode,
}

impl ExportOptions {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            db_path: db_path.into(),
            out_dir: out_dir.into(),
            extend_mode: ExtendMode::default(),
        }
    }

    pub fn with_extend_mode(mut self, mode: ExtendMode) -> Self {
        self.extend_mode = mode;
        self
    }
}

/// Outcome counts of an export pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Crops written to the output directory.
    pub exported: usize,
    /// Records not approved for export.
    pub skipped_unapproved: usize,
    /// Approved records whose source file no longer exists.
    pub missing: usize,
    /// Approved records whose source file could not be decoded.
    pub unreadable: usize,
    /// Approved records with a zero crop size.
    pub empty_crop: usize,
    /// Approved records with a crop size above [`MAX_CROP_SIZE`].
    pub oversized: usize,
    /// Approved records whose key is not a plain filename.
    pub invalid_name: usize,
}

impl ExportSummary {
    /// Approved records that were not written.
    pub fn skipped(&self) -> usize {
        self.missing + self.unreadable + self.empty_crop + self.oversized + self.invalid_name
    }
}

/// Crop and pad every approved image into `options.out_dir`.
///
/// Entries that are missing, undecodable, zero-sized, oversized, or not plain
/// filenames are logged and skipped. Failing to write an output file stops the
/// pass with an error.
pub fn export_dataset(options: &ExportOptions) -> Result<ExportSummary> {
    let db = ImageDatabase::load_from(&options.db_path)?;
    fs::create_dir_all(&options.out_dir).map_err(|e| CropdeskError::io(&options.out_dir, e))?;

    info!(
        records = db.len(),
        out_dir = %options.out_dir.display(),
        extend_mode = %options.extend_mode,
        "Exporting approved crops"
    );

    let mut summary = ExportSummary::default();
    for (filename, record) in db.iter() {
        if !record.approved {
            summary.skipped_unapproved += 1;
            continue;
        }

        if validate_filename(filename).is_err() {
            warn!(filename, "Skipping record whose key is not a plain filename");
            summary.invalid_name += 1;
            continue;
        }

        let source_path = options.image_dir.join(filename);
        if !source_path.exists() {
            warn!(path = %source_path.display(), "Image does not exist");
            summary.missing += 1;
            continue;
        }

        let crop = record.crop();
        if crop.is_empty() {
            warn!(filename, "Approved image has no crop size, skipping");
            summary.empty_crop += 1;
            continue;
        }
        if crop.size > MAX_CROP_SIZE {
            warn!(filename, size = crop.size, max = MAX_CROP_SIZE, "Crop size too large, skipping");
            summary.oversized += 1;
            continue;
        }

        let source = match image::open(&source_path) {
            Ok(source) => source,
            Err(e) => {
                warn!(path = %source_path.display(), error = %e, "Could not decode image");
                summary.unreadable += 1;
                continue;
            }
        };

        let canvas = crop_and_pad(&source, crop, options.extend_mode)?;
        let out_path = options.out_dir.join(filename);
        canvas
            .save(&out_path)
            .map_err(|e| CropdeskError::image(&out_path, e))?;

        debug!(filename, size = crop.size, "Exported crop");
        summary.exported += 1;
    }

    Ok(summary)
}
