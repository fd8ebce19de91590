//! Cropdesk: human-in-the-loop image curation.
//!
//! Cropdesk keeps a JSON sidecar of per-image curation metadata next to a
//! directory of images, and turns the approved crops into a fixed-size
//! training dataset.
//!
//! # Core Pieces
//!
//! - **Record store**: [`ImageDatabase`] maps filenames to [`ImageRecord`]s and
//!   keeps the sidecar file in sync with the images on disk
//! - **Exporter**: [`export_dataset`] crops and pads every approved image
//!
//! # Example
//!
//! ```no_run
//! use cropdesk::{ExportOptions, ExtendMode, ImageDatabase, export_dataset};
//!
//! let db = ImageDatabase::open("images.json", "images").unwrap();
//! println!("Tracking {} images", db.len());
//!
//! let options = ExportOptions::new("images", "images.json", "dataset")
//!     .with_extend_mode(ExtendMode::White);
//! let summary = export_dataset(&options).unwrap();
//! println!("Exported {}", summary.exported);
//! ```

pub mod error;
pub mod export;
pub mod record;
pub mod store;

pub use error::{CropdeskError, Result};
pub use export::{
    ExportOptions, ExportSummary, ExtendMode, MAX_CROP_SIZE, crop_and_pad, export_dataset,
};
pub use record::{Crop, IMAGE_EXTENSIONS, ImageRecord, is_image_file, validate_filename};
pub use store::{ImageDatabase, StoreSummary};
