//! Application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use cropdesk::ImageDatabase;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The record store. Writers hold the lock across mutation and save.
    pub db: Arc<RwLock<ImageDatabase>>,
    /// Directory the images are served from.
    pub image_dir: PathBuf,
}

impl AppState {
    /// Create new application state around an opened store.
    pub fn new(db: ImageDatabase, image_dir: PathBuf) -> Self {
        Self {
            db: Arc::new(RwLock::new(db)),
            image_dir,
        }
    }

    /// Save the store to disk.
    pub async fn save(&self) -> Result<(), cropdesk::CropdeskError> {
        let db = self.db.read().await;
        db.save()
    }
}
