//! Integration tests for ImageDatabase persistence and discovery.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cropdesk::{Crop, CropdeskError, ImageDatabase, ImageRecord};

/// Create empty files with the given names inside `dir`.
fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"not really an image").expect("Failed to write file");
    }
}

fn records(db: &ImageDatabase) -> Vec<(String, ImageRecord)> {
    db.iter().map(|(name, record)| (name.to_string(), *record)).collect()
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_discover_recognized_extensions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(
        temp_dir.path(),
        &["a.jpg", "b.JPEG", "c.png", ".png", "d.gif", "notes.txt", "noext"],
    );
    fs::create_dir(temp_dir.path().join("folder.jpg")).unwrap();
    fs::create_dir(temp_dir.path().join("nested")).unwrap();
    touch(&temp_dir.path().join("nested"), &["deep.jpg"]);

    let mut db = ImageDatabase::new(temp_dir.path().join("db.json"));
    let added = db.discover(temp_dir.path()).expect("Discovery failed");

    assert_eq!(added, 4);
    let names: Vec<&str> = db.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec![".png", "a.jpg", "b.JPEG", "c.png"]);
    assert!(db.iter().all(|(_, record)| *record == ImageRecord::default()));
}

#[test]
fn test_discover_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg", "b.png"]);

    let mut db = ImageDatabase::new(temp_dir.path().join("db.json"));
    db.discover(temp_dir.path()).unwrap();
    let first = records(&db);

    let added = db.discover(temp_dir.path()).unwrap();
    assert_eq!(added, 0);
    assert_eq!(records(&db), first);
}

#[test]
fn test_discover_keeps_existing_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg"]);

    let mut db = ImageDatabase::new(temp_dir.path().join("db.json"));
    db.discover(temp_dir.path()).unwrap();
    let record = ImageRecord::new(true, true, Crop::new(1, 2, 3));
    assert!(db.update("a.jpg", record));

    touch(temp_dir.path(), &["b.jpg"]);
    assert_eq!(db.discover(temp_dir.path()).unwrap(), 1);
    assert_eq!(db.get("a.jpg"), Some(&record));
    assert_eq!(db.get("b.jpg"), Some(&ImageRecord::default()));
}

#[test]
fn test_discover_never_removes_vanished_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg", "b.jpg"]);

    let mut db = ImageDatabase::new(temp_dir.path().join("db.json"));
    db.discover(temp_dir.path()).unwrap();

    fs::remove_file(temp_dir.path().join("b.jpg")).unwrap();
    db.discover(temp_dir.path()).unwrap();

    assert_eq!(db.len(), 2);
    assert!(db.get("b.jpg").is_some());
}

#[test]
fn test_discover_missing_directory_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut db = ImageDatabase::new(temp_dir.path().join("db.json"));

    let err = db.discover(temp_dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CropdeskError::Io { .. }));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_save_load_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg", "b.png"]);
    let save_path = temp_dir.path().join("db.json");

    let mut db = ImageDatabase::new(&save_path);
    db.discover(temp_dir.path()).unwrap();
    db.update("b.png", ImageRecord::new(true, true, Crop::new(-3, 12, 256)));
    db.save().expect("Save failed");

    let loaded = ImageDatabase::load_from(&save_path).expect("Load failed");
    assert_eq!(records(&loaded), records(&db));
    assert_eq!(loaded.path(), save_path.as_path());
}

#[test]
fn test_saved_file_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg"]);
    let save_path = temp_dir.path().join("db.json");

    let mut db = ImageDatabase::new(&save_path);
    db.discover(temp_dir.path()).unwrap();
    db.update("a.jpg", ImageRecord::new(true, false, Crop::new(4, 5, 6)));
    db.save().unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&save_path).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "a.jpg": {
                "processed": true,
                "approved": false,
                "crop_left": 4,
                "crop_top": 5,
                "crop_size": 6
            }
        })
    );
}

#[test]
fn test_save_creates_parent_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("subdir").join("db.json");

    ImageDatabase::new(&save_path).save().expect("Save failed");

    assert!(save_path.exists());
}

#[test]
fn test_save_leaves_no_temp_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("db.json");

    let db = ImageDatabase::new(&save_path);
    db.save().unwrap();
    db.save().unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_load_replaces_mapping() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("db.json");
    fs::write(
        &save_path,
        r#"{"x.png": {"processed": false, "approved": true, "crop_left": 0, "crop_top": 0, "crop_size": 10}}"#,
    )
    .unwrap();

    touch(temp_dir.path(), &["a.jpg"]);
    let mut db = ImageDatabase::new(&save_path);
    db.discover(temp_dir.path()).unwrap();
    db.load().unwrap();

    assert_eq!(db.len(), 1);
    assert!(db.get("a.jpg").is_none());
    assert!(db.get("x.png").unwrap().approved);
}

#[test]
fn test_load_malformed_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("db.json");
    fs::write(&save_path, "{ not json").unwrap();

    let err = ImageDatabase::load_from(&save_path).unwrap_err();
    assert!(matches!(err, CropdeskError::Json { .. }));
    assert!(err.to_string().contains("db.json"));
}

#[test]
fn test_load_rejects_legacy_schema() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("db.json");
    fs::write(
        &save_path,
        r#"{"a.jpg": {"activated": true, "crop_left": 0, "crop_top": 0, "crop_size": 0}}"#,
    )
    .unwrap();

    assert!(ImageDatabase::load_from(&save_path).is_err());
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = ImageDatabase::load_from(temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CropdeskError::Io { .. }));
}

/// Replace the backing file with a non-empty directory so the next save fails.
fn block_saves(save_path: &Path) {
    fs::remove_file(save_path).unwrap();
    fs::create_dir(save_path).unwrap();
    fs::write(save_path.join("occupied"), b"").unwrap();
}

#[test]
fn test_commit_saves_change() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg"]);
    let save_path = temp_dir.path().join("db.json");
    let mut db = ImageDatabase::open(&save_path, temp_dir.path()).unwrap();

    let record = ImageRecord::new(true, true, Crop::new(1, 2, 3));
    assert!(db.commit("a.jpg", |db| db.update("a.jpg", record)).unwrap());

    assert_eq!(db.get("a.jpg"), Some(&record));
    assert_eq!(ImageDatabase::load_from(&save_path).unwrap().get("a.jpg"), Some(&record));
}

#[test]
fn test_commit_unknown_filename_does_not_save() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg"]);
    let save_path = temp_dir.path().join("db.json");
    let mut db = ImageDatabase::open(&save_path, temp_dir.path()).unwrap();
    block_saves(&save_path);

    let changed = db
        .commit("b.jpg", |db| db.set_approved("b.jpg", true))
        .expect("No save should be attempted");
    assert!(!changed);
}

#[test]
fn test_commit_reverts_when_save_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), &["a.jpg"]);
    let save_path = temp_dir.path().join("db.json");
    let mut db = ImageDatabase::open(&save_path, temp_dir.path()).unwrap();
    let original = ImageRecord::new(true, false, Crop::new(4, 4, 4));
    db.update("a.jpg", original);
    block_saves(&save_path);

    let replacement = ImageRecord::new(true, true, Crop::new(1, 2, 3));
    let err = db.commit("a.jpg", |db| db.update("a.jpg", replacement)).unwrap_err();
    assert!(matches!(err, CropdeskError::Io { .. }));
    assert_eq!(db.get("a.jpg"), Some(&original));

    assert!(db.commit("a.jpg", |db| db.set_crop("a.jpg", Crop::new(9, 9, 9))).is_err());
    assert!(db.commit("a.jpg", |db| db.set_approved("a.jpg", true)).is_err());
    assert_eq!(db.get("a.jpg"), Some(&original));
}

// =============================================================================
// Startup
// =============================================================================

#[test]
fn test_open_creates_backing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let image_dir = temp_dir.path().join("images");
    fs::create_dir(&image_dir).unwrap();
    touch(&image_dir, &["a.jpg", "b.png"]);
    let save_path = temp_dir.path().join("db.json");

    let db = ImageDatabase::open(&save_path, &image_dir).expect("Open failed");

    assert_eq!(db.len(), 2);
    let on_disk = ImageDatabase::load_from(&save_path).unwrap();
    assert_eq!(records(&on_disk), records(&db));
}

#[test]
fn test_open_preserves_existing_and_adds_new() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let image_dir = temp_dir.path().join("images");
    fs::create_dir(&image_dir).unwrap();
    touch(&image_dir, &["a.jpg"]);
    let save_path = temp_dir.path().join("db.json");

    let mut db = ImageDatabase::open(&save_path, &image_dir).unwrap();
    let record = ImageRecord::new(true, true, Crop::new(10, 5, 50));
    db.update("a.jpg", record);
    db.save().unwrap();

    touch(&image_dir, &["b.jpg"]);
    let reopened = ImageDatabase::open(&save_path, &image_dir).unwrap();

    assert_eq!(reopened.get("a.jpg"), Some(&record));
    assert_eq!(reopened.get("b.jpg"), Some(&ImageRecord::default()));
    assert_eq!(ImageDatabase::load_from(&save_path).unwrap().len(), 2);
}

#[test]
fn test_open_with_corrupt_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = temp_dir.path().join("db.json");
    fs::write(&save_path, "[]").unwrap();

    assert!(ImageDatabase::open(&save_path, temp_dir.path()).is_err());
    assert_eq!(fs::read_to_string(&save_path).unwrap(), "[]");
}
