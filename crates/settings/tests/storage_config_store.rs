use std::fs;

use dropsort_core::FolderProvisioner;
use dropsort_settings::{StorageConfig, StorageConfigStore};
use tempfile::tempdir;

#[test]
fn setup_persists_config_that_reprovisions_identically() {
    let dir = tempdir().expect("temp dir");
    let base = dir.path().join("Organized");
    let store = StorageConfigStore::in_dir(dir.path().join("config"));

    let config = StorageConfig::new_configured(&base);
    FolderProvisioner::new()
        .ensure_folders(&config.base_path, &config.folder_names())
        .expect("provision");
    store.save(&config).expect("save");

    let reloaded = store.load_configured().expect("configured");
    let folders = FolderProvisioner::new()
        .ensure_folders(&reloaded.base_path, &reloaded.folder_names())
        .expect("reprovision");
    assert_eq!(folders.len(), 10);

    let mut on_disk: Vec<String> = fs::read_dir(&base)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    on_disk.sort();
    let mut expected = reloaded.folder_names();
    expected.sort();
    assert_eq!(on_disk, expected);
}

#[test]
fn file_written_by_hand_is_read_back() {
    let dir = tempdir().expect("temp dir");
    let store = StorageConfigStore::in_dir(dir.path());
    fs::write(
        store.path(),
        r#"{
  "basePath": "/home/user/Sorted",
  "folders": [
    { "name": "Images", "icon": "🖼️", "extensions": ["png"] },
    { "name": "Others", "icon": "📁", "extensions": [] }
  ],
  "isConfigured": true
}"#,
    )
    .unwrap();

    let config = store.load_configured().expect("configured");
    assert_eq!(config.base_path, std::path::PathBuf::from("/home/user/Sorted"));
    assert_eq!(config.category_table().classify("cat.PNG"), "Images");
    assert_eq!(config.category_table().classify("cat.gif"), "Others");
}

#[test]
fn loaded_folders_never_escape_the_base() {
    let dir = tempdir().expect("temp dir");
    let base = dir.path().join("Organized");
    let store = StorageConfigStore::in_dir(dir.path().join("config"));
    fs::create_dir_all(dir.path().join("config")).unwrap();
    let payload = serde_json::json!({
        "basePath": base,
        "folders": [
            { "name": "../outside", "extensions": ["jpg"] },
            { "name": dir.path().join("abs"), "extensions": ["png"] },
            { "name": "Pictures", "extensions": ["jpg", "png"] }
        ],
        "isConfigured": true
    });
    fs::write(store.path(), payload.to_string()).unwrap();

    let config = store.load_configured().expect("configured");
    assert_eq!(config.folder_names(), vec!["Pictures"]);

    FolderProvisioner::new()
        .ensure_folders(&config.base_path, &config.folder_names())
        .expect("provision");
    assert!(!dir.path().join("outside").exists());
    assert!(!dir.path().join("abs").exists());
    assert!(base.join("Pictures").is_dir());
}
