pub mod config;
pub mod store;

pub use config::{default_folders, is_plain_folder_name, FolderConfig, StorageConfig};
pub use store::{StorageConfigStore, StorageError, APP_DIR_NAME, CONFIG_FILE_NAME};
