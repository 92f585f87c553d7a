use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::StorageConfig;

/// 設定檔所在的應用程式資料夾名稱。 / Application directory under the per-user config root.
pub const APP_DIR_NAME: &str = "dropsort";
/// 設定檔檔名。 / File name of the persisted storage configuration.
pub const CONFIG_FILE_NAME: &str = "storage-config.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to serialize storage config {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write storage config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 儲存設定的 JSON 持久化。 / JSON persistence for the storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfigStore {
    path: PathBuf,
}

impl StorageConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 放在指定資料夾下的設定檔。 / Store whose file lives directly in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// 使用者設定資料夾下的預設位置。 / Default per-user location, e.g. `~/.config/dropsort/storage-config.json`.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push(APP_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 讀取設定；檔案不存在或格式錯誤時視為尚未設定。 /
    /// Loads the config; a missing or unreadable file means "not configured".
    pub fn load(&self) -> Option<StorageConfig> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no storage config yet");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), "failed to read storage config: {err}");
                return None;
            }
        };

        match serde_json::from_str::<StorageConfig>(&contents) {
            Ok(mut config) => {
                config.sanitize();
                Some(config)
            }
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring malformed storage config: {err}");
                None
            }
        }
    }

    /// 只回傳已完成設定的內容。 / Like [`load`](Self::load) but only yields completed setups.
    pub fn load_configured(&self) -> Option<StorageConfig> {
        self.load().filter(|config| config.is_configured)
    }

    pub fn save(&self, config: &StorageConfig) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload =
            serde_json::to_string_pretty(config).map_err(|source| StorageError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), base = %config.base_path.display(), "storage config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_unconfigured() {
        let dir = tempdir().unwrap();
        let store = StorageConfigStore::in_dir(dir.path());
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = StorageConfigStore::in_dir(dir.path().join("nested"));
        let config = StorageConfig::new_configured(dir.path().join("Organized"));

        store.save(&config).unwrap();
        assert!(!store.path().with_extension("tmp").exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(store.load_configured(), Some(config));
    }

    #[test]
    fn malformed_json_degrades_to_unconfigured() {
        let dir = tempdir().unwrap();
        let store = StorageConfigStore::in_dir(dir.path());
        fs::write(store.path(), "{ \"basePath\": ").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn unfinished_setup_is_not_configured() {
        let dir = tempdir().unwrap();
        let store = StorageConfigStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"{ "basePath": "/tmp/x", "folders": [], "isConfigured": false }"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert!(!loaded.is_configured);
        assert_eq!(loaded.folders.len(), 10);
        assert!(store.load_configured().is_none());
    }

    #[test]
    fn default_path_ends_with_app_file() {
        let path = StorageConfigStore::default_path();
        assert!(path.ends_with(Path::new(APP_DIR_NAME).join(CONFIG_FILE_NAME)));
    }
}
