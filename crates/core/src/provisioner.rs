use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use crate::fs::{FileSystem, OsFileSystem};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} exists but is not a directory")]
    NotADirectory { path: PathBuf },
}

impl ProvisionError {
    pub fn path(&self) -> &Path {
        match self {
            ProvisionError::CreateDir { path, .. } | ProvisionError::NotADirectory { path } => path,
        }
    }
}

/// 建立基底資料夾與分類子資料夾。 / Ensures the base folder and its category subfolders exist.
#[derive(Debug, Clone, Default)]
pub struct FolderProvisioner<F = OsFileSystem> {
    fs: F,
}

impl FolderProvisioner<OsFileSystem> {
    pub fn new() -> Self {
        Self { fs: OsFileSystem }
    }
}

impl<F: FileSystem> FolderProvisioner<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// 冪等地建立 `base` 與 `base/<name>`，回傳所有資料夾路徑。 /
    /// Idempotently creates `base` and each `base/<name>`, returning the folder paths.
    pub fn ensure_folders<S: AsRef<str>>(
        &self,
        base: &Path,
        names: &[S],
    ) -> Result<Vec<PathBuf>, ProvisionError> {
        self.ensure_dir(base).inspect_err(|err| {
            error!(base = %base.display(), "folder provisioning failed: {err}");
        })?;

        let mut folders = Vec::with_capacity(names.len());
        for name in names {
            let folder = base.join(name.as_ref());
            self.ensure_dir(&folder).inspect_err(|err| {
                error!(base = %base.display(), "folder provisioning failed: {err}");
            })?;
            folders.push(folder);
        }
        debug!(base = %base.display(), count = folders.len(), "category folders ready");
        Ok(folders)
    }

    pub fn folder_exists(&self, path: &Path) -> bool {
        self.fs.is_dir(path)
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), ProvisionError> {
        if self.fs.is_dir(path) {
            return Ok(());
        }
        if self.fs.exists(path) {
            return Err(ProvisionError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        self.fs
            .create_dir_all(path)
            .map_err(|source| ProvisionError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }
}
