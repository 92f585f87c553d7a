use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::fs::{is_cross_device, FileSystem, OsFileSystem};

/// 預設的衝突編號上限。 / Default cap on `_N` collision suffixes.
pub const DEFAULT_MAX_COLLISION_SUFFIX: u32 = 9_999;

/// 搬移失敗的分類。 / Coarse failure classes for a single relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateErrorKind {
    MissingSource,
    DestinationUnwritable,
    CrossVolumeFallbackPartialFailure,
    CollisionLimitExceeded,
    UnknownIoFailure,
}

#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("source file does not exist: {path}")]
    MissingSource { path: PathBuf },
    #[error("cannot write to {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("permission denied moving {from} to {to}: {source}")]
    MoveDenied {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("copied {from} to {to} but could not remove the source: {source}")]
    CrossVolumePartial {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free name for {target} after {attempts} attempts")]
    CollisionLimit { target: PathBuf, attempts: u32 },
    #[error("failed to move {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RelocateError {
    pub fn kind(&self) -> RelocateErrorKind {
        match self {
            RelocateError::MissingSource { .. } => RelocateErrorKind::MissingSource,
            RelocateError::DestinationUnwritable { .. } | RelocateError::MoveDenied { .. } => {
                RelocateErrorKind::DestinationUnwritable
            }
            RelocateError::CrossVolumePartial { .. } => {
                RelocateErrorKind::CrossVolumeFallbackPartialFailure
            }
            RelocateError::CollisionLimit { .. } => RelocateErrorKind::CollisionLimitExceeded,
            RelocateError::Io { .. } => RelocateErrorKind::UnknownIoFailure,
        }
    }
}

/// 將單一檔案搬入目標資料夾，處理名稱衝突與跨裝置搬移。 /
/// Moves one file into place, resolving name collisions and cross-device moves.
#[derive(Debug, Clone)]
pub struct FileRelocator<F = OsFileSystem> {
    fs: F,
    max_collision_suffix: Option<u32>,
}

impl FileRelocator<OsFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Default for FileRelocator<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> FileRelocator<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            max_collision_suffix: Some(DEFAULT_MAX_COLLISION_SUFFIX),
        }
    }

    /// `None` 表示不設上限。 / `None` tries suffixes without an upper bound.
    pub fn with_max_collision_suffix(mut self, limit: Option<u32>) -> Self {
        self.max_collision_suffix = limit;
        self
    }

    pub fn max_collision_suffix(&self) -> Option<u32> {
        self.max_collision_suffix
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// 搬移檔案並回傳最終路徑。 / Moves `source` to `target` (or a free sibling name) and returns the final path.
    pub fn move_file(&self, source: &Path, target: &Path) -> Result<PathBuf, RelocateError> {
        if !self.fs.exists(source) {
            return Err(RelocateError::MissingSource {
                path: source.to_path_buf(),
            });
        }

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.is_dir(parent) {
                self.fs.create_dir_all(parent).map_err(|source| {
                    RelocateError::DestinationUnwritable {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let destination = self.resolve_collision(target)?;

        match self.fs.rename(source, &destination) {
            Ok(()) => {
                debug!(from = %source.display(), to = %destination.display(), "renamed");
                Ok(destination)
            }
            Err(err) if is_cross_device(&err) => {
                debug!(from = %source.display(), to = %destination.display(), "cross-device move, copying");
                self.copy_then_delete(source, &destination)?;
                Ok(destination)
            }
            Err(err) => Err(move_failure(source, &destination, err)),
        }
    }

    /// 找出未被占用的路徑：`name.ext`、`name_1.ext`、`name_2.ext`…… /
    /// First free path among `name.ext`, `name_1.ext`, `name_2.ext`, ...
    pub fn resolve_collision(&self, target: &Path) -> Result<PathBuf, RelocateError> {
        if !self.fs.exists(target) {
            return Ok(target.to_path_buf());
        }

        let mut counter: u32 = 1;
        loop {
            if let Some(limit) = self.max_collision_suffix {
                if counter > limit {
                    return Err(RelocateError::CollisionLimit {
                        target: target.to_path_buf(),
                        attempts: limit,
                    });
                }
            }
            let candidate = suffixed_path(target, counter);
            if !self.fs.exists(&candidate) {
                return Ok(candidate);
            }
            counter = counter.saturating_add(1);
        }
    }

    fn copy_then_delete(&self, source: &Path, destination: &Path) -> Result<(), RelocateError> {
        if let Err(err) = self.fs.copy(source, destination) {
            // a half-written copy would otherwise shadow the name on the next attempt
            if self.fs.exists(destination) {
                let _ = self.fs.remove_file(destination);
            }
            return Err(move_failure(source, destination, err));
        }

        self.fs.remove_file(source).map_err(|err| {
            warn!(
                from = %source.display(),
                to = %destination.display(),
                "copy succeeded but the source could not be removed; both copies remain"
            );
            RelocateError::CrossVolumePartial {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
                source: err,
            }
        })
    }
}

// Either side can deny a rename or copy, so both paths are reported.
fn move_failure(from: &Path, to: &Path, err: io::Error) -> RelocateError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        RelocateError::MoveDenied {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: err,
        }
    } else {
        RelocateError::Io {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: err,
        }
    }
}

fn suffixed_path(target: &Path, counter: u32) -> PathBuf {
    let stem = target.file_stem().unwrap_or_default();
    let mut name = OsString::from(stem);
    name.push(format!("_{counter}"));
    if let Some(ext) = target.extension() {
        name.push(".");
        name.push(ext);
    }
    target.with_file_name(name)
}
