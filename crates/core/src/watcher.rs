use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tracing::{debug, trace};

/// 監看投放區時可能發生的錯誤。 / Errors raised while watching a drop zone.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("drop zone {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("watcher channel disconnected")]
    ChannelDisconnected,
}

/// 新出現在投放區的檔案。 / A file that appeared in the drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub path: PathBuf,
}

/// 封裝 `notify`，只回報新建立或移入的檔案。 /
/// Thin wrapper around `notify` reporting only files created in, or moved into, the drop zone.
pub struct DropZoneWatcher {
    watcher: RecommendedWatcher,
    rx: Receiver<PathBuf>,
    zone: Option<PathBuf>,
}

impl DropZoneWatcher {
    pub fn new() -> Result<Self, WatcherError> {
        let (tx, rx) = mpsc::channel();
        let watcher = RecommendedWatcher::new(
            move |res| {
                if let Ok(event) = res {
                    for path in arrival_paths(event) {
                        let _ = tx.send(path);
                    }
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            watcher,
            rx,
            zone: None,
        })
    }

    /// 開始監看投放區（不遞迴）。 / Starts watching the drop zone, non-recursively.
    pub fn watch(&mut self, zone: impl AsRef<Path>) -> Result<(), WatcherError> {
        let zone = zone.as_ref();
        if !zone.is_dir() {
            return Err(WatcherError::NotADirectory(zone.to_path_buf()));
        }
        if let Some(previous) = self.zone.take() {
            let _ = self.watcher.unwatch(&previous);
        }
        self.watcher.watch(zone, RecursiveMode::NonRecursive)?;
        debug!(zone = %zone.display(), "watching drop zone");
        self.zone = Some(zone.to_path_buf());
        Ok(())
    }

    pub fn unwatch(&mut self) -> Result<(), WatcherError> {
        if let Some(zone) = self.zone.take() {
            self.watcher.unwatch(&zone)?;
        }
        Ok(())
    }

    pub fn zone(&self) -> Option<&Path> {
        self.zone.as_deref()
    }

    /// 在期限內等待下一個檔案，逾時回傳 `None`。 / Waits up to `timeout` for the next file arrival.
    pub fn next_arrival(&self, timeout: Duration) -> Result<Option<Arrival>, WatcherError> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let path = match self.rx.recv_timeout(remaining) {
                Ok(path) => path,
                Err(mpsc::RecvTimeoutError::Timeout) => return Ok(None),
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(WatcherError::ChannelDisconnected)
                }
            };
            // create events for directories and files already moved away are noise
            if path.is_file() {
                return Ok(Some(Arrival { path }));
            }
            trace!(path = %path.display(), "ignoring non-file event");
        }
    }

    /// 取出所有已排隊的檔案（非阻塞）。 / Drains queued arrivals without blocking.
    pub fn drain(&self) -> Vec<Arrival> {
        let mut arrivals: Vec<Arrival> = Vec::new();
        while let Ok(path) = self.rx.try_recv() {
            if path.is_file() && !arrivals.iter().any(|a| a.path == path) {
                arrivals.push(Arrival { path });
            }
        }
        arrivals
    }
}

fn arrival_paths(event: notify::Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) => event.paths,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.into_iter().skip(1).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths,
        _ => Vec::new(),
    }
}
