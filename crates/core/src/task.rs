use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::classifier::{extension_of, CategoryTable};
use crate::fs::FileSystem;

/// 批次內唯一的任務識別碼。 / Identifier unique within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

/// 等待整理的單一檔案。 / A single file queued for organizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub id: TaskId,
    pub source_path: PathBuf,
    /// 原始檔名，搬移時使用。 / Raw file name used for the move target.
    pub file_name: OsString,
    /// 僅供顯示的檔名。 / Lossy name for reporting and classification.
    pub display_name: String,
    pub size_bytes: u64,
    pub extension: String,
    pub target_category: String,
    pub state: TaskState,
    pub error_detail: Option<String>,
    /// 成功後的實際落點。 / Where the file ended up once moved.
    pub final_path: Option<PathBuf>,
}

impl FileTask {
    pub fn from_path<F: FileSystem>(
        id: TaskId,
        source_path: impl Into<PathBuf>,
        table: &CategoryTable,
        fs: &F,
    ) -> Self {
        let source_path = source_path.into();
        let file_name = file_name_of(&source_path);
        let display_name = file_name.to_string_lossy().into_owned();
        // unreadable metadata is not fatal here; the move re-checks the source
        let size_bytes = fs.file_size(&source_path).unwrap_or(0);
        Self {
            id,
            extension: extension_of(&display_name),
            target_category: table.classify(&display_name).to_string(),
            display_name,
            file_name,
            size_bytes,
            source_path,
            state: TaskState::Pending,
            error_detail: None,
            final_path: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    pub(crate) fn start(&mut self) {
        self.state = TaskState::InProgress;
        self.error_detail = None;
    }

    pub(crate) fn succeed(&mut self, final_path: PathBuf) {
        self.state = TaskState::Succeeded;
        self.final_path = Some(final_path);
    }

    pub(crate) fn fail(&mut self, detail: impl Into<String>) {
        self.state = TaskState::Failed;
        self.error_detail = Some(detail.into());
    }
}

fn file_name_of(path: &Path) -> OsString {
    path.file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| path.as_os_str().to_os_string())
}

/// 批次統計。 / Aggregate counters over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn from_tasks(tasks: &[FileTask]) -> Self {
        let mut stats = BatchStats {
            total: tasks.len(),
            ..BatchStats::default()
        };
        for task in tasks {
            match task.state {
                TaskState::Succeeded => stats.succeeded += 1,
                TaskState::Failed => stats.failed += 1,
                TaskState::Pending | TaskState::InProgress => {}
            }
        }
        stats.processed = stats.succeeded + stats.failed;
        stats
    }

    /// 已處理的百分比（0–100）。 / Share of processed tasks, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}
