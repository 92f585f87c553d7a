use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::classifier::CategoryTable;
use crate::fs::{FileSystem, OsFileSystem};
use crate::notification::{NotificationSink, Severity, TracingSink};
use crate::relocator::FileRelocator;
use crate::task::{BatchStats, FileTask, TaskId};

/// 使用者加入的待整理檔案清單。 / The ordered list of files submitted together.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    tasks: Vec<FileTask>,
    next_id: u64,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path<F: FileSystem>(
        &mut self,
        path: impl Into<PathBuf>,
        table: &CategoryTable,
        fs: &F,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(FileTask::from_path(id, path, table, fs));
        id
    }

    pub fn add_paths<I, P, F>(&mut self, paths: I, table: &CategoryTable, fs: &F) -> Vec<TaskId>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
        F: FileSystem,
    {
        paths
            .into_iter()
            .map(|path| self.add_path(path, table, fs))
            .collect()
    }

    pub fn remove(&mut self, id: TaskId) -> Option<FileTask> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn get(&self, id: TaskId) -> Option<&FileTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[FileTask] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut [FileTask] {
        &mut self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats::from_tasks(&self.tasks)
    }
}

/// 依序處理批次中每個檔案。 / Drives classification and relocation over a batch, one file at a time.
pub struct BatchOrchestrator<F = OsFileSystem, N = TracingSink> {
    relocator: FileRelocator<F>,
    table: CategoryTable,
    notifier: N,
}

impl BatchOrchestrator<OsFileSystem, TracingSink> {
    pub fn new() -> Self {
        Self::with_parts(FileRelocator::new(), CategoryTable::default(), TracingSink)
    }
}

impl Default for BatchOrchestrator<OsFileSystem, TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem, N: NotificationSink> BatchOrchestrator<F, N> {
    pub fn with_parts(relocator: FileRelocator<F>, table: CategoryTable, notifier: N) -> Self {
        Self {
            relocator,
            table,
            notifier,
        }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn relocator(&self) -> &FileRelocator<F> {
        &self.relocator
    }

    pub fn process_batch(&self, base: &Path, tasks: &mut [FileTask]) -> BatchStats {
        self.process_batch_with(base, tasks, |_, _| {})
    }

    /// 每個任務到達終態後呼叫 `on_progress`。 / Calls `on_progress` after every terminal transition.
    pub fn process_batch_with<P>(
        &self,
        base: &Path,
        tasks: &mut [FileTask],
        mut on_progress: P,
    ) -> BatchStats
    where
        P: FnMut(&FileTask, &BatchStats),
    {
        let mut stats = BatchStats::from_tasks(tasks);
        info!(base = %base.display(), total = stats.total, "processing batch");

        for index in 0..tasks.len() {
            if !tasks[index].is_pending() {
                debug!(task = %tasks[index].id, state = ?tasks[index].state, "skipping non-pending task");
                continue;
            }
            self.process_task(base, &mut tasks[index]);
            stats = BatchStats::from_tasks(tasks);
            on_progress(&tasks[index], &stats);
        }

        self.report_summary(&stats);
        stats
    }

    fn process_task(&self, base: &Path, task: &mut FileTask) {
        task.start();

        if !self.relocator.file_exists(&task.source_path) {
            warn!(task = %task.id, source = %task.source_path.display(), "source vanished before processing");
            task.fail("source missing");
            self.notifier.notify(
                &format!("{}: source missing", task.display_name),
                Severity::Error,
            );
            return;
        }

        // reclassify with the orchestrator's table; the task may have been built against another
        task.target_category = self.table.classify(&task.display_name).to_string();
        let target = base.join(&task.target_category).join(&task.file_name);

        match self.relocator.move_file(&task.source_path, &target) {
            Ok(final_path) => {
                debug!(task = %task.id, to = %final_path.display(), "organized");
                task.succeed(final_path);
            }
            Err(err) => {
                warn!(task = %task.id, kind = ?err.kind(), "move failed: {err}");
                let detail = err.to_string();
                self.notifier.notify(
                    &format!("{}: {detail}", task.display_name),
                    Severity::Error,
                );
                task.fail(detail);
            }
        }
    }

    fn report_summary(&self, stats: &BatchStats) {
        if stats.processed == 0 {
            self.notifier
                .notify("No pending files to organize", Severity::Info);
        } else if stats.failed == 0 {
            self.notifier.notify(
                &format!("Organized {} files", stats.succeeded),
                Severity::Success,
            );
        } else {
            self.notifier.notify(
                &format!(
                    "Organized {} of {} files ({} failed)",
                    stats.succeeded, stats.total, stats.failed
                ),
                Severity::Error,
            );
        }
    }
}
