pub mod batch;
pub mod classifier;
pub mod fs;
pub mod notification;
pub mod provisioner;
pub mod relocator;
pub mod task;
pub mod watcher;

pub use batch::{Batch, BatchOrchestrator};
pub use classifier::{classify, extension_of, CategoryRule, CategoryTable, FALLBACK_CATEGORY};
pub use fs::{is_cross_device, FileSystem, OsFileSystem};
pub use notification::{NotificationSink, Severity, SilentSink, TracingSink};
pub use provisioner::{FolderProvisioner, ProvisionError};
pub use relocator::{
    FileRelocator, RelocateError, RelocateErrorKind, DEFAULT_MAX_COLLISION_SUFFIX,
};
pub use task::{BatchStats, FileTask, TaskId, TaskState};
pub use watcher::{Arrival, DropZoneWatcher, WatcherError};
