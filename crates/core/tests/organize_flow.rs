use std::fs;

use dropsort_core::{
    Batch, BatchOrchestrator, BatchStats, CategoryTable, FileRelocator, FolderProvisioner,
    OsFileSystem, SilentSink, TaskState,
};
use tempfile::tempdir;

#[test]
fn provision_then_organize_a_mixed_drop() {
    let dir = tempdir().expect("temp dir");
    let inbox = dir.path().join("inbox");
    let base = dir.path().join("Organized");
    fs::create_dir_all(&inbox).unwrap();

    let table = CategoryTable::default_table();
    FolderProvisioner::new()
        .ensure_folders(&base, &table.category_names())
        .expect("provision");

    // An earlier photo already sits in Images.
    fs::write(base.join("Images").join("photo.jpg"), b"old").unwrap();

    let names = ["photo.jpg", "clip.MOV", "budget.xlsx", "README", "archive.tar.gz"];
    for name in names {
        fs::write(inbox.join(name), name.as_bytes()).unwrap();
    }

    let mut batch = Batch::new();
    batch.add_paths(names.map(|name| inbox.join(name)), table, &OsFileSystem);

    let orchestrator = BatchOrchestrator::with_parts(FileRelocator::new(), table.clone(), SilentSink);
    let stats = orchestrator.process_batch(&base, batch.tasks_mut());

    assert_eq!(
        stats,
        BatchStats {
            total: 5,
            processed: 5,
            succeeded: 5,
            failed: 0
        }
    );
    assert!(batch
        .tasks()
        .iter()
        .all(|task| task.state == TaskState::Succeeded));

    assert_eq!(fs::read(base.join("Images/photo.jpg")).unwrap(), b"old");
    assert_eq!(fs::read(base.join("Images/photo_1.jpg")).unwrap(), b"photo.jpg");
    assert!(base.join("Videos/clip.MOV").exists());
    assert!(base.join("Excel/budget.xlsx").exists());
    assert!(base.join("Others/README").exists());
    assert!(base.join("ZIP/archive.tar.gz").exists());
    assert_eq!(fs::read_dir(&inbox).unwrap().count(), 0);
}
