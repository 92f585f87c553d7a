use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dropsort_core::{
    classify, Batch, BatchOrchestrator, CategoryTable, DropZoneWatcher, FileRelocator,
    FolderProvisioner, OsFileSystem, TaskState, TracingSink,
};
use dropsort_settings::{StorageConfig, StorageConfigStore};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "dropsort-cli",
    about = "Sort dropped files into category folders by extension",
    author,
    version
)]
struct Cli {
    /// 指定設定檔資料夾；預設為使用者設定目錄。 / Directory holding storage-config.json (defaults to the per-user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 選擇儲存位置並建立分類資料夾。 / Choose the storage folder and create category folders.
    Setup(SetupArgs),
    /// 顯示目前的儲存設定。 / Print the persisted storage configuration.
    Config,
    /// 顯示檔名對應的分類。 / Show the category each file name maps to.
    Classify(ClassifyArgs),
    /// 將檔案搬入分類資料夾。 / Move files into their category folders.
    Organize(OrganizeArgs),
    /// 監看投放區並自動整理。 / Watch a drop zone and organize new files as they arrive.
    Watch(WatchArgs),
}

#[derive(Args)]
struct SetupArgs {
    /// 儲存根目錄。 / Base folder that will hold the category folders.
    #[arg(value_name = "BASE")]
    base: PathBuf,
}

#[derive(Args)]
struct ClassifyArgs {
    #[arg(required = true, value_name = "NAME")]
    names: Vec<String>,
}

#[derive(Args)]
struct OrganizeArgs {
    /// 要整理的檔案或資料夾。 / Files or directories to organize.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// 覆寫設定中的儲存根目錄。 / Override the configured base folder.
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// 遞迴收集子資料夾中的檔案。 / Descend into subdirectories.
    #[arg(long)]
    recursive: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// 投放區資料夾。 / Drop-zone directory to watch.
    #[arg(value_name = "DROP_ZONE")]
    zone: PathBuf,

    /// 覆寫設定中的儲存根目錄。 / Override the configured base folder.
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// 檔案出現後等待寫入完成的毫秒數。 / Milliseconds to let a new file settle before moving it.
    #[arg(long, default_value_t = 500, value_name = "MS")]
    settle_ms: u64,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,dropsort_core=info,dropsort_settings=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let Cli {
        config_dir,
        command,
    } = Cli::parse();
    let store = match config_dir {
        Some(dir) => StorageConfigStore::in_dir(resolve_input_path(&dir)?),
        None => StorageConfigStore::at_default_location(),
    };
    debug!(path = %store.path().display(), "using storage config");

    match command {
        Commands::Setup(args) => execute_setup(args, &store),
        Commands::Config => execute_config(&store),
        Commands::Classify(args) => execute_classify(args, &store),
        Commands::Organize(args) => execute_organize(args, &store),
        Commands::Watch(args) => execute_watch(args, &store),
    }
}

fn execute_setup(args: SetupArgs, store: &StorageConfigStore) -> Result<()> {
    let base = resolve_input_path(&args.base)?;
    let config = StorageConfig::new_configured(&base);
    let folders = FolderProvisioner::new()
        .ensure_folders(&config.base_path, &config.folder_names())
        .with_context(|| format!("failed to create folders under {}", base.display()))?;
    store
        .save(&config)
        .with_context(|| format!("failed to save config to {}", store.path().display()))?;
    println!(
        "Created {} category folders under {}",
        folders.len(),
        base.display()
    );
    Ok(())
}

fn execute_config(store: &StorageConfigStore) -> Result<()> {
    match store.load() {
        Some(config) => {
            let payload =
                serde_json::to_string_pretty(&config).context("failed to render config")?;
            println!("{payload}");
        }
        None => println!("Not configured (run `dropsort-cli setup <BASE>`)"),
    }
    Ok(())
}

fn execute_classify(args: ClassifyArgs, store: &StorageConfigStore) -> Result<()> {
    let table = store.load_configured().map(|config| config.category_table());
    for name in &args.names {
        let category = match &table {
            Some(table) => table.classify(name),
            None => classify(name),
        };
        println!("{name} -> {category}");
    }
    Ok(())
}

fn execute_organize(args: OrganizeArgs, store: &StorageConfigStore) -> Result<()> {
    let (base, table) = resolve_target(args.base.as_deref(), store)?;
    let mut files = collect_files(&args.paths, args.recursive)?;
    let before = files.len();
    files.retain(|path| !path.starts_with(&base));
    if files.len() < before {
        info!(
            skipped = before - files.len(),
            base = %base.display(),
            "skipping files already inside the base folder"
        );
    }
    if files.is_empty() {
        println!("No files to organize");
        return Ok(());
    }

    FolderProvisioner::new()
        .ensure_folders(&base, &table.category_names())
        .with_context(|| format!("failed to create folders under {}", base.display()))?;

    let mut batch = Batch::new();
    batch.add_paths(files, &table, &OsFileSystem);

    let orchestrator = BatchOrchestrator::with_parts(FileRelocator::new(), table, TracingSink);
    let stats = orchestrator.process_batch_with(&base, batch.tasks_mut(), |task, _| {
        match task.state {
            TaskState::Succeeded => {
                let landed = task
                    .final_path
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                println!("[ok]   {} -> {}", task.display_name, landed);
            }
            TaskState::Failed => println!(
                "[fail] {}: {}",
                task.display_name,
                task.error_detail.as_deref().unwrap_or("unknown error")
            ),
            TaskState::Pending | TaskState::InProgress => {}
        }
    });

    println!(
        "Organized {} of {} files ({} failed)",
        stats.succeeded, stats.total, stats.failed
    );
    Ok(())
}

fn execute_watch(args: WatchArgs, store: &StorageConfigStore) -> Result<()> {
    let (base, table) = resolve_target(args.base.as_deref(), store)?;
    let zone = resolve_input_path(&args.zone)?;
    if zone.starts_with(&base) || base.starts_with(&zone) {
        bail!(
            "drop zone '{}' and base folder '{}' must not contain each other",
            zone.display(),
            base.display()
        );
    }

    FolderProvisioner::new()
        .ensure_folders(&base, &table.category_names())
        .with_context(|| format!("failed to create folders under {}", base.display()))?;

    let mut watcher = DropZoneWatcher::new().context("failed to start watcher")?;
    watcher
        .watch(&zone)
        .with_context(|| format!("failed to watch {}", zone.display()))?;
    let orchestrator = BatchOrchestrator::with_parts(FileRelocator::new(), table, TracingSink);
    let settle = Duration::from_millis(args.settle_ms);
    println!(
        "Watching {} (organizing into {}); press Ctrl+C to stop",
        zone.display(),
        base.display()
    );

    loop {
        let Some(first) = watcher
            .next_arrival(Duration::from_secs(1))
            .context("watcher stopped")?
        else {
            continue;
        };
        thread::sleep(settle);

        let mut paths = vec![first.path];
        for arrival in watcher.drain() {
            if !paths.contains(&arrival.path) {
                paths.push(arrival.path);
            }
        }
        info!(count = paths.len(), "new files in drop zone");

        let mut batch = Batch::new();
        batch.add_paths(paths, orchestrator.table(), &OsFileSystem);
        let stats = orchestrator.process_batch(&base, batch.tasks_mut());
        for task in batch.tasks() {
            if task.state == TaskState::Failed {
                warn!(file = %task.display_name, "not organized");
            }
        }
        println!(
            "Organized {} of {} files ({} failed)",
            stats.succeeded, stats.total, stats.failed
        );
    }
}

fn resolve_target(
    base_override: Option<&Path>,
    store: &StorageConfigStore,
) -> Result<(PathBuf, CategoryTable)> {
    let config = store.load_configured();
    let table = config
        .as_ref()
        .map(StorageConfig::category_table)
        .unwrap_or_default();
    let base = match (base_override, config) {
        (Some(path), _) => resolve_input_path(path)?,
        (None, Some(config)) => config.base_path,
        (None, None) => bail!(
            "storage folder is not configured; run `dropsort-cli setup <BASE>` or pass --base"
        ),
    };
    Ok((base, table))
}

fn collect_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = resolve_input_path(path)?;
        if path.is_dir() {
            let walker = WalkDir::new(&path)
                .min_depth(1)
                .max_depth(if recursive { usize::MAX } else { 1 })
                .sort_by_file_name();
            for entry in walker {
                let entry =
                    entry.with_context(|| format!("failed to scan {}", path.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            // missing files still enter the batch so they are reported as failures
            files.push(path);
        }
    }
    Ok(files)
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
