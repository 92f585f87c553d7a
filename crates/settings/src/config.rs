use std::path::{Component, Path, PathBuf};

use dropsort_core::{CategoryRule, CategoryTable, FALLBACK_CATEGORY};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FolderConfig {
    pub fn new(name: &str, icon: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub base_path: PathBuf,
    #[serde(default = "default_folders")]
    pub folders: Vec<FolderConfig>,
    #[serde(default)]
    pub is_configured: bool,
}

impl StorageConfig {
    pub fn new_configured(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let mut folders = default_folders();
        for folder in &mut folders {
            folder.path = Some(base_path.join(&folder.name));
        }
        Self {
            base_path,
            folders,
            is_configured: true,
        }
    }

    pub fn folder_names(&self) -> Vec<String> {
        self.category_table().category_names()
    }

    /// Folders with extensions become rules in file order; the fallback is the
    /// first folder without extensions, or `Others` when every folder lists some.
    pub fn category_table(&self) -> CategoryTable {
        let mut rules = Vec::new();
        let mut fallback: Option<&str> = None;
        for folder in &self.folders {
            if folder.extensions.is_empty() {
                fallback.get_or_insert(folder.name.as_str());
            } else {
                rules.push(CategoryRule::new(folder.name.clone(), &folder.extensions));
            }
        }
        CategoryTable::with_fallback(rules, fallback.unwrap_or(FALLBACK_CATEGORY))
    }

    pub(crate) fn sanitize(&mut self) {
        self.folders.retain(|folder| {
            let keep = is_plain_folder_name(&folder.name);
            if !keep {
                warn!(name = %folder.name, "ignoring folder name that is not a single path segment");
            }
            keep
        });
        if self.folders.is_empty() {
            self.folders = default_folders();
        }
        if self.base_path.as_os_str().is_empty() {
            self.is_configured = false;
        }
    }
}

/// 資料夾名稱必須是單一路徑段，不能跳出根目錄。 /
/// A folder name must be one plain path segment so it stays under the base folder.
pub fn is_plain_folder_name(name: &str) -> bool {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

pub fn default_folders() -> Vec<FolderConfig> {
    vec![
        FolderConfig::new(
            "Videos",
            "🎥",
            &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"],
        ),
        FolderConfig::new(
            "Images",
            "🖼️",
            &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"],
        ),
        FolderConfig::new("PDFs", "📄", &["pdf"]),
        FolderConfig::new("Excel", "📊", &["xlsx", "xls", "xlsm", "csv"]),
        FolderConfig::new("Word", "📝", &["docx", "doc", "rtf"]),
        FolderConfig::new("PowerPoint", "📈", &["pptx", "ppt"]),
        FolderConfig::new("ZIP", "🗜️", &["zip", "rar", "7z", "tar", "gz"]),
        FolderConfig::new("Audio", "🎵", &["mp3", "wav", "flac", "aac", "ogg", "wma"]),
        FolderConfig::new(
            "Text",
            "📋",
            &["txt", "md", "json", "xml", "html", "css", "js"],
        ),
        FolderConfig::new(FALLBACK_CATEGORY, "📁", &[]),
    ]
}
