use once_cell::sync::Lazy;

/// 未列於任何規則的副檔名所歸入的分類。 / Category used when no rule claims an extension.
pub const FALLBACK_CATEGORY: &str = "Others";

static DEFAULT_TABLE: Lazy<CategoryTable> = Lazy::new(|| {
    CategoryTable::new(vec![
        CategoryRule::new(
            "Videos",
            ["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"],
        ),
        CategoryRule::new(
            "Images",
            ["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"],
        ),
        CategoryRule::new("PDFs", ["pdf"]),
        CategoryRule::new("Excel", ["xlsx", "xls", "xlsm", "csv"]),
        CategoryRule::new("Word", ["docx", "doc", "rtf"]),
        CategoryRule::new("PowerPoint", ["pptx", "ppt"]),
        CategoryRule::new("ZIP", ["zip", "rar", "7z", "tar", "gz"]),
        CategoryRule::new("Audio", ["mp3", "wav", "flac", "aac", "ogg", "wma"]),
        CategoryRule::new("Text", ["txt", "md", "json", "xml", "html", "css", "js"]),
    ])
});

/// 單一分類與其副檔名集合。 / A category name together with the extensions routed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub extensions: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self {
            name: name.into(),
            extensions: normalized,
        }
    }

    pub fn matches(&self, extension: &str) -> bool {
        self.extensions.iter().any(|candidate| candidate == extension)
    }
}

/// 依序比對的分類表，找不到時回到備援分類。 /
/// Ordered rule list resolved first-match, falling back to a default category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self::with_fallback(rules, FALLBACK_CATEGORY)
    }

    pub fn with_fallback(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// 內建的預設分類表。 / The built-in extension table.
    pub fn default_table() -> &'static CategoryTable {
        &DEFAULT_TABLE
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// 依檔名判斷分類。 / Resolves the category for a file name.
    pub fn classify(&self, file_name: &str) -> &str {
        let extension = extension_of(file_name);
        if extension.is_empty() {
            return &self.fallback;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&extension))
            .map(|rule| rule.name.as_str())
            .unwrap_or(&self.fallback)
    }

    /// 需要建立的資料夾名稱（含備援分類）。 / Folder names to provision, fallback last.
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.rules.len() + 1);
        for rule in &self.rules {
            if !names.contains(&rule.name) {
                names.push(rule.name.clone());
            }
        }
        if !names.iter().any(|name| name == &self.fallback) {
            names.push(self.fallback.clone());
        }
        names
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// 使用預設分類表判斷分類。 / Classifies a file name against the built-in table.
pub fn classify(file_name: &str) -> &'static str {
    DEFAULT_TABLE.classify(file_name)
}

/// 取出最後一個 `.` 之後的副檔名（小寫）。 / Lowercased text after the last `.`, or empty.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}
