//! Repository walking: ignore rules, `.gitignore` folding, and the
//! two-pass collect-then-classify scan.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::classify::FileClassifier;
use crate::config::{
    AtlasConfig, BACKUP_FILE, CONFIG_FILE, SESSION_FILE, STATE_FILE, ScanSection, TEMP_FILE,
};
use crate::error::ScanError;

/// Directory (and file) names pruned from every scan.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "node_modules",
    "venv",
    ".venv",
    ".env",
    "dist",
    "build",
    ".idea",
    ".vscode",
    "target",
    "bin",
    "obj",
];

/// Binary and asset extensions never worth scanning.
pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    "pyc", "o", "exe", "so", "dll", "class", "png", "jpg", "jpeg", "gif", "ico", "svg", "woff",
    "woff2", "ttf", "eot",
];

/// Atlas' own bookkeeping files.
const OWN_FILES: &[&str] = &[STATE_FILE, BACKUP_FILE, TEMP_FILE, SESSION_FILE, CONFIG_FILE];

/// Ignore configuration assembled once per scan.
#[derive(Debug, Clone, Default)]
pub struct ScanRules {
    ignore_names: HashSet<String>,
    ignore_extensions: HashSet<String>,
    patterns: Vec<glob::Pattern>,
}

impl ScanRules {
    /// Built-in sets plus configured extras; no `.gitignore`.
    pub fn builtin(config: &ScanSection) -> Self {
        let ignore_names = DEFAULT_IGNORE_DIRS
            .iter()
            .chain(OWN_FILES)
            .map(|s| (*s).to_string())
            .chain(config.extra_ignore_dirs.iter().cloned())
            .collect();
        let ignore_extensions = DEFAULT_IGNORE_EXTENSIONS
            .iter()
            .map(|s| (*s).to_string())
            .chain(
                config
                    .extra_ignore_extensions
                    .iter()
                    .map(|e| e.trim_start_matches('.').to_ascii_lowercase()),
            )
            .collect();
        Self {
            ignore_names,
            ignore_extensions,
            patterns: Vec::new(),
        }
    }

    /// Built-in rules augmented by `<root>/.gitignore` when enabled.
    pub fn for_root(root: &Path, config: &ScanSection) -> Self {
        let mut rules = Self::builtin(config);
        if config.use_gitignore {
            let path = root.join(".gitignore");
            match std::fs::read_to_string(&path) {
                Ok(text) => rules.add_gitignore(&text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Cannot read .gitignore"),
            }
        }
        rules
    }

    /// Fold `.gitignore` lines into the rules.
    ///
    /// Lines ending in `/` also name ignored directories. Every non-comment
    /// line is kept as a filename glob.
    pub fn add_gitignore(&mut self, text: &str) {
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(dir) = line.strip_suffix('/') {
                self.ignore_names.insert(dir.to_string());
            }
            match glob::Pattern::new(line) {
                Ok(p) => self.patterns.push(p),
                Err(e) => debug!(pattern = line, error = %e, "Skipping unparsable ignore pattern"),
            }
        }
    }

    /// Applied to both directory and file names.
    pub fn is_ignored(&self, name: &str) -> bool {
        if self.ignore_names.contains(name) {
            return true;
        }
        if let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) {
            if self.ignore_extensions.contains(&ext.to_ascii_lowercase()) {
                return true;
            }
        }
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// Result of one scan pass.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Every non-ignored file, readable or not.
    pub total_files: usize,
    /// Significant files keyed by forward-slash relative path, with size.
    pub significant: BTreeMap<String, u64>,
    /// Files whose size could not be read.
    pub unreadable: usize,
    pub outlier_threshold: Option<f64>,
}

impl ScanReport {
    pub fn significant_count(&self) -> usize {
        self.significant.len()
    }

    pub fn significant_paths(&self) -> BTreeSet<String> {
        self.significant.keys().cloned().collect()
    }
}

/// Walks a repository and drives the classifier over every candidate file.
#[derive(Debug)]
pub struct RepositoryScanner {
    root: PathBuf,
    rules: ScanRules,
    classifier: FileClassifier,
}

impl RepositoryScanner {
    pub fn new(root: &Path, rules: ScanRules, classifier: FileClassifier) -> Self {
        Self {
            root: root.to_path_buf(),
            rules,
            classifier,
        }
    }

    pub fn from_config(root: &Path, config: &AtlasConfig) -> Self {
        Self::new(
            root,
            ScanRules::for_root(root, &config.scan),
            FileClassifier::new(&config.classification),
        )
    }

    /// Collect `(path, size)` for every file, calibrate the outlier
    /// threshold on the full sample, then classify.
    #[instrument(skip_all, name = "scan", fields(root = %self.root.display()))]
    pub fn scan(&mut self) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        std::fs::read_dir(&self.root).map_err(|source| ScanError::Root {
            path: self.root.clone(),
            source,
        })?;

        let mut report = ScanReport::default();
        let mut collected: Vec<(String, u64)> = Vec::new();

        let rules = &self.rules;
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !rules.is_ignored(&e.file_name().to_string_lossy()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            // Follows symlinks; a dangling link lands in the error arm.
            let size = match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(meta) => Some(meta.len()),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Cannot read file size");
                    None
                }
            };

            report.total_files += 1;
            match size {
                Some(size) => collected.push((self.relative(entry.path()), size)),
                None => report.unreadable += 1,
            }
        }

        let sizes: Vec<u64> = collected.iter().map(|(_, size)| *size).collect();
        self.classifier.calibrate(&sizes);
        report.outlier_threshold = self.classifier.outlier_threshold();

        for (path, size) in collected {
            if self.classifier.is_significant(&path, size) {
                report.significant.insert(path, size);
            }
        }

        info!(
            total = report.total_files,
            significant = report.significant_count(),
            unreadable = report.unreadable,
            duration = ?start.elapsed(),
            "Scan complete"
        );
        Ok(report)
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
