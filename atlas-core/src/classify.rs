//! File significance heuristics.
//!
//! A file is significant when it plausibly carries architecture: large
//! enough to matter, outside data/asset directories, not a data format,
//! and not a statistical size outlier unless it is source code. The
//! outlier threshold is a whole-corpus statistic, so the classifier is
//! fed the complete size sample of a scan before any file is judged.

use std::collections::HashSet;
use std::path::Path;

use crate::config::ClassificationSection;

/// Data and asset directory names that never hold significant files.
pub const DEFAULT_DATA_DIRECTORIES: &[&str] = &[
    "data",
    "assets",
    "static",
    "public",
    "resources",
    "fixtures",
    "samples",
    "wordlists",
    "locales",
    "sounds",
    "themes",
    "node_modules",
    "vendor",
];

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "py", "pyi", "js", "jsx", "mjs", "cjs", "ts", "tsx", "go", "java", "kt", "kts",
    "scala", "c", "h", "cc", "cpp", "cxx", "hpp", "hh", "cs", "fs", "rb", "php", "swift", "m",
    "mm", "lua", "pl", "pm", "r", "sh", "bash", "zsh", "fish", "ps1", "sql", "dart", "ex", "exs",
    "erl", "hrl", "hs", "ml", "mli", "clj", "cljs", "elm", "vue", "svelte", "zig", "nim", "jl",
    "groovy", "f90", "proto", "graphql",
];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "xml", "properties", "env", "gradle",
    "plist", "tf", "hcl",
];

const DATA_EXTENSIONS: &[&str] = &[
    "csv", "tsv", "jsonl", "ndjson", "parquet", "avro", "orc", "arrow", "feather", "dat", "db",
    "sqlite", "sqlite3", "pkl", "pickle", "npy", "npz", "h5", "hdf5", "xls", "xlsx", "geojson",
    "dic", "mp3", "wav", "ogg", "mp4", "bin",
];

/// Minimum sample count before the outlier threshold is defined.
const MIN_OUTLIER_SAMPLES: usize = 10;

/// Coarse role of a file, decided by extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Code,
    Config,
    Data,
    Unknown,
}

impl FileCategory {
    pub fn of(path: &str) -> Self {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
            return if name == "Dockerfile" {
                Self::Config
            } else {
                Self::Unknown
            };
        };
        let ext = ext.to_ascii_lowercase();
        if CODE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Code
        } else if CONFIG_EXTENSIONS.contains(&ext.as_str()) {
            Self::Config
        } else if DATA_EXTENSIONS.contains(&ext.as_str()) {
            Self::Data
        } else {
            Self::Unknown
        }
    }
}

/// IQR-style upper fence over a size sample: `Q3 + 3 * (Q3 - Q1)`.
///
/// Quartiles are taken at indices `n/4` and `3n/4` of the sorted sample.
/// Returns `None` (no outliers) for fewer than ten samples.
#[allow(clippy::cast_precision_loss)]
pub fn outlier_threshold(sizes: &[u64]) -> Option<f64> {
    if sizes.len() < MIN_OUTLIER_SAMPLES {
        return None;
    }
    let mut sorted = sizes.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let q1 = sorted[n / 4] as f64;
    let q3 = sorted[3 * n / 4] as f64;
    Some(q3 + 3.0 * (q3 - q1))
}

/// Decides whether a file counts toward the documentation denominator.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    size_threshold_kb: f64,
    max_config_size_kb: f64,
    data_directories: HashSet<String>,
    outlier_threshold: Option<f64>,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(&ClassificationSection::default())
    }
}

impl FileClassifier {
    pub fn new(config: &ClassificationSection) -> Self {
        let data_directories = DEFAULT_DATA_DIRECTORIES
            .iter()
            .map(|d| (*d).to_string())
            .chain(config.extra_data_directories.iter().map(|d| d.to_lowercase()))
            .collect();
        Self {
            size_threshold_kb: config.size_threshold_kb,
            max_config_size_kb: config.max_config_size_kb,
            data_directories,
            outlier_threshold: None,
        }
    }

    /// Fix the outlier threshold from the complete size sample of a scan.
    pub fn calibrate(&mut self, sizes: &[u64]) {
        self.outlier_threshold = outlier_threshold(sizes);
    }

    pub fn outlier_threshold(&self) -> Option<f64> {
        self.outlier_threshold
    }

    /// First matching rule wins: size floor, data directory, outlier
    /// (non-code only), then per-category policy.
    #[allow(clippy::cast_precision_loss)]
    pub fn is_significant(&self, relative_path: &str, size_bytes: u64) -> bool {
        let size_kb = size_bytes as f64 / 1024.0;
        if size_kb < self.size_threshold_kb {
            return false;
        }
        if self.in_data_directory(relative_path) {
            return false;
        }

        let category = FileCategory::of(relative_path);
        if category != FileCategory::Code {
            if let Some(threshold) = self.outlier_threshold {
                if size_bytes as f64 > threshold {
                    return false;
                }
            }
        }

        match category {
            FileCategory::Code | FileCategory::Unknown => true,
            FileCategory::Data => false,
            FileCategory::Config => size_kb < self.max_config_size_kb,
        }
    }

    /// Any path segment, the file name included.
    fn in_data_directory(&self, relative_path: &str) -> bool {
        relative_path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .any(|s| self.data_directories.contains(&s.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated(sizes: &[u64]) -> FileClassifier {
        let mut c = FileClassifier::default();
        c.calibrate(sizes);
        c
    }

    #[test]
    fn size_floor_is_one_kib() {
        let c = FileClassifier::default();
        assert!(!c.is_significant("test.py", 500));
        assert!(c.is_significant("test.py", 1024));
        assert!(c.is_significant("test.py", 2048));
    }

    #[test]
    fn data_directories_excluded_case_insensitive() {
        let c = FileClassifier::default();
        assert!(!c.is_significant("app/Assets/logo.rs", 4096));
        assert!(!c.is_significant("src\\fixtures\\big.py", 4096));
        assert!(!c.is_significant("node_modules/pkg/index.js", 4096));
        assert!(c.is_significant("src/database.rs", 4096));
    }

    #[test]
    fn file_named_like_data_dir_is_excluded() {
        let c = FileClassifier::default();
        assert!(!c.is_significant("src/data", 4096));
        assert!(!c.is_significant("vendor", 4096));
        assert!(!c.is_significant("src/Static", 4096));
        assert!(c.is_significant("src/data.rs", 4096));
    }

    #[test]
    fn extra_data_directories_from_config() {
        let config = ClassificationSection {
            extra_data_directories: vec!["Corpus".into()],
            ..ClassificationSection::default()
        };
        let c = FileClassifier::new(&config);
        assert!(!c.is_significant("corpus/en.py", 4096));
    }

    #[test]
    fn categories_by_extension() {
        assert_eq!(FileCategory::of("src/main.RS"), FileCategory::Code);
        assert_eq!(FileCategory::of("deploy/app.yaml"), FileCategory::Config);
        assert_eq!(FileCategory::of("Dockerfile"), FileCategory::Config);
        assert_eq!(FileCategory::of("docker/Dockerfile"), FileCategory::Config);
        assert_eq!(FileCategory::of("words.csv"), FileCategory::Data);
        assert_eq!(FileCategory::of("README.md"), FileCategory::Unknown);
        assert_eq!(FileCategory::of("Makefile"), FileCategory::Unknown);
    }

    #[test]
    fn category_policy() {
        let c = FileClassifier::default();
        assert!(c.is_significant("src/lib.rs", 4096));
        assert!(!c.is_significant("export.csv", 4096));
        assert!(c.is_significant("config.json", 10 * 1024));
        assert!(!c.is_significant("package-lock.json", 60 * 1024));
        assert!(c.is_significant("NOTES.md", 4096));
    }

    #[test]
    fn quartiles_use_integer_indices() {
        // n = 12: Q1 = sorted[3] = 4, Q3 = sorted[9] = 10 → 10 + 3*6 = 28
        let sizes: Vec<u64> = (1..=12).collect();
        assert_eq!(outlier_threshold(&sizes), Some(28.0));
    }

    #[test]
    fn threshold_undefined_below_ten_samples() {
        assert_eq!(outlier_threshold(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), None);
        let c = calibrated(&[2048; 9]);
        assert!(c.is_significant("huge.json", 40 * 1024));
    }

    #[test]
    fn oversized_non_code_is_excluded_but_code_kept() {
        let mut sizes = vec![2048u64; 20];
        sizes.push(2 * 1024 * 1024);
        let c = calibrated(&sizes);
        // Q1 = Q3 = 2048, so anything above 2048 bytes is an outlier.
        assert_eq!(c.outlier_threshold(), Some(2048.0));
        assert!(!c.is_significant("wordlist.txt", 2 * 1024 * 1024));
        assert!(!c.is_significant("settings.toml", 3000));
        assert!(c.is_significant("src/generated_parser.rs", 2 * 1024 * 1024));
        assert!(c.is_significant("src/small.txt", 2048));
    }
}
