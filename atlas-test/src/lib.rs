// Fixture repositories for end-to-end survey tests.

use std::path::Path;

use atlas_core::config::AtlasConfig;
use atlas_core::survey::Survey;

/// Significant files of [`TestRepo::web_service`], sorted.
pub const WEB_SERVICE_SIGNIFICANT: &[&str] = &[
    "config/settings.yaml",
    "docs/guide.md",
    "src/api/handlers.rs",
    "src/api/routes.rs",
    "src/db/models.rs",
    "src/db/pool.rs",
    "src/generated.rs",
    "src/main.rs",
    "tests/api_test.rs",
];

/// Files [`TestRepo::web_service`] counts toward `total_files_scanned`.
pub const WEB_SERVICE_TOTAL_FILES: usize = 16;

/// Outlier fence of [`TestRepo::web_service`]: Q3 9000 + 3 * (9000 - 2500).
pub const WEB_SERVICE_OUTLIER_THRESHOLD: f64 = 28_500.0;

/// A test fixture with a temporary repository tree.
#[derive(Debug)]
pub struct TestRepo {
    pub dir: tempfile::TempDir,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    /// A small Rust web service with every kind of file the classifier
    /// distinguishes:
    ///
    /// - code, config, and docs above the size floor (significant)
    /// - files below the 1 KB floor
    /// - a data directory and a data-format file
    /// - an oversized config file
    /// - a non-code size outlier next to an exempt oversized code file
    /// - ignored directories, ignored extensions, and `.gitignore` matches
    pub fn web_service() -> Self {
        let repo = Self::empty();

        repo.write_text(".gitignore", "*.log\nlogs/\n");
        repo.write_sized("Cargo.toml", "[package]\nname = \"web-service\"\n", 300);

        repo.write_sized("src/main.rs", "fn main() {\n    api::serve();\n}\n", 3_000);
        repo.write_sized("src/api/routes.rs", "pub fn routes() {}\n", 5_000);
        repo.write_sized("src/api/handlers.rs", "pub fn handle() {}\n", 4_000);
        repo.write_sized("src/db/pool.rs", "pub struct Pool;\n", 2_500);
        repo.write_sized("src/db/models.rs", "pub struct User;\n", 6_000);
        repo.write_sized("src/generated.rs", "// generated bindings\n", 50_000);
        repo.write_sized("src/tiny.rs", "pub const X: u8 = 1;\n", 200);

        repo.write_sized("config/settings.yaml", "port: 8080\n", 2_000);
        repo.write_sized("config/huge.json", "{\"routes\": []}\n", 80_000);
        repo.write_sized("data/seed.sql", "INSERT INTO users VALUES (1);\n", 9_000);
        repo.write_sized("reports/export.csv", "id,name\n", 3_000);

        repo.write_sized("tests/api_test.rs", "#[test]\nfn routes() {}\n", 3_000);
        repo.write_sized("docs/guide.md", "# Guide\n", 4_000);
        repo.write_sized("docs/big_spec.md", "# Full protocol dump\n", 30_000);

        // Never counted.
        repo.write_sized("assets/logo.png", "PNG", 4_000);
        repo.write_sized("node_modules/pkg/index.js", "module.exports = {};\n", 5_000);
        repo.write_sized("target/debug/app", "ELF", 10_000);
        repo.write_sized("app.log", "started\n", 5_000);
        repo.write_sized("logs/out.txt", "ok\n", 500);

        repo
    }

    /// Write `content` verbatim at `rel`, creating parent directories.
    pub fn write_text(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(path, content).expect("write fixture file");
    }

    /// Write `header` padded with comment filler to exactly `bytes` bytes.
    pub fn write_sized(&self, rel: &str, header: &str, bytes: usize) {
        let mut content = String::with_capacity(bytes);
        content.push_str(header);
        while content.len() < bytes {
            content.push_str("// filler\n");
        }
        content.truncate(bytes);
        self.write_text(rel, &content);
    }

    pub fn write_config(&self, toml: &str) {
        self.write_text(atlas_core::config::CONFIG_FILE, toml);
    }

    pub fn config(&self) -> AtlasConfig {
        AtlasConfig::load(self.path()).expect("load fixture config")
    }

    /// Initialize a survey named `name` and open it.
    pub fn init_survey(&self, name: &str) -> Survey {
        let config = self.config();
        Survey::init(self.path(), &config, name, false).expect("init survey");
        self.open_survey()
    }

    /// Open the existing survey, as a fresh process would.
    pub fn open_survey(&self) -> Survey {
        Survey::open(self.path(), &self.config()).expect("open survey")
    }
}
