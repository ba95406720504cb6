use std::path::PathBuf;

/// Top-level Atlas error type.
///
/// All fallible operations in `atlas-core` return [`Result<T, AtlasError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    /// Error loading or persisting the state document.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Error walking the repository tree.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A mutation was refused because its input is unusable.
    #[error("Input rejected: {0}")]
    Intake(#[from] IntakeError),
}

/// Errors from the JSON state document and its side files.
#[derive(thiserror::Error, Debug)]
pub enum StateError {
    /// Filesystem I/O failed while reading or writing state.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// State could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document failed to parse and no usable backup exists.
    #[error("{path} is corrupted and no usable backup exists at {backup}")]
    Corrupted {
        /// Primary document path.
        path: PathBuf,
        /// Backup document path that was tried.
        backup: PathBuf,
    },

    /// No state document exists yet.
    #[error("project is not initialized (no {0})")]
    NotInitialized(PathBuf),
}

/// Errors while scanning the repository.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root itself cannot be read.
    #[error("Cannot read scan root {path}: {source}")]
    Root {
        /// Root directory of the scan.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Errors in Atlas configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Cannot read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Input rejected at an intake boundary. State is left unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The named system does not exist.
    #[error("system '{0}' not found")]
    UnknownSystem(String),

    /// Descriptions must stay on a single line.
    #[error("description for '{0}' contains a newline; use a single-line description")]
    MultilineDescription(String),

    /// System names must contain at least one non-whitespace character.
    #[error("system name must not be empty")]
    EmptyName,
}

/// Convenience alias for `Result<T, AtlasError>`.
pub type Result<T> = std::result::Result<T, AtlasError>;

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
