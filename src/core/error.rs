use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the installation core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Install profile ─────────────────────────────────
    #[error("Install profile is undefined or incomplete: {0}")]
    UndefinedInstallProfile(String),

    #[error("Unresolved Maven coordinate: {0}")]
    UnresolvedCoordinate(String),

    #[error("Install data entry not found: {0}")]
    MissingInstallData(String),

    #[error("Library not declared in install profile: {0}")]
    UnmatchedLibrary(String),

    // ── Processors ──────────────────────────────────────
    #[error("Stage {stage} exited with code {code:?}")]
    StageFailed { stage: String, code: Option<i32> },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    OutputMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Java ────────────────────────────────────────────
    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    // ── Loader ──────────────────────────────────────────
    #[error("Unknown mod loader type: {0}")]
    UnknownLoaderType(String),

    #[error("Loader handler returned no assets for {0}")]
    NullLoaderAssets(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// The launcher UI only ever shows the message, so the error crosses the
// boundary as a plain string.
impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
