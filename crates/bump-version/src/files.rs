//! The plain text version store and file modifications.
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
#[error("io error for {path:?}")]
pub struct IoError {
    #[source]
    pub source: std::io::Error,
    pub path: PathBuf,
}

impl IoError {
    pub fn new(source: impl Into<std::io::Error>, path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == std::io::ErrorKind::NotFound
    }
}

/// Contents of a file before and after a version change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub path: PathBuf,
    pub before: Option<String>,
    pub after: String,
}

impl Modification {
    /// Unified diff between the old and new contents.
    ///
    /// Returns `None` if nothing changed.
    #[must_use]
    pub fn diff(&self, label: Option<&str>) -> Option<String> {
        let before = self.before.as_deref().unwrap_or_default();
        if before == self.after {
            return None;
        }
        let label = label
            .map(ToString::to_string)
            .unwrap_or_else(|| self.path.to_string_lossy().to_string());
        let label_existing = format!("{label} (before)");
        let label_new = format!("{label} (after)");
        let diff =
            similar_asserts::SimpleDiff::from_str(before, &self.after, &label_existing, &label_new);
        Some(diff.to_string())
    }
}

/// Read the version from the first line of the text store.
///
/// Surrounding whitespace is stripped, the value is not validated.
///
/// # Errors
/// When the file cannot be read.
pub fn get_version(path: &Path) -> Result<String, IoError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IoError::new(source, path))?;
    let version = contents.lines().next().unwrap_or_default().trim();
    tracing::debug!(?path, version, "read version");
    Ok(version.to_string())
}

/// Overwrite the text store with `version` (without a trailing newline).
///
/// # Errors
/// When the file cannot be written.
pub fn write_text_version(
    path: &Path,
    version: &str,
    dry_run: bool,
) -> Result<Modification, IoError> {
    let before = match std::fs::read_to_string(path) {
        Ok(before) => Some(before),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => return Err(IoError::new(source, path)),
    };

    if dry_run {
        tracing::info!(?path, version, "would write version");
    } else {
        tracing::info!(?path, version, "write version");
        std::fs::write(path, version).map_err(|source| IoError::new(source, path))?;
    }

    Ok(Modification {
        path: path.to_path_buf(),
        before,
        after: version.to_string(),
    })
}
