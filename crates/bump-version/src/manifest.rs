//! Format preserving edits of the `project.version` field of a `pyproject.toml` manifest.
use crate::files::{IoError, Modification};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("manifest {0:?} not found")]
    NotFound(PathBuf),
    #[error("manifest {path:?} has no string field `project.version`")]
    MissingVersionField { path: PathBuf },
    #[error("failed to parse manifest {path:?}")]
    Parse {
        #[source]
        source: toml_edit::TomlError,
        path: PathBuf,
    },
    #[error(transparent)]
    Io(#[from] IoError),
}

impl Error {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Parse a manifest document.
///
/// # Errors
/// When `contents` is not valid TOML.
pub fn parse(contents: &str, path: &Path) -> Result<toml_edit::DocumentMut, Error> {
    contents
        .parse::<toml_edit::DocumentMut>()
        .map_err(|source| Error::Parse {
            source,
            path: path.to_path_buf(),
        })
}

/// Read and parse the manifest at `path`.
///
/// Returns `None` if the manifest does not exist.
///
/// # Errors
/// When the manifest cannot be read or parsed.
pub fn read(path: &Path) -> Result<Option<toml_edit::DocumentMut>, Error> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(&contents, path).map(Some),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(IoError::new(source, path).into()),
    }
}

/// The current `project.version` of a manifest document.
#[must_use]
pub fn version(document: &toml_edit::DocumentMut) -> Option<&str> {
    document
        .get("project")
        .and_then(|project| project.get("version"))
        .and_then(toml_edit::Item::as_str)
}

/// Replace `project.version` in `contents` with `new_version`.
///
/// All other content, including comments and whitespace around the value, is kept.
/// Returns the previous version and the updated contents.
///
/// # Errors
/// - When `contents` cannot be parsed.
/// - When the manifest has no `project.version` string field.
pub fn replace_version(
    contents: &str,
    new_version: &str,
    path: &Path,
) -> Result<(String, String), Error> {
    let mut document = parse(contents, path)?;

    let missing = || Error::MissingVersionField {
        path: path.to_path_buf(),
    };
    let item = document
        .get_mut("project")
        .and_then(|project| project.get_mut("version"))
        .ok_or_else(missing)?;
    let value = item.as_value().ok_or_else(missing)?;
    let current_version = value.as_str().ok_or_else(missing)?.to_string();

    let mut new_value = toml_edit::Value::from(new_version);
    *new_value.decor_mut() = value.decor().clone();
    *item = toml_edit::Item::Value(new_value);

    Ok((current_version, document.to_string()))
}

/// Rewrite the `project.version` field of the manifest at `path` in place.
///
/// Returns the previous manifest version together with the modification.
///
/// # Errors
/// - When the manifest does not exist.
/// - When the manifest cannot be parsed or has no version field.
/// - When reading or writing the manifest fails.
pub fn write_manifest_version(
    path: &Path,
    new_version: &str,
    dry_run: bool,
) -> Result<(String, Modification), Error> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(!dry_run)
        .open(path)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => IoError::new(source, path).into(),
        })?;

    let mut before = String::new();
    file.read_to_string(&mut before)
        .map_err(|source| IoError::new(source, path))?;

    let (current_version, after) = replace_version(&before, new_version, path)?;
    tracing::debug!(?path, current_version, new_version, "replace manifest version");

    if dry_run {
        tracing::info!(?path, "would rewrite manifest");
    } else {
        tracing::info!(?path, "rewrite manifest");
        let io_err = |source: std::io::Error| IoError::new(source, path);
        file.seek(std::io::SeekFrom::Start(0)).map_err(io_err)?;
        file.set_len(0).map_err(io_err)?;
        file.write_all(after.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
    }

    let modification = Modification {
        path: path.to_path_buf(),
        before: Some(before),
        after,
    };
    Ok((current_version, modification))
}

#[cfg(test)]
mod tests {
    use color_eyre::eyre;
    use indoc::indoc;
    use similar_asserts::assert_eq as sim_assert_eq;
    use std::path::Path;

    const PYPROJECT: &str = indoc! {r#"
        # project metadata
        [project]
        name = "demo"
        version = "1.2.3" # keep in sync with .VERSION
        dependencies = [
            "requests>=2",
        ]

        [tool.ruff]
        line-length = 100
    "#};

    #[test]
    fn test_replace_version_preserves_formatting() -> eyre::Result<()> {
        crate::tests::init();

        let (current, after) =
            super::replace_version(PYPROJECT, "1.2.4", Path::new("pyproject.toml"))?;
        sim_assert_eq!(current, "1.2.3");
        sim_assert_eq!(
            after,
            indoc! {r#"
                # project metadata
                [project]
                name = "demo"
                version = "1.2.4" # keep in sync with .VERSION
                dependencies = [
                    "requests>=2",
                ]

                [tool.ruff]
                line-length = 100
            "#}
        );
        Ok(())
    }

    #[test]
    fn test_replace_version_inline_table() -> eyre::Result<()> {
        crate::tests::init();

        let (current, after) = super::replace_version(
            "project = { name = \"demo\", version = \"0.1.0\" }\n",
            "0.2.0",
            Path::new("pyproject.toml"),
        )?;
        sim_assert_eq!(current, "0.1.0");
        sim_assert_eq!(after, "project = { name = \"demo\", version = \"0.2.0\" }\n");
        Ok(())
    }

    #[test]
    fn test_replace_version_missing_field() {
        crate::tests::init();

        for contents in [
            "[project]\nname = \"demo\"\n",
            "[tool.poetry]\nversion = \"1.0.0\"\n",
            "[project]\nversion = 1\n",
        ] {
            let res = super::replace_version(contents, "1.0.1", Path::new("pyproject.toml"));
            assert!(
                matches!(res, Err(super::Error::MissingVersionField { .. })),
                "{res:?}"
            );
        }
    }

    #[test]
    fn test_replace_version_invalid_toml() {
        crate::tests::init();

        let res = super::replace_version("[project\n", "1.0.0", Path::new("pyproject.toml"));
        assert!(matches!(res, Err(super::Error::Parse { .. })), "{res:?}");
    }

    #[test]
    fn test_write_manifest_version_in_place() -> eyre::Result<()> {
        crate::tests::init();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pyproject.toml");
        // the new contents are shorter, leftovers must be truncated
        std::fs::write(&path, "[project]\nversion = \"10.20.30\"\n")?;

        let (current, modification) = super::write_manifest_version(&path, "0.0.1", false)?;
        sim_assert_eq!(current, "10.20.30");
        sim_assert_eq!(
            std::fs::read_to_string(&path)?,
            "[project]\nversion = \"0.0.1\"\n"
        );
        sim_assert_eq!(modification.after, "[project]\nversion = \"0.0.1\"\n");

        let document = super::read(&path)?.expect("manifest exists");
        sim_assert_eq!(super::version(&document), Some("0.0.1"));
        Ok(())
    }

    #[test]
    fn test_write_manifest_version_not_found() -> eyre::Result<()> {
        crate::tests::init();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pyproject.toml");

        let err = super::write_manifest_version(&path, "1.0.0", false).unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_write_manifest_version_dry_run() -> eyre::Result<()> {
        crate::tests::init();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, PYPROJECT)?;

        let (_, modification) = super::write_manifest_version(&path, "9.9.9", true)?;
        sim_assert_eq!(std::fs::read_to_string(&path)?, PYPROJECT);
        assert!(modification.diff(None).is_some());
        Ok(())
    }

    #[test]
    fn test_read_missing_manifest() -> eyre::Result<()> {
        crate::tests::init();
        let dir = tempfile::tempdir()?;

        assert!(super::read(&dir.path().join("pyproject.toml"))?.is_none());
        Ok(())
    }
}
