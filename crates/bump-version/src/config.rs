//! Configuration of the version files and how they are written.
//!
//! Values are layered: command line overrides take precedence over the
//! `[tool.bump-version]` table of the manifest, which takes precedence over the defaults.
use crate::manifest;
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION_FILE: &str = ".VERSION";
pub const DEFAULT_MANIFEST: &str = "pyproject.toml";

/// Name of the manifest table holding the configuration.
pub const CONFIG_TABLE: &str = "bump-version";

/// What happens to the text store when updating the manifest fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WritePolicy {
    /// Only write the text store after the manifest was updated.
    #[default]
    FailFast,
    /// Always attempt to write the text store.
    BestEffort,
}

/// How an explicit new version given on the command line is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LiteralPolicy {
    /// Accept any literal as the new version.
    #[default]
    Accept,
    /// Reject literals that are not of the form `major.minor.patch`.
    Validate,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}, expected one of {expected:?}")]
pub struct InvalidValueError {
    pub key: String,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl std::str::FromStr for WritePolicy {
    type Err = InvalidValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("fail-fast") => Ok(Self::FailFast),
            s if s.eq_ignore_ascii_case("best-effort") => Ok(Self::BestEffort),
            other => Err(InvalidValueError {
                key: "write-policy".to_string(),
                value: other.to_string(),
                expected: &["fail-fast", "best-effort"],
            }),
        }
    }
}

impl std::fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::BestEffort => f.write_str("best-effort"),
        }
    }
}

impl std::str::FromStr for LiteralPolicy {
    type Err = InvalidValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("accept") => Ok(Self::Accept),
            s if s.eq_ignore_ascii_case("validate") => Ok(Self::Validate),
            other => Err(InvalidValueError {
                key: "literal-policy".to_string(),
                value: other.to_string(),
                expected: &["accept", "validate"],
            }),
        }
    }
}

impl std::fmt::Display for LiteralPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Validate => f.write_str("validate"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidValue(#[from] InvalidValueError),
    #[error("`tool.{CONFIG_TABLE}.{key}` must be a string")]
    NotAString { key: String },
    #[error("`tool.{CONFIG_TABLE}` must be a table")]
    NotATable,
}

/// Partial configuration from a single source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub version_file: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub write_policy: Option<WritePolicy>,
    pub literal_policy: Option<LiteralPolicy>,
    pub dry_run: Option<bool>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedConfig {
    pub version_file: PathBuf,
    pub manifest: PathBuf,
    pub write_policy: WritePolicy,
    pub literal_policy: LiteralPolicy,
    pub dry_run: bool,
}

fn string_value<'a>(
    table: &'a dyn toml_edit::TableLike,
    key: &str,
) -> Result<Option<&'a str>, Error> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item.as_str().map(Some).ok_or_else(|| Error::NotAString {
            key: key.to_string(),
        }),
    }
}

impl Config {
    /// Read the configuration table `[tool.bump-version]` of a manifest.
    ///
    /// # Errors
    /// When the table contains values of the wrong type or unknown policies.
    pub fn from_manifest(document: &toml_edit::DocumentMut) -> Result<Option<Self>, Error> {
        let Some(item) = document
            .get("tool")
            .and_then(|tool| tool.get(CONFIG_TABLE))
        else {
            return Ok(None);
        };
        let table = item.as_table_like().ok_or(Error::NotATable)?;

        for (key, _) in table.iter() {
            if !["version-file", "write-policy", "literal-policy"].contains(&key) {
                tracing::warn!(key, "unknown configuration key");
            }
        }

        let version_file = string_value(table, "version-file")?.map(PathBuf::from);
        let write_policy = string_value(table, "write-policy")?
            .map(str::parse::<WritePolicy>)
            .transpose()?;
        let literal_policy = string_value(table, "literal-policy")?
            .map(str::parse::<LiteralPolicy>)
            .transpose()?;

        Ok(Some(Self {
            version_file,
            manifest: None,
            write_policy,
            literal_policy,
            dry_run: None,
        }))
    }

    /// Fill in values missing in `self` from `other`.
    pub fn merge_with(&mut self, other: &Self) {
        self.version_file = self.version_file.take().or_else(|| other.version_file.clone());
        self.manifest = self.manifest.take().or_else(|| other.manifest.clone());
        self.write_policy = self.write_policy.or(other.write_policy);
        self.literal_policy = self.literal_policy.or(other.literal_policy);
        self.dry_run = self.dry_run.or(other.dry_run);
    }

    /// Resolve the configuration, making relative paths relative to `dir`.
    #[must_use]
    pub fn finalize(self, dir: &Path) -> FinalizedConfig {
        let version_file = self
            .version_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSION_FILE));
        let manifest = self
            .manifest
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        FinalizedConfig {
            version_file: dir.join(version_file),
            manifest: dir.join(manifest),
            write_policy: self.write_policy.unwrap_or_default(),
            literal_policy: self.literal_policy.unwrap_or_default(),
            dry_run: self.dry_run.unwrap_or(false),
        }
    }
}

/// Resolve the configuration for `dir`.
///
/// The manifest is located using the overrides and then searched for a configuration table.
/// A manifest that cannot be read or parsed contributes no configuration,
/// the error surfaces once the manifest is updated.
///
/// # Errors
/// When the configuration table of the manifest is invalid.
pub fn find_config(dir: &Path, overrides: &Config) -> Result<FinalizedConfig, Error> {
    let manifest_path = dir.join(
        overrides
            .manifest
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MANIFEST)),
    );

    let file_config = match manifest::read(&manifest_path) {
        Ok(Some(document)) => Config::from_manifest(&document)?,
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(path = ?manifest_path, "skipping manifest configuration: {err}");
            None
        }
    };

    let mut config = overrides.clone();
    if let Some(file_config) = file_config {
        tracing::debug!(?file_config, "found configuration in manifest");
        config.merge_with(&file_config);
    }
    Ok(config.finalize(dir))
}
