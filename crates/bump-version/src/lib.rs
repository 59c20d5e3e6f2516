#![forbid(unsafe_code)]

pub mod config;
pub mod files;
pub mod logging;
pub mod manifest;
pub mod version;

use files::{IoError, Modification};
use std::path::PathBuf;
use version::{Level, Version};

pub use logging::{Log, LogExt, Verbosity};

/// Requested change of the version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bump {
    /// Bump a component of the current version.
    Level(Level),
    /// Start over at `0.0.0`.
    Init,
    /// Set an explicit version.
    NewVersion(String),
}

#[derive(thiserror::Error, Debug)]
pub enum BumpError {
    #[error(
        "missing version file {version_file:?} while manifest {manifest:?} exists, pass --init to create a blank version file"
    )]
    InconsistentRepoState {
        version_file: PathBuf,
        manifest: PathBuf,
    },
    #[error("missing current version: {0:?} does not exist")]
    MissingCurrentVersion(PathBuf),
    #[error("failed to read current version")]
    ReadVersion(#[source] IoError),
    #[error("current version {version:?} in {path:?} is malformed")]
    MalformedCurrentVersion {
        #[source]
        source: version::ParseError,
        version: String,
        path: PathBuf,
    },
    #[error("new version {version:?} is malformed")]
    MalformedNewVersion {
        #[source]
        source: version::ParseError,
        version: String,
    },
    #[error("failed to bump version")]
    Bump(#[from] version::BumpError),
    #[error("failed to update manifest")]
    Manifest(#[from] manifest::Error),
    #[error("failed to write version file")]
    WriteVersion(#[source] IoError),
}

impl BumpError {
    #[must_use]
    pub fn is_manifest_not_found(&self) -> bool {
        matches!(self, Self::Manifest(err) if err.is_not_found())
    }
}

/// Result of a successful bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub current_version: Option<String>,
    pub new_version: String,
    pub manifest: Modification,
    pub version_file: Modification,
}

/// Version bump manager.
///
/// The manifest is written first, the version file second.
/// A failure between the two leaves both files with different versions,
/// which is reported the next time as a mismatch.
#[derive(Debug)]
pub struct BumpVersion<L> {
    pub config: config::FinalizedConfig,
    pub logger: L,
}

impl<L> BumpVersion<L>
where
    L: logging::Log,
{
    pub fn new(config: config::FinalizedConfig, logger: L) -> Self {
        Self { config, logger }
    }

    /// Compute the new version from the current version.
    ///
    /// # Errors
    /// - When a component should be bumped but there is no current version.
    /// - When the current version or a validated new version is malformed.
    /// - When the bumped component overflows.
    pub fn next_version(
        &self,
        bump: &Bump,
        current_version: Option<&str>,
    ) -> Result<String, BumpError> {
        match bump {
            Bump::Level(level) => {
                let current_version = current_version.ok_or_else(|| {
                    BumpError::MissingCurrentVersion(self.config.version_file.clone())
                })?;
                let parsed: Version =
                    current_version
                        .parse()
                        .map_err(|source| BumpError::MalformedCurrentVersion {
                            source,
                            version: current_version.to_string(),
                            path: self.config.version_file.clone(),
                        })?;
                tracing::info!(component = %level, "attempting to increment version component");
                Ok(parsed.bump(*level)?.to_string())
            }
            Bump::Init => Ok(Version::default().bump(Level::Init)?.to_string()),
            Bump::NewVersion(new_version) => {
                tracing::info!(new_version, "parse new version");
                match (new_version.parse::<Version>(), self.config.literal_policy) {
                    (Ok(_), _) => {}
                    (Err(source), config::LiteralPolicy::Validate) => {
                        return Err(BumpError::MalformedNewVersion {
                            source,
                            version: new_version.clone(),
                        });
                    }
                    (Err(err), config::LiteralPolicy::Accept) => {
                        tracing::warn!("using new version {new_version:?} as is: {err}");
                    }
                }
                Ok(new_version.clone())
            }
        }
    }

    /// Bump the version in the manifest and the version file.
    ///
    /// A missing version file next to an existing manifest is an error for every
    /// bump except [`Bump::Init`], which creates the version file.
    ///
    /// # Errors
    /// - When the version file is missing but the manifest exists (unless initializing).
    /// - When the new version cannot be determined.
    /// - When the manifest cannot be updated.
    /// - When the version file cannot be written.
    pub fn bump(&self, bump: &Bump) -> Result<Outcome, BumpError> {
        let config::FinalizedConfig {
            version_file,
            manifest: manifest_path,
            write_policy,
            dry_run,
            ..
        } = &self.config;

        if !version_file.is_file() && manifest_path.is_file() && *bump != Bump::Init {
            return Err(BumpError::InconsistentRepoState {
                version_file: version_file.clone(),
                manifest: manifest_path.clone(),
            });
        }

        let current_version = if version_file.is_file() {
            Some(files::get_version(version_file).map_err(BumpError::ReadVersion)?)
        } else {
            None
        };
        tracing::debug!(version = ?current_version, "current version");

        let new_version = self.next_version(bump, current_version.as_deref())?;
        tracing::info!(new_version, "next version");

        self.logger
            .log_version("current version", current_version.as_deref());
        self.logger.log_version("new version", Some(new_version.as_str()));

        if current_version.as_deref() == Some(new_version.as_str()) {
            tracing::info!(version = new_version, "next version matches current version");
        }
        if *dry_run {
            tracing::info!("dry run active, won't touch any files.");
        }

        let manifest_res = manifest::write_manifest_version(manifest_path, &new_version, *dry_run);
        match &manifest_res {
            Ok((manifest_version, modification)) => {
                if current_version
                    .as_deref()
                    .is_some_and(|current| current != manifest_version)
                {
                    tracing::warn!(
                        "manifest version {manifest_version} does not match version file ({})",
                        current_version.as_deref().unwrap_or_default()
                    );
                }
                self.logger
                    .log_modification(modification, &new_version, *dry_run);
            }
            Err(err) => {
                tracing::error!(path = ?manifest_path, "failed to update manifest: {err}");
            }
        }

        let manifest_modification = match manifest_res {
            Ok((_, modification)) => modification,
            Err(err) => {
                match write_policy {
                    config::WritePolicy::BestEffort => {
                        match files::write_text_version(version_file, &new_version, *dry_run) {
                            Ok(modification) => {
                                self.logger
                                    .log_modification(&modification, &new_version, *dry_run);
                            }
                            Err(version_file_err) => {
                                tracing::error!("failed to write version file: {version_file_err}");
                            }
                        }
                    }
                    config::WritePolicy::FailFast => {
                        tracing::warn!(
                            path = ?version_file,
                            policy = %write_policy,
                            "skipping version file after failed manifest update"
                        );
                        self.logger.log(
                            Verbosity::Low,
                            &format!("skipping {}", version_file.to_string_lossy()),
                        );
                    }
                }
                return Err(err.into());
            }
        };

        let version_file_modification =
            files::write_text_version(version_file, &new_version, *dry_run)
                .map_err(BumpError::WriteVersion)?;
        self.logger
            .log_modification(&version_file_modification, &new_version, *dry_run);

        Ok(Outcome {
            current_version,
            new_version,
            manifest: manifest_modification,
            version_file: version_file_modification,
        })
    }
}
