//! Three component semantic versions and how they are bumped.
use std::sync::LazyLock;

/// Regex matching a complete `major.minor.patch` version.
///
/// Captures named groups: `major`, `minor`, and `patch`.
pub static VERSION_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(r"^(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)$")
        .build()
        .unwrap()
});

/// The version component that is bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Patch,
    Minor,
    Major,
    /// Reset all components to zero.
    Init,
}

impl Level {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Init => "init",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("version {0:?} is not of the form major.minor.patch")]
    Malformed(String),
    #[error("component {component} of version {version:?} is not a valid number")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
        version: String,
        component: &'static str,
    },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BumpError {
    #[error("version component {component} exceeds bounds and cannot be bumped")]
    OutOfBounds { component: &'static str },
}

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Bump the version at `level`, resetting all lower components.
    ///
    /// # Errors
    /// When the bumped component would overflow.
    pub fn bump(&self, level: Level) -> Result<Self, BumpError> {
        let next = |value: u64, component: &'static str| {
            value
                .checked_add(1)
                .ok_or(BumpError::OutOfBounds { component })
        };
        let bumped = match level {
            Level::Patch => Self {
                patch: next(self.patch, "patch")?,
                ..*self
            },
            Level::Minor => Self {
                minor: next(self.minor, "minor")?,
                patch: 0,
                ..*self
            },
            Level::Major => Self::new(next(self.major, "major")?, 0, 0),
            Level::Init => Self::default(),
        };
        Ok(bumped)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for Version {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = VERSION_REGEX
            .captures(value)
            .ok_or_else(|| ParseError::Malformed(value.to_string()))?;

        let component = |name: &'static str| -> Result<u64, ParseError> {
            captures[name]
                .parse()
                .map_err(|source| ParseError::InvalidNumber {
                    source,
                    version: value.to_string(),
                    component: name,
                })
        };

        Ok(Self {
            major: component("major")?,
            minor: component("minor")?,
            patch: component("patch")?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Bump(#[from] BumpError),
}

/// Parse `version` and bump it at `level`.
///
/// # Errors
/// - When `version` is malformed.
/// - When the bumped component would overflow.
pub fn bump(version: &str, level: Level) -> Result<String, Error> {
    let version: Version = version.parse()?;
    Ok(version.bump(level)?.to_string())
}
