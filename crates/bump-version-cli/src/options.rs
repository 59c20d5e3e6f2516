use bump_version::{
    config::{self, LiteralPolicy, WritePolicy},
    version::Level,
    Bump,
};
use clap::Parser;
use std::path::PathBuf;

/// Logging flags to `#[command(flatten)]` into your CLI
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
        long_help = None,
    )]
    pub verbose: u8,

    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        help = "Decrease logging verbosity",
        long_help = None,
        conflicts_with = "verbose",
    )]
    pub quiet: u8,
}

impl Verbosity {
    /// Verbosity of the console output.
    ///
    /// Changes are shown by default, `-v` adds diffs.
    pub fn console(&self) -> bump_version::Verbosity {
        if self.quiet > 0 {
            bump_version::Verbosity::Off
        } else {
            self.verbose.saturating_add(1).into()
        }
    }

    /// Log level implied by the verbosity flags.
    pub fn log_level(&self) -> tracing::metadata::Level {
        if self.quiet > 0 {
            return tracing::metadata::Level::ERROR;
        }
        match self.verbose {
            0 | 1 => tracing::metadata::Level::WARN,
            2 => tracing::metadata::Level::INFO,
            3 => tracing::metadata::Level::DEBUG,
            _ => tracing::metadata::Level::TRACE,
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct BumpArgs {
    #[arg(short = 'p', long = "patch", help = "bump the patch version")]
    pub patch: bool,

    #[arg(short = 'm', long = "minor", help = "bump the minor version and reset patch")]
    pub minor: bool,

    #[arg(
        short = 'M',
        long = "major",
        help = "bump the major version and reset minor and patch"
    )]
    pub major: bool,

    #[arg(long = "init", help = "initialize the version to 0.0.0")]
    pub init: bool,

    #[arg(
        value_name = "VERSION",
        allow_hyphen_values = true,
        help = "set the version to VERSION"
    )]
    pub new_version: Option<String>,
}

impl BumpArgs {
    pub fn bump(&self) -> Option<Bump> {
        match self {
            Self { patch: true, .. } => Some(Bump::Level(Level::Patch)),
            Self { minor: true, .. } => Some(Bump::Level(Level::Minor)),
            Self { major: true, .. } => Some(Bump::Level(Level::Major)),
            Self { init: true, .. } => Some(Bump::Init),
            Self {
                new_version: Some(new_version),
                ..
            } => Some(Bump::NewVersion(new_version.clone())),
            _ => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "bump-version",
    version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
    about = "bump the version in .VERSION and pyproject.toml",
    author = "romnn <contact@romnn.com>",
    override_usage = "bump-version [OPTIONS] <-p|-m|-M|--init|VERSION>",
)]
pub struct Options {
    #[command(flatten)]
    pub bump: BumpArgs,

    #[clap(
        long = "dir",
        help = "directory containing the version files",
        env = "BUMP_VERSION_DIR"
    )]
    pub dir: Option<PathBuf>,

    #[clap(
        long = "version-file",
        help = "plain text file holding the version (default: .VERSION)",
        env = "BUMP_VERSION_VERSION_FILE"
    )]
    pub version_file: Option<PathBuf>,

    #[clap(
        long = "manifest",
        help = "project manifest with a project.version field (default: pyproject.toml)",
        env = "BUMP_VERSION_MANIFEST"
    )]
    pub manifest: Option<PathBuf>,

    #[clap(
        long = "write-policy",
        help = "write the version file after a failed manifest update (fail-fast or best-effort)",
        env = "BUMP_VERSION_WRITE_POLICY"
    )]
    pub write_policy: Option<WritePolicy>,

    #[clap(
        long = "literal-policy",
        help = "accept or validate an explicit VERSION",
        env = "BUMP_VERSION_LITERAL_POLICY"
    )]
    pub literal_policy: Option<LiteralPolicy>,

    #[clap(
        short = 'n',
        long = "dry-run",
        help = "don't write any files, just pretend.",
        env = "BUMP_VERSION_DRY_RUN",
        action = clap::ArgAction::SetTrue
    )]
    pub dry_run: bool,

    #[arg(
        long = "color",
        env = "BUMP_VERSION_COLOR",
        help = "enable or disable color"
    )]
    pub color_choice: Option<termcolor::ColorChoice>,

    #[command(flatten)]
    pub verbosity: Verbosity,

    #[arg(
        long = "log",
        env = "BUMP_VERSION_LOG_LEVEL",
        aliases = ["log-level"],
        help = "Log level. When using a more sophisticated logging setup using RUST_LOG environment variable, this option is overwritten."
    )]
    pub log_level: Option<tracing::metadata::Level>,

    #[arg(
        long = "log-format",
        env = "BUMP_VERSION_LOG_FORMAT",
        help = "log format (json or compact)"
    )]
    pub log_format: Option<crate::logging::LogFormat>,
}

/// Configuration overrides given on the command line.
pub fn cli_config(options: &Options) -> config::Config {
    config::Config {
        version_file: options.version_file.clone(),
        manifest: options.manifest.clone(),
        write_policy: options.write_policy,
        literal_policy: options.literal_policy,
        dry_run: options.dry_run.then_some(true),
    }
}
