use crate::options;
use color_eyre::eyre::{self, WrapErr};

pub fn bump_version(options: options::Options) -> eyre::Result<()> {
    let start = std::time::Instant::now();

    let color_choice = options.color_choice.unwrap_or(termcolor::ColorChoice::Auto);
    let log_level = options
        .log_level
        .unwrap_or_else(|| options.verbosity.log_level());
    let (_, use_color) = crate::logging::setup(log_level, options.log_format, color_choice)?;
    colored::control::set_override(use_color);

    let bump = options
        .bump
        .bump()
        .ok_or_else(|| eyre::eyre!("missing version component to bump"))?;

    let cwd = std::env::current_dir().wrap_err("could not determine current working dir")?;
    let dir = options.dir.as_deref().unwrap_or(&cwd);
    let dir = dir
        .canonicalize()
        .wrap_err_with(|| format!("could not open directory {dir:?}"))?;

    let cli_overrides = options::cli_config(&options);
    let config = bump_version::config::find_config(&dir, &cli_overrides)?;
    tracing::debug!(?config, "resolved config");

    let logger = crate::verbose::Logger::new(options.verbosity.console());
    let manager = bump_version::BumpVersion::new(config, logger);
    let outcome = manager.bump(&bump)?;

    tracing::info!(
        version = outcome.new_version,
        elapsed = ?start.elapsed(),
        "done"
    );
    Ok(())
}
