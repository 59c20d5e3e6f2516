//! Command line entry point of `bump-version`.
#![forbid(unsafe_code)]

mod common;
mod logging;
mod options;
mod verbose;

use clap::Parser;
use color_eyre::eyre;

fn main() -> eyre::Result<()> {
    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "0");
    }
    color_eyre::install()?;

    let options = match options::Options::try_parse() {
        Ok(options) => options,
        // help and version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            // usage errors exit with 1 like all other failures
            err.print().ok();
            std::process::exit(1);
        }
    };
    common::bump_version(options)
}
