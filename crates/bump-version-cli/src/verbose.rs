use bump_version::Verbosity;

/// Console logger printing messages up to the configured verbosity.
pub(crate) struct Logger {
    verbosity: Verbosity,
}

impl Logger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl bump_version::Log for Logger {
    fn log(&self, verbosity: Verbosity, message: &str) {
        if verbosity <= self.verbosity {
            println!("{message}");
        }
    }
}
