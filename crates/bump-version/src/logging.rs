//! Logging utilities for reporting versions and file changes based on verbosity.
use crate::files::Modification;
use colored::{Color, Colorize};

/// Controls level of detail emitted by loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Verbosity {
    /// No logs will be emitted.
    Off = 0,
    /// Minimal output, e.g., current/new version and modified files.
    Low = 1,
    /// Show diffs of modified files.
    Medium = 2,
    /// Verbose debug-level output.
    High = 3,
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        match value {
            0 => Verbosity::Off,
            1 => Verbosity::Low,
            2 => Verbosity::Medium,
            _ => Verbosity::High,
        }
    }
}

/// A no-op logger implementation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoOpLogger {}

impl Log for NoOpLogger {
    fn log(&self, _: Verbosity, _: &str) {}
}

/// Abstraction for logger implementations.
pub trait Log {
    /// Log a message if `verbosity` is within the configured level.
    fn log(&self, verbosity: Verbosity, message: &str);
}

/// Extension methods on `Log` for common log patterns.
pub trait LogExt {
    /// Log a labeled version, e.g. `[current version]`.
    fn log_version(&self, label: &str, version: Option<&str>);

    /// Log that `version` was written to a file, including a diff if there are changes.
    fn log_modification(&self, modification: &Modification, version: &str, dry_run: bool);
}

impl<T> LogExt for T
where
    T: Log,
{
    fn log_version(&self, label: &str, version: Option<&str>) {
        self.log(Verbosity::Low, &format!("{}", format!("[{label}]").blue()));
        let version = match version {
            Some(version) => version.yellow().bold(),
            None => "none".dimmed(),
        };
        self.log(Verbosity::Low, &format!("\t{version}"));
    }

    fn log_modification(&self, modification: &Modification, version: &str, dry_run: bool) {
        self.log(Verbosity::Low, "");
        self.log(
            Verbosity::Low,
            &format!(
                "{}",
                format!("[{}]", modification.path.to_string_lossy()).magenta()
            ),
        );

        let action = match (dry_run, modification.before.is_some()) {
            (true, true) => "would update",
            (true, false) => "would create",
            (false, true) => "updated",
            (false, false) => "created",
        };
        self.log(
            Verbosity::Low,
            &format!("\t{} {}", action.dimmed(), version.color(Color::Green)),
        );

        if let Some(diff) = modification.diff(None) {
            self.log(Verbosity::Medium, "");
            for line in diff.lines() {
                let mut line = format!("\t{line}");
                line.push_str("\x1b[0;0m"); // reset all styles at end of line
                self.log(Verbosity::Medium, &line);
            }
        } else {
            self.log(Verbosity::Low, &format!("{}", "\tno changes".dimmed()));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Log, LogExt, Verbosity};
    use crate::files::Modification;
    use similar_asserts::assert_eq as sim_assert_eq;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Logger collecting messages for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct BufferedLogger {
        pub verbosity: Option<Verbosity>,
        pub messages: Mutex<Vec<String>>,
    }

    impl BufferedLogger {
        pub(crate) fn contains(&self, needle: &str) -> bool {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .any(|message| message.contains(needle))
        }
    }

    impl Log for BufferedLogger {
        fn log(&self, verbosity: Verbosity, message: &str) {
            if verbosity <= self.verbosity.unwrap_or(Verbosity::High) {
                self.messages.lock().unwrap().push(message.to_string());
            }
        }
    }

    #[test]
    fn test_verbosity_ord() {
        crate::tests::init();

        let mut verbosities = [Verbosity::Medium, Verbosity::Low, Verbosity::High];
        verbosities.sort();
        sim_assert_eq!(
            verbosities,
            [Verbosity::Low, Verbosity::Medium, Verbosity::High]
        );
        sim_assert_eq!(Verbosity::from(7), Verbosity::High);
    }

    #[test]
    fn test_log_modification_respects_verbosity() {
        crate::tests::init();
        colored::control::set_override(false);

        let modification = Modification {
            path: PathBuf::from(".VERSION"),
            before: Some("1.2.3".to_string()),
            after: "1.2.4".to_string(),
        };

        let logger = BufferedLogger {
            verbosity: Some(Verbosity::Low),
            ..BufferedLogger::default()
        };
        logger.log_modification(&modification, "1.2.4", false);
        assert!(logger.contains("[.VERSION]"));
        assert!(logger.contains("updated 1.2.4"));
        assert!(!logger.contains("(before)"));

        let logger = BufferedLogger::default();
        logger.log_modification(&modification, "1.2.4", true);
        assert!(logger.contains("would update 1.2.4"));
        assert!(logger.contains(".VERSION (before)"));
    }
}
