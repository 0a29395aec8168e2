use crate::cli::Grammar;
use crate::config::ConfigError;
use crate::error::AdapterError;
use std::io::{self, Write};

/// Writes diagnostics; stderr in production.
///
/// Nothing written here is meant to be parsed.
pub struct ErrorReporter<W: Write> {
    out: W,
}

impl<W: Write> ErrorReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report a command line that matches no known form
    pub fn report_usage(&mut self, grammar: Grammar) -> io::Result<()> {
        writeln!(self.out, "{}", grammar.usage())
    }

    /// Report the engine version in version-print mode
    pub fn report_version(&mut self, version: &str) -> io::Result<()> {
        writeln!(self.out, "Version: {}", version)
    }

    /// Report a validation run that produced no report
    pub fn report_adapter_error(&mut self, error: &AdapterError) -> io::Result<()> {
        match error {
            AdapterError::Io { .. } | AdapterError::NoResult { .. } => {
                writeln!(self.out, "{}", error)
            }
            AdapterError::Engine { .. } => self.report_chain(error),
        }
    }

    /// Report a configuration error
    pub fn report_config_error(&mut self, error: &ConfigError) -> io::Result<()> {
        writeln!(self.out, "Configuration error: {}", error)
    }

    /// Report a failure writing the report itself
    pub fn report_output_error(&mut self, error: &io::Error) -> io::Result<()> {
        writeln!(self.out, "Failed to write report: {}", error)
    }

    /// Summary line, then one line per cause
    fn report_chain(&mut self, error: &dyn std::error::Error) -> io::Result<()> {
        writeln!(self.out, "{}", error)?;
        let mut current_error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            writeln!(self.out, "  {}: {}", level + 1, source)?;
            current_error = source;
            level += 1;
        }
        Ok(())
    }
}
