//! Control flow shared by both front-ends
//!
//! Arguments are classified first, so a usage error never loads configuration
//! or touches the input file. Validation runs through a [`ValidatorAdapter`] and
//! the resulting report goes to stdout; every diagnostic goes to stderr.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{debug, info};

use crate::adapter::{ArchiveAdapter, PreflightAdapter, ValidatorAdapter};
use crate::cli::{Grammar, Invocation, parse_invocation};
use crate::config::{self, Config, ConfigManager};
use crate::error_reporter::ErrorReporter;
use crate::logging;
use crate::output::Reporter;
use crate::oxide::{OxideArchiveEngine, OxidePreflightEngine};
use crate::profile::{Conformance, Profile};

/// A validation ran, whatever its verdict, or the version was printed
pub const EXIT_SUCCESS: u8 = 0;
/// Usage, I/O, engine, configuration or output failure
pub const EXIT_FAILURE: u8 = 1;

/// Profile a front-end validates against
pub fn profile_for(grammar: Grammar, config: &Config) -> config::Result<Profile> {
    match grammar {
        Grammar::Basic => Ok(Profile::Fixed(Conformance::A1b)),
        Grammar::KeyGated => Ok(Profile::Parametric(config.preflight.conformance()?)),
    }
}

/// Carry out `invocation` and return the process exit code.
pub fn run<O: Write, E: Write>(
    grammar: Grammar,
    invocation: &Invocation,
    adapter: &mut dyn ValidatorAdapter,
    profile: Profile,
    stdout: &mut O,
    stderr: &mut E,
) -> u8 {
    let mut diagnostics = ErrorReporter::new(stderr);

    match invocation {
        Invocation::UsageError => {
            let _ = diagnostics.report_usage(grammar);
            EXIT_FAILURE
        }
        Invocation::PrintVersion { key } => {
            adapter.set_license_key(key);
            let _ = diagnostics.report_version(&adapter.engine_version());
            EXIT_SUCCESS
        }
        Invocation::Validate { path, format, key } => {
            if let Some(key) = key {
                adapter.set_license_key(key);
            }

            let report = match adapter.validate(path, profile) {
                Ok(report) => report,
                Err(err) => {
                    debug!("validation of {} failed: {:?}", path, err);
                    let _ = diagnostics.report_adapter_error(&err);
                    return EXIT_FAILURE;
                }
            };
            info!(
                "{} checked against {}: {} error(s)",
                path,
                profile,
                report.error_count()
            );

            match Reporter::new(*format).emit(&report, stdout) {
                Ok(()) => EXIT_SUCCESS,
                Err(err) => {
                    let _ = diagnostics.report_output_error(&err);
                    EXIT_FAILURE
                }
            }
        }
    }
}

/// Entry point of a front-end binary
pub fn launch<I, T>(grammar: Grammar, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = parse_invocation(grammar, args);
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    if invocation == Invocation::UsageError {
        let _ = ErrorReporter::new(&mut stderr).report_usage(grammar);
        return ExitCode::from(EXIT_FAILURE);
    }

    let loaded = ConfigManager::load_config()
        .and_then(|config| profile_for(grammar, &config).map(|profile| (config, profile)));
    let (config, profile) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            let _ = ErrorReporter::new(&mut stderr).report_config_error(&err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    logging::init(&config.logging);
    debug!("{} validating against {}", grammar.program_name(), profile);

    let code = match grammar {
        Grammar::Basic => {
            let mut adapter = ArchiveAdapter::new(OxideArchiveEngine::new(config.engine));
            run(grammar, &invocation, &mut adapter, profile, &mut stdout, &mut stderr)
        }
        Grammar::KeyGated => {
            let mut adapter = PreflightAdapter::new(OxidePreflightEngine::new(config.engine));
            run(grammar, &invocation, &mut adapter, profile, &mut stdout, &mut stderr)
        }
    };
    ExitCode::from(code)
}
