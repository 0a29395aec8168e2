//! Validator adapters
//!
//! A [`ValidatorAdapter`] runs one engine on one file and normalizes whatever
//! the engine hands back into a [`Report`]. Two implementations exist, one per
//! engine calling convention:
//!
//! - [`ArchiveAdapter`] drives an [`ArchiveEngine`]. A file that fails to parse
//!   still yields a report, built from the partial result the parse phase
//!   returned.
//! - [`PreflightAdapter`] drives a [`PreflightEngine`] and carries its run and
//!   document metadata into the report.
//!
//! Neither adapter writes to stdout.

use std::path::Path;

use tracing::{debug, warn};

use crate::engine::{
    ArchiveEngine, ArchiveResult, EngineIssue, ParseOutcome, PreflightEngine, PreflightResults,
    RunInfo,
};
use crate::error::{AdapterError, Result};
use crate::profile::Profile;
use crate::report::{PreflightInfo, Report};

pub trait ValidatorAdapter {
    /// Validate the file at `path` against `profile`.
    ///
    /// A document that does not conform is an `Ok` report with `valid == false`.
    fn validate(&self, path: &str, profile: Profile) -> Result<Report>;

    /// Name and version of the engine behind this adapter
    fn engine_version(&self) -> String;

    /// Configure a licence key. Engines without licensing ignore it.
    fn set_license_key(&mut self, _key: &str) {}
}

fn push_issues(report: &mut Report, issues: impl IntoIterator<Item = EngineIssue>) {
    for issue in issues {
        report.push_error(
            issue.code,
            issue.details,
            issue.page.map(|page| page.to_string()),
            issue.fixable,
        );
    }
}

fn report_from_archive(path: &str, profile: Profile, result: ArchiveResult) -> Report {
    let mut report = Report::new(path, profile);
    push_issues(&mut report, result.errors);
    report.set_engine_verdict(result.valid);
    report
}

/// Adapter for engines with a separate parse phase.
pub struct ArchiveAdapter<E> {
    engine: E,
}

impl<E: ArchiveEngine> ArchiveAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: ArchiveEngine> ValidatorAdapter for ArchiveAdapter<E> {
    fn validate(&self, path: &str, profile: Profile) -> Result<Report> {
        let outcome = self
            .engine
            .parse(Path::new(path))
            .map_err(|err| AdapterError::from_engine(path, err))?;

        let result = match outcome {
            ParseOutcome::SyntacticFailure(partial) => {
                debug!(
                    "{} failed syntax validation with {} error(s)",
                    path,
                    partial.errors.len()
                );
                partial
            }
            ParseOutcome::Parsed(mut document) => {
                let result = self
                    .engine
                    .validate(&mut document, profile.conformance())
                    .map_err(|err| AdapterError::from_engine(path, err))?;
                drop(document);
                result.ok_or_else(|| AdapterError::NoResult {
                    path: path.to_string(),
                })?
            }
        };

        Ok(report_from_archive(path, profile, result))
    }

    fn engine_version(&self) -> String {
        self.engine.version()
    }
}

/// Adapter for single-call, key-configured engines.
pub struct PreflightAdapter<E> {
    engine: E,
}

impl<E: PreflightEngine> PreflightAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

fn preflight_info(run: RunInfo) -> PreflightInfo {
    PreflightInfo {
        computer_name: run.computer_name,
        operating_system: run.os_info,
        user_name: run.user_name,
        version: run.version,
        date_time: run.date_time,
        duration_millis: run
            .duration
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
    }
}

fn report_from_preflight(path: &str, profile: Profile, results: PreflightResults) -> Report {
    let mut report = Report::new(path, profile);

    match results.run_info {
        Some(run) => report.preflight_info = Some(preflight_info(run)),
        None => warn!("preflight info missing from engine result"),
    }
    match results.document_info {
        Some(info) => report.document_info = Some(info),
        None => warn!("document info missing from engine result"),
    }
    match results.records {
        Some(records) => push_issues(&mut report, records),
        None => warn!("result record list missing from engine result"),
    }

    report.set_engine_verdict(results.successful);
    report
}

impl<E: PreflightEngine> ValidatorAdapter for PreflightAdapter<E> {
    fn validate(&self, path: &str, profile: Profile) -> Result<Report> {
        let results = self
            .engine
            .verify(Path::new(path), profile.conformance())
            .map_err(|err| AdapterError::from_engine(path, err))?
            .ok_or_else(|| AdapterError::NoResult {
                path: path.to_string(),
            })?;

        Ok(report_from_preflight(path, profile, results))
    }

    fn engine_version(&self) -> String {
        self.engine.version()
    }

    fn set_license_key(&mut self, key: &str) {
        self.engine.set_key(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MockArchiveEngine, MockPreflightEngine};
    use crate::error::EngineError;
    use crate::profile::Conformance;
    use crate::report::DocumentInfo;
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use std::path::PathBuf;
    use std::time::Duration;

    const PDFA1B: Profile = Profile::Fixed(Conformance::A1b);
    const PREFLIGHT_2B: Profile = Profile::Parametric(Conformance::A2b);

    fn issues() -> Vec<EngineIssue> {
        vec![
            EngineIssue::new("1.2.1", "Body Syntax error; buffer 0x00"),
            EngineIssue::new("2.4.3", "Invalid color space").on_page(4),
            EngineIssue::new("7.1", "Missing metadata").fixable(true),
        ]
    }

    #[test]
    fn test_archive_valid_document() {
        let mut engine = MockArchiveEngine::new();
        engine
            .expect_parse()
            .withf(|path| path == Path::new("good.pdf"))
            .times(1)
            .returning(|_| Ok(ParseOutcome::Parsed(())));
        engine
            .expect_validate()
            .withf(|_, conformance| *conformance == Conformance::A1b)
            .times(1)
            .returning(|_, _| {
                Ok(Some(ArchiveResult {
                    valid: true,
                    errors: vec![],
                }))
            });

        let report = ArchiveAdapter::new(engine)
            .validate("good.pdf", PDFA1B)
            .unwrap();

        assert!(report.valid);
        assert_eq!(report.filename, "good.pdf");
        assert_eq!(report.profile, PDFA1B);
        assert!(report.errors.is_empty());
        assert!(report.preflight_info.is_none());
        assert!(report.document_info.is_none());
    }

    #[test]
    fn test_archive_errors_keep_engine_order_and_fields() {
        let mut engine = MockArchiveEngine::new();
        engine
            .expect_parse()
            .returning(|_| Ok(ParseOutcome::Parsed(())));
        engine.expect_validate().returning(|_, _| {
            Ok(Some(ArchiveResult {
                valid: false,
                errors: issues(),
            }))
        });

        let report = ArchiveAdapter::new(engine)
            .validate("bad.pdf", PDFA1B)
            .unwrap();

        assert!(!report.valid);
        let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["1.2.1", "2.4.3", "7.1"]);
        for (position, error) in report.errors.iter().enumerate() {
            assert_eq!(error.index, position);
        }
        // Sanitizing is the reporter's job
        assert_eq!(report.errors[0].details, "Body Syntax error; buffer 0x00");
        assert_eq!(report.errors[1].page.as_deref(), Some("4"));
        assert_eq!(report.errors[2].fixable, Some(true));
    }

    #[test]
    fn test_archive_syntactic_failure_is_a_report() {
        let mut engine = MockArchiveEngine::new();
        engine.expect_parse().returning(|_| {
            Ok(ParseOutcome::SyntacticFailure(ArchiveResult {
                valid: false,
                errors: vec![EngineIssue::new("1.0", "Invalid header")],
            }))
        });
        engine.expect_validate().never();

        let report = ArchiveAdapter::new(engine)
            .validate("broken.pdf", PDFA1B)
            .unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, "1.0");
    }

    #[test]
    fn test_archive_io_failure() {
        let mut engine = MockArchiveEngine::new();
        engine.expect_parse().returning(|path| {
            Err(EngineError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
            })
        });

        let err = ArchiveAdapter::new(engine)
            .validate("missing.pdf", PDFA1B)
            .unwrap_err();

        assert_eq!(err.to_string(), "IO error when opening missing.pdf");
        assert!(matches!(err, AdapterError::Io { .. }));
    }

    #[test]
    fn test_archive_missing_result() {
        let mut engine = MockArchiveEngine::new();
        engine
            .expect_parse()
            .returning(|_| Ok(ParseOutcome::Parsed(())));
        engine.expect_validate().returning(|_, _| Ok(None));

        let err = ArchiveAdapter::new(engine)
            .validate("odd.pdf", PDFA1B)
            .unwrap_err();

        assert!(matches!(err, AdapterError::NoResult { ref path } if path == "odd.pdf"));
    }

    #[test]
    fn test_archive_engine_exception() {
        let mut engine = MockArchiveEngine::new();
        engine
            .expect_parse()
            .returning(|_| Ok(ParseOutcome::Parsed(())));
        engine
            .expect_validate()
            .returning(|_, _| Err(EngineError::Failure(anyhow!("stack overflow in font parser"))));

        let err = ArchiveAdapter::new(engine)
            .validate("odd.pdf", PDFA1B)
            .unwrap_err();

        match err {
            AdapterError::Engine { path, source } => {
                assert_eq!(path, "odd.pdf");
                assert_eq!(source.to_string(), "stack overflow in font parser");
            }
            other => panic!("Expected AdapterError::Engine, got {:?}", other),
        }
    }

    #[test]
    fn test_archive_engine_version() {
        let mut engine = MockArchiveEngine::new();
        engine
            .expect_version()
            .return_const("engine 1.0".to_string());
        assert_eq!(ArchiveAdapter::new(engine).engine_version(), "engine 1.0");
    }

    fn full_results() -> PreflightResults {
        PreflightResults {
            successful: false,
            run_info: Some(RunInfo {
                computer_name: Some("build-host".to_string()),
                os_info: Some("linux x86_64".to_string()),
                user_name: Some("archivist".to_string()),
                version: Some("engine 2.0".to_string()),
                date_time: None,
                duration: Some(Duration::from_micros(1_534_900)),
            }),
            document_info: Some(DocumentInfo {
                title: Some("Annual Report".to_string()),
                ..DocumentInfo::default()
            }),
            records: Some(issues()),
        }
    }

    #[test]
    fn test_preflight_carries_metadata() {
        let mut engine = MockPreflightEngine::new();
        engine
            .expect_verify()
            .with(eq(PathBuf::from("report.pdf")), eq(Conformance::A2b))
            .times(1)
            .returning(|_, _| Ok(Some(full_results())));

        let report = PreflightAdapter::new(engine)
            .validate("report.pdf", PREFLIGHT_2B)
            .unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
        let info = report.preflight_info.expect("preflight info present");
        assert_eq!(info.operating_system.as_deref(), Some("linux x86_64"));
        assert_eq!(info.duration_millis, Some(1534));
        assert_eq!(
            report.document_info.and_then(|d| d.title).as_deref(),
            Some("Annual Report")
        );
    }

    #[test]
    fn test_preflight_missing_sections_stay_absent() {
        let mut engine = MockPreflightEngine::new();
        engine.expect_verify().returning(|_, _| {
            Ok(Some(PreflightResults {
                successful: true,
                run_info: None,
                document_info: None,
                records: None,
            }))
        });

        let report = PreflightAdapter::new(engine)
            .validate("clean.pdf", PREFLIGHT_2B)
            .unwrap();

        assert!(report.valid);
        assert!(report.preflight_info.is_none());
        assert!(report.document_info.is_none());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_preflight_no_result() {
        let mut engine = MockPreflightEngine::new();
        engine.expect_verify().returning(|_, _| Ok(None));

        let err = PreflightAdapter::new(engine)
            .validate("doc.pdf", PREFLIGHT_2B)
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to verify document 'doc.pdf'");
    }

    #[test]
    fn test_preflight_forwards_key() {
        let mut engine = MockPreflightEngine::new();
        engine
            .expect_set_key()
            .with(eq("ABC-123"))
            .times(1)
            .return_const(());

        let mut adapter = PreflightAdapter::new(engine);
        adapter.set_license_key("ABC-123");
    }
}
