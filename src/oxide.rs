//! Validation engines backed by `pdf_oxide`
//!
//! `pdf_oxide` parses the document and runs its PDF/A compliance checks. This
//! module wraps it in the two engine conventions from [`crate::engine`]:
//!
//! - [`OxideArchiveEngine`] splits opening the file from checking it, and turns
//!   parse errors into a failing result instead of an error.
//! - [`OxidePreflightEngine`] verifies in one call and adds run metadata and the
//!   document's Info dictionary.
//!
//! The open [`PdfDocument`] owns the file handle, so the file is released as
//! soon as the document goes out of scope on any path.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use anyhow::{Context, anyhow};
use chrono::Local;
use pdf_oxide::compliance::{ComplianceError, ErrorCode, PdfALevel, PdfAValidator};
use pdf_oxide::document::PdfDocument;
use regex::Regex;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::doc_info::read_document_info;
use crate::engine::{
    ArchiveEngine, ArchiveResult, EngineIssue, ParseOutcome, PreflightEngine, PreflightResults,
    RunInfo,
};
use crate::error::{EngineError, EngineResult};
use crate::host;
use crate::profile::Conformance;

static PAGE_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpage\s*#?\s*(\d+)").expect("page pattern is valid"));

/// Engine name and version as reported to users
pub fn engine_version() -> String {
    format!("pdf_oxide {}", pdf_oxide::VERSION)
}

fn level(conformance: Conformance) -> PdfALevel {
    match conformance {
        Conformance::A1a => PdfALevel::A1a,
        Conformance::A1b => PdfALevel::A1b,
        Conformance::A2a => PdfALevel::A2a,
        Conformance::A2b => PdfALevel::A2b,
        Conformance::A2u => PdfALevel::A2u,
        Conformance::A3a => PdfALevel::A3a,
        Conformance::A3b => PdfALevel::A3b,
        Conformance::A3u => PdfALevel::A3u,
    }
}

fn validator(config: &EngineConfig) -> PdfAValidator {
    PdfAValidator::new()
        .stop_on_first_error(config.stop_on_first_error)
        .include_warnings(false)
}

/// Whether the `pdf_oxide` PDF/A converter repairs this violation automatically
fn is_fixable(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::MissingXmpMetadata
            | ErrorCode::MissingPdfaIdentification
            | ErrorCode::FontNotEmbedded
            | ErrorCode::MissingOutputIntent
            | ErrorCode::DeviceColorWithoutIntent
            | ErrorCode::JavaScriptNotAllowed
            | ErrorCode::EncryptionNotAllowed
            | ErrorCode::TransparencyNotAllowed
            | ErrorCode::EmbeddedFileNotAllowed
    )
}

/// Page number named in a location string such as `Page 3, annotation 2`
pub fn page_from_location(location: &str) -> Option<u32> {
    PAGE_LOCATION
        .captures(location)
        .and_then(|caps| caps[1].parse().ok())
}

fn issue_from_compliance(error: &ComplianceError) -> EngineIssue {
    let issue = EngineIssue::new(error.code.to_string(), error.message.clone())
        .fixable(is_fixable(error.code));
    match error.location.as_deref().and_then(page_from_location) {
        Some(page) => issue.on_page(page),
        None => issue,
    }
}

/// Classify a `pdf_oxide` open error as the finding the parse phase reports
fn syntax_issue(err: &pdf_oxide::Error) -> EngineIssue {
    use pdf_oxide::Error;

    let code = match err {
        Error::InvalidHeader(_) => "SYNTAX-001",
        Error::UnsupportedVersion(_) => "SYNTAX-002",
        Error::InvalidXref => "SYNTAX-003",
        Error::UnexpectedEof => "SYNTAX-004",
        Error::ParseError { .. }
        | Error::ObjectNotFound(..)
        | Error::InvalidObjectType { .. }
        | Error::CircularReference(_)
        | Error::InvalidPdf(_) => "SYNTAX-005",
        _ => "SYNTAX-000",
    };
    EngineIssue::new(code, err.to_string())
}

/// A regular file this process may read
fn check_readable(path: &Path) -> io::Result<()> {
    if !fs::metadata(path)?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    File::open(path).map(drop)
}

/// Open `path`, separating I/O failures from documents that do not parse.
///
/// `pdf_oxide` reports a short read as a bad header, so anything that is not
/// a readable regular file is turned away here first.
fn open(path: &Path) -> EngineResult<std::result::Result<PdfDocument, pdf_oxide::Error>> {
    check_readable(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match PdfDocument::open(path) {
        Ok(document) => Ok(Ok(document)),
        Err(pdf_oxide::Error::Io(source)) => Err(EngineError::Io {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) => Ok(Err(err)),
    }
}

/// Two-phase engine: parse, then check conformance.
#[derive(Debug, Clone, Default)]
pub struct OxideArchiveEngine {
    config: EngineConfig,
}

impl OxideArchiveEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ArchiveEngine for OxideArchiveEngine {
    type Document = PdfDocument;

    fn version(&self) -> String {
        engine_version()
    }

    fn parse(&self, path: &Path) -> EngineResult<ParseOutcome<PdfDocument>> {
        match open(path)? {
            Ok(document) => {
                debug!("parsed {}", path.display());
                Ok(ParseOutcome::Parsed(document))
            }
            Err(err) => {
                info!("syntax validation failed for {}: {}", path.display(), err);
                Ok(ParseOutcome::SyntacticFailure(ArchiveResult {
                    valid: false,
                    errors: vec![syntax_issue(&err)],
                }))
            }
        }
    }

    fn validate(
        &self,
        document: &mut PdfDocument,
        conformance: Conformance,
    ) -> EngineResult<Option<ArchiveResult>> {
        let result = validator(&self.config)
            .validate(document, level(conformance))
            .with_context(|| format!("{} validation aborted", conformance))?;

        Ok(Some(ArchiveResult {
            valid: result.is_compliant,
            errors: result.errors.iter().map(issue_from_compliance).collect(),
        }))
    }
}

/// Single-call engine reporting run and document metadata.
#[derive(Debug, Clone, Default)]
pub struct OxidePreflightEngine {
    config: EngineConfig,
}

impl OxidePreflightEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl PreflightEngine for OxidePreflightEngine {
    fn set_key(&mut self, _key: &str) {
        debug!("{} needs no licence key; ignoring the supplied key", engine_version());
    }

    fn version(&self) -> String {
        engine_version()
    }

    fn verify(
        &self,
        path: &Path,
        conformance: Conformance,
    ) -> EngineResult<Option<PreflightResults>> {
        let started_at = Local::now().fixed_offset();
        let started = Instant::now();

        let mut document = open(path)?
            .map_err(|err| anyhow!(err).context(format!("cannot parse '{}'", path.display())))?;

        let result = validator(&self.config)
            .validate(&mut document, level(conformance))
            .with_context(|| format!("{} verification aborted", conformance))?;
        let document_info = read_document_info(&mut document);
        drop(document);

        let run_info = RunInfo {
            computer_name: host::computer_name(),
            os_info: Some(host::operating_system()),
            user_name: host::user_name(),
            version: Some(engine_version()),
            date_time: Some(started_at),
            duration: Some(started.elapsed()),
        };

        Ok(Some(PreflightResults {
            successful: result.is_compliant,
            run_info: Some(run_info),
            document_info,
            records: Some(result.errors.iter().map(issue_from_compliance).collect()),
        }))
    }
}
