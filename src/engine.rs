//! Engine seam
//!
//! The validation engines are external collaborators. These traits describe the
//! two calling conventions the adapters know about:
//!
//! - [`ArchiveEngine`]: a parse phase that may end in a syntactic failure with a
//!   partial result, followed by a conformance pass over the parsed document.
//! - [`PreflightEngine`]: a key-configured engine that verifies a file in a
//!   single call and returns run metadata, document metadata and result records.
//!
//! Types here are the engines' native shapes; the adapters normalize them
//! into [`Report`](crate::report::Report).

use std::path::Path;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::error::EngineResult;
use crate::profile::Conformance;
use crate::report::{DocumentInfo, Timestamp};

/// A single finding as the engine reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineIssue {
    pub code: String,
    pub details: String,
    pub page: Option<u32>,
    pub fixable: Option<bool>,
}

impl EngineIssue {
    pub fn new(code: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            details: details.into(),
            page: None,
            fixable: None,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = Some(fixable);
        self
    }
}

/// Result record of an [`ArchiveEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchiveResult {
    pub valid: bool,
    pub errors: Vec<EngineIssue>,
}

/// Outcome of the parse phase.
#[derive(Debug)]
pub enum ParseOutcome<D> {
    Parsed(D),
    /// The file could not be parsed; the engine still produced a (failing) result.
    SyntacticFailure(ArchiveResult),
}

#[cfg_attr(test, automock(type Document = ();))]
pub trait ArchiveEngine {
    /// Open document handle. Dropping it releases the underlying file.
    type Document;

    fn version(&self) -> String;

    fn parse(&self, path: &Path) -> EngineResult<ParseOutcome<Self::Document>>;

    /// Returns `None` when the engine produced no result object.
    fn validate(
        &self,
        document: &mut Self::Document,
        conformance: Conformance,
    ) -> EngineResult<Option<ArchiveResult>>;
}

/// Metadata about the verification run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunInfo {
    pub computer_name: Option<String>,
    pub os_info: Option<String>,
    pub user_name: Option<String>,
    pub version: Option<String>,
    pub date_time: Option<Timestamp>,
    pub duration: Option<Duration>,
}

/// Result of a [`PreflightEngine`] run. Every section may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreflightResults {
    pub successful: bool,
    pub run_info: Option<RunInfo>,
    pub document_info: Option<DocumentInfo>,
    pub records: Option<Vec<EngineIssue>>,
}

#[cfg_attr(test, automock)]
pub trait PreflightEngine {
    /// Register a licence key with the engine.
    fn set_key(&mut self, key: &str);

    fn version(&self) -> String;

    /// Returns `None` when the engine produced no result object.
    fn verify(
        &self,
        path: &Path,
        conformance: Conformance,
    ) -> EngineResult<Option<PreflightResults>>;
}
