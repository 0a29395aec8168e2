//! Normalized outcome of a single validation run.
//!
//! Adapters build a [`Report`] from whatever their engine returns; the
//! [`Reporter`](crate::output::Reporter) renders it without knowing which
//! backend produced it.

use chrono::{DateTime, FixedOffset};

use crate::profile::Profile;

/// Timestamps carry the offset they were recorded with.
pub type Timestamp = DateTime<FixedOffset>;

/// One conformance violation, in the order the engine reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Position in [`Report::errors`]
    pub index: usize,
    pub code: String,
    /// Raw engine text; sanitized only when rendered
    pub details: String,
    pub page: Option<String>,
    pub fixable: Option<bool>,
}

/// Facts about the validation run itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreflightInfo {
    pub computer_name: Option<String>,
    pub operating_system: Option<String>,
    pub user_name: Option<String>,
    pub version: Option<String>,
    pub date_time: Option<Timestamp>,
    pub duration_millis: Option<u64>,
}

/// Document metadata from the PDF's Info dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    pub author: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub producer: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub creation_date: Option<Timestamp>,
    pub modification_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Input path exactly as given on the command line
    pub filename: String,
    pub profile: Profile,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub preflight_info: Option<PreflightInfo>,
    pub document_info: Option<DocumentInfo>,
}

impl Report {
    /// Create a passing report with no errors and no metadata
    pub fn new(filename: impl Into<String>, profile: Profile) -> Self {
        Self {
            filename: filename.into(),
            profile,
            valid: true,
            errors: Vec::new(),
            preflight_info: None,
            document_info: None,
        }
    }

    /// Append an error; the report no longer passes.
    pub fn push_error(
        &mut self,
        code: impl Into<String>,
        details: impl Into<String>,
        page: Option<String>,
        fixable: Option<bool>,
    ) {
        self.errors.push(ValidationError {
            index: self.errors.len(),
            code: code.into(),
            details: details.into(),
            page,
            fixable,
        });
        self.valid = false;
    }

    /// Record the engine's own verdict. A report with errors never passes.
    pub fn set_engine_verdict(&mut self, engine_valid: bool) {
        self.valid = engine_valid && self.errors.is_empty();
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
