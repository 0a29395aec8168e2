//! # pdfa-validate Library
//!
//! Command-line front-ends that check a single PDF file against PDF/A and
//! print a plain-text or XML report. Conformance checking is done by the
//! `pdf_oxide` crate behind the [`engine`] traits; [`adapter`] normalizes its
//! results into a [`Report`] and [`output`] renders that report.

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod doc_info;
pub mod engine;
pub mod error;
pub mod error_reporter;
pub mod host;
pub mod logging;
pub mod output;
pub mod oxide;
pub mod profile;
pub mod report;

pub use adapter::{ArchiveAdapter, PreflightAdapter, ValidatorAdapter};
pub use cli::{Grammar, Invocation, OutputFormat};
pub use config::{Config, ConfigError, ConfigManager};
pub use error::{AdapterError, EngineError};
pub use error_reporter::ErrorReporter;
pub use output::Reporter;
pub use oxide::{OxideArchiveEngine, OxidePreflightEngine};
pub use profile::{Conformance, Profile};
pub use report::{DocumentInfo, PreflightInfo, Report, ValidationError};
