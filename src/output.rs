//! Report rendering
//!
//! [`Reporter`] writes a [`Report`] to stdout in one of three shapes:
//!
//! - plain text, one banner line and one line per error;
//! - the `<result>` XML form for fixed profiles;
//! - the `<qoppapdfpreflight>` XML form for parametric profiles, which also
//!   carries run and document metadata.
//!
//! Error details are truncated at `"; buffer"` before they are written, since
//! some engines append raw bytes there.

use std::borrow::Cow;
use std::io::{self, Write};

use chrono::{Datelike, Timelike};

use crate::cli::OutputFormat;
use crate::report::{DocumentInfo, PreflightInfo, Report, Timestamp, ValidationError};

const BUFFER_MARKER: &str = "; buffer";

/// Cut `details` after the `;` of the first `"; buffer"`
pub fn sanitize_details(details: &str) -> &str {
    match details.find(BUFFER_MARKER) {
        Some(position) => &details[..=position],
        None => details,
    }
}

fn escape_with(text: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (quotes && matches!(c, '"' | '\''));
    if !text.contains(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if quotes => escaped.push_str("&quot;"),
            '\'' if quotes => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Escape XML character data: `&`, `<` and `>`
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, false)
}

/// Escape for attribute values and XML 1.0 text: also `"` and `'`
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    escape_with(text, true)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Renders reports to a writer
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write `report` to `out` and flush it.
    pub fn emit<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => self.write_plain(report, out)?,
            OutputFormat::Xml if report.profile.is_parametric() => {
                self.write_preflight_xml(report, out)?
            }
            OutputFormat::Xml => self.write_result_xml(report, out)?,
        }
        out.flush()
    }

    /// Render `report` into a string
    pub fn render(&self, report: &Report) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.emit(report, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn banner(report: &Report) -> String {
        if report.valid {
            format!(
                "The file '{}' is a valid {} file",
                report.filename, report.profile
            )
        } else {
            format!(
                "The file '{}' is NOT {} valid, {} error(s)",
                report.filename,
                report.profile,
                report.error_count()
            )
        }
    }

    fn write_plain<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", Self::banner(report))?;
        if report.valid {
            return Ok(());
        }

        for error in &report.errors {
            write!(out, "{:>6}: {}", error.index, sanitize_details(&error.details))?;
            if let Some(page) = &error.page {
                write!(out, " on page {}", page)?;
            }
            writeln!(out, " (error code {})", error.code)?;
        }
        Ok(())
    }

    fn write_result_xml<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "<result {}=\"{}\">{}</result>",
            report.profile.id(),
            yes_no(report.valid),
            escape_text(&Self::banner(report))
        )?;
        if report.valid {
            return Ok(());
        }

        for error in &report.errors {
            self.write_error_element(error, out)?;
        }
        Ok(())
    }

    fn write_error_element<W: Write>(&self, error: &ValidationError, out: &mut W) -> io::Result<()> {
        write!(out, "<error id=\"{}\"", error.index)?;
        if let Some(page) = &error.page {
            write!(out, " page=\"{}\"", escape_attr(page))?;
        }
        writeln!(
            out,
            " errorcode=\"{}\">{}</error>",
            escape_attr(&error.code),
            escape_text(sanitize_details(&error.details))
        )
    }

    fn write_preflight_xml<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "<qoppapdfpreflight {}=\"{}\">",
            report.profile.id(),
            yes_no(report.valid)
        )?;

        if let Some(info) = &report.preflight_info {
            write_preflight_info(info, out)?;
        }
        if let Some(info) = &report.document_info {
            write_document_info(info, out)?;
        }

        if !report.errors.is_empty() {
            writeln!(out, "<issues count=\"{}\">", report.error_count())?;
            for error in &report.errors {
                write!(out, "<issue")?;
                if let Some(page) = &error.page {
                    write!(out, " page=\"{}\"", escape_attr(page))?;
                }
                writeln!(
                    out,
                    " isfixable=\"{}\">{}</issue>",
                    yes_no(error.fixable.unwrap_or(false)),
                    escape_attr(sanitize_details(&error.details))
                )?;
            }
            writeln!(out, "</issues>")?;
        }

        writeln!(out, "</qoppapdfpreflight>")
    }
}

/// One `<tag>value</tag>` line, skipped when the value is absent or blank
fn write_field<W: Write>(out: &mut W, tag: &str, value: Option<&str>) -> io::Result<()> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    writeln!(out, "<{tag}>{}</{tag}>", escape_attr(value))
}

fn write_date<W: Write>(out: &mut W, base: &str, date: Option<&Timestamp>) -> io::Result<()> {
    let Some(date) = date else {
        return Ok(());
    };
    writeln!(
        out,
        "<date base=\"{}\" year=\"{}\" month=\"{}\" day=\"{}\" hour=\"{}\" minute=\"{}\" second=\"{}\">{}</date>",
        base,
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        escape_attr(&date.to_string())
    )
}

fn write_preflight_info<W: Write>(info: &PreflightInfo, out: &mut W) -> io::Result<()> {
    writeln!(out, "<preflightinfo>")?;
    write_field(out, "computername", info.computer_name.as_deref())?;
    write_field(out, "operatingsystem", info.operating_system.as_deref())?;
    write_field(out, "username", info.user_name.as_deref())?;
    write_field(out, "version", info.version.as_deref())?;
    write_date(out, "datetime", info.date_time.as_ref())?;
    let duration = info.duration_millis.map(|ms| ms.to_string());
    write_field(out, "duration-milliseconds", duration.as_deref())?;
    writeln!(out, "</preflightinfo>")
}

fn write_document_info<W: Write>(info: &DocumentInfo, out: &mut W) -> io::Result<()> {
    writeln!(out, "<documentinfo>")?;
    write_field(out, "author", info.author.as_deref())?;
    write_field(out, "subject", info.subject.as_deref())?;
    write_field(out, "title", info.title.as_deref())?;
    write_field(out, "producer", info.producer.as_deref())?;
    write_field(out, "creator", info.creator.as_deref())?;
    write_field(out, "keywords", info.keywords.as_deref())?;
    write_date(out, "creation", info.creation_date.as_ref())?;
    write_date(out, "modification", info.modification_date.as_ref())?;
    writeln!(out, "</documentinfo>")
}
