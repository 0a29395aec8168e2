//! Reading the PDF Info dictionary.
//!
//! PDF text strings are either UTF-16BE with a byte order mark or a single-byte
//! encoding; dates use the `D:YYYYMMDDHHmmSSOHH'mm'` form where everything
//! after the year is optional.

use std::sync::LazyLock;

use chrono::{FixedOffset, TimeZone};
use pdf_oxide::document::PdfDocument;
use pdf_oxide::object::Object;
use regex::Regex;
use tracing::debug;

use crate::report::{DocumentInfo, Timestamp};

static PDF_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:D:)?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(?:([Zz+\-])(?:(\d{2})'?(?:(\d{2})'?)?)?)?",
    )
    .expect("PDF date pattern is valid")
});

/// Read the trailer's `/Info` dictionary. `None` when the document has none.
pub fn read_document_info(document: &mut PdfDocument) -> Option<DocumentInfo> {
    let entry = document.trailer().as_dict()?.get("Info")?.clone();
    let info = match entry {
        Object::Reference(obj_ref) => match document.load_object(obj_ref) {
            Ok(object) => object,
            Err(err) => {
                debug!("cannot load Info dictionary: {}", err);
                return None;
            }
        },
        object => object,
    };
    let dict = info.as_dict()?;

    let mut text = |key: &str| -> Option<String> {
        let value = match dict.get(key)? {
            Object::Reference(obj_ref) => document.load_object(*obj_ref).ok()?,
            other => other.clone(),
        };
        value.as_string().map(decode_text_string)
    };

    Some(DocumentInfo {
        author: text("Author"),
        subject: text("Subject"),
        title: text("Title"),
        producer: text("Producer"),
        creator: text("Creator"),
        keywords: text("Keywords"),
        creation_date: text("CreationDate").and_then(|raw| parse_pdf_date(&raw)),
        modification_date: text("ModDate").and_then(|raw| parse_pdf_date(&raw)),
    })
}

/// Decode a PDF text string.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    // PDFDocEncoding agrees with Latin-1 for printable text
    bytes.iter().map(|&b| b as char).collect()
}

/// Parse a PDF date string.
pub fn parse_pdf_date(raw: &str) -> Option<Timestamp> {
    let caps = PDF_DATE.captures(raw.trim())?;
    let number = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = number(2, 1)?;
    let day = number(3, 1)?;
    let hour = number(4, 0)?;
    let minute = number(5, 0)?;
    let second = number(6, 0)?;

    let offset_seconds = match caps.get(7).map(|m| m.as_str()) {
        Some("+") | Some("-") => {
            let hours = number(8, 0)? as i32;
            let minutes = number(9, 0)? as i32;
            let magnitude = hours * 3600 + minutes * 60;
            if caps.get(7).map(|m| m.as_str()) == Some("-") {
                -magnitude
            } else {
                magnitude
            }
        }
        _ => 0,
    };

    FixedOffset::east_opt(offset_seconds)?
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}
