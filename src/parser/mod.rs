//! ads.txt parsing
//!
//! Parsing happens in two steps:
//! - splitting raw bytes into lines, whatever the line terminator
//! - classifying each line as a data record, a variable record, or noise
//!
//! Parsing never fails. Lines that fit no grammar are dropped.

mod lines;
mod records;

pub use lines::{split_lines, Lines};
pub use records::{parse_line, parse_records};

use crate::record::Records;
use std::io::Read;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses an ads.txt file body into records
///
/// # Examples
///
/// ```
/// use adstxt::{parse_body, Relationship};
///
/// let records = parse_body(b"example.com, 1234, DIRECT\n#comment\n\nCONTACT=adops@example.com\n");
/// assert_eq!(records.len(), 2);
///
/// let data = records.data().next().unwrap();
/// assert_eq!(data.relationship, Relationship::Direct);
/// assert_eq!(records.variable("CONTACT").next(), Some("adops@example.com"));
/// ```
pub fn parse_body(body: &[u8]) -> Records {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    parse_records(split_lines(body))
}

/// Reads a whole ads.txt file from `reader` and parses it
///
/// # Returns
///
/// * `Ok(Records)` - The parsed records
/// * `Err(std::io::Error)` - The reader failed before reaching end of input
pub fn parse_reader<R: Read>(mut reader: R) -> std::io::Result<Records> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    Ok(parse_body(&body))
}
