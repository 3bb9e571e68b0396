//! Record grammar for ads.txt lines
//!
//! Parsing is deliberately lenient. ads.txt files are third-party input, so a
//! malformed line is dropped instead of failing the whole file.

use crate::record::{DataRecord, Record, Records, Relationship, VariableRecord};

/// Parses a sequence of raw lines into records, keeping file order
pub fn parse_records<I, S>(lines: I) -> Records
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Records::new();

    for line in lines {
        let trimmed = line.as_ref().trim();

        // Skip comments and empty lines
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Some(record) => records.push(record),
            None => tracing::trace!("Discarding malformed ads.txt line: {}", trimmed),
        }
    }

    records
}

/// Parses one trimmed, non-comment line
///
/// Returns `None` when the line fits neither the variable nor the data grammar.
pub fn parse_line(line: &str) -> Option<Record> {
    // Anything after '#' is a trailing comment
    let line = match line.split_once('#') {
        Some((content, _)) => content.trim(),
        None => line.trim(),
    };

    if line.is_empty() {
        return None;
    }

    if let Some((name, value)) = line.split_once('=') {
        let name = name.trim();
        if is_variable_name(name) {
            return parse_variable(name, value);
        }
    }

    parse_data(line).map(Record::Data)
}

/// A variable name is a bare token: letters, digits, '-' and '_'
fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn parse_variable(name: &str, value: &str) -> Option<Record> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some(Record::Variable(VariableRecord {
        name: name.to_ascii_uppercase(),
        value: value.to_string(),
    }))
}

/// Parses `domain, publisher-id, relationship[, cert-authority-id][; extension]`
///
/// Fields past the fourth are ignored.
fn parse_data(line: &str) -> Option<DataRecord> {
    let (fields, extension) = match line.split_once(';') {
        Some((fields, extension)) => (fields, non_empty(extension)),
        None => (line, None),
    };

    let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
    if fields.len() < 3 || fields[..3].iter().any(|f| f.is_empty()) {
        return None;
    }

    let relationship: Relationship = fields[2].parse().ok()?;

    Some(DataRecord {
        ad_system_domain: fields[0].to_string(),
        publisher_account_id: fields[1].to_string(),
        relationship,
        certification_authority_id: fields.get(3).copied().and_then(non_empty),
        extension,
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
