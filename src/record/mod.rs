//! Typed ads.txt records
//!
//! An ads.txt file is an ordered list of records. Order matters: downstream
//! consumers resolve duplicates and priorities by position, so [`Records`] keeps
//! the file order exactly.

use std::fmt;
use std::str::FromStr;

/// Relationship between the publisher and the advertising system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// The publisher directly controls the account
    Direct,
    /// The publisher authorized a third party to control the account
    Reseller,
}

impl Relationship {
    /// Returns the canonical uppercase spelling used in ads.txt files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "DIRECT",
            Self::Reseller => "RESELLER",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("DIRECT") {
            Ok(Self::Direct)
        } else if s.eq_ignore_ascii_case("RESELLER") {
            Ok(Self::Reseller)
        } else {
            Err(format!("Unknown relationship type: {}", s))
        }
    }
}

/// A data record declaring one authorized seller account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// Domain of the advertising system, case preserved
    pub ad_system_domain: String,

    /// Publisher's account ID within the advertising system
    pub publisher_account_id: String,

    /// Type of account relationship
    pub relationship: Relationship,

    /// Certification authority ID of the advertising system (e.g. TAG ID)
    pub certification_authority_id: Option<String>,

    /// Extension data following `;`
    pub extension: Option<String>,
}

/// A variable record (`NAME=value`) carrying domain-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    /// Variable name, uppercase (e.g. `CONTACT`, `SUBDOMAIN`, `OWNERDOMAIN`)
    pub name: String,

    /// Trimmed variable value
    pub value: String,
}

/// A single parsed ads.txt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Data(DataRecord),
    Variable(VariableRecord),
}

impl Record {
    /// Returns the data record, if this is one
    pub fn as_data(&self) -> Option<&DataRecord> {
        match self {
            Self::Data(data) => Some(data),
            Self::Variable(_) => None,
        }
    }

    /// Returns the variable record, if this is one
    pub fn as_variable(&self) -> Option<&VariableRecord> {
        match self {
            Self::Variable(variable) => Some(variable),
            Self::Data(_) => None,
        }
    }
}

/// Ordered set of records parsed from one ads.txt file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records(Vec<Record>);

impl Records {
    /// Creates an empty record set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.0.push(record);
    }

    /// Number of records of both kinds
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all records in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    /// Iterates over data records in file order
    pub fn data(&self) -> impl Iterator<Item = &DataRecord> {
        self.0.iter().filter_map(Record::as_data)
    }

    /// Iterates over variable records in file order
    pub fn variables(&self) -> impl Iterator<Item = &VariableRecord> {
        self.0.iter().filter_map(Record::as_variable)
    }

    /// Returns every value declared for a variable, in file order
    ///
    /// The lookup is case-insensitive, so `variable("contact")` finds `CONTACT`.
    pub fn variable<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.variables()
            .filter(move |v| v.name.eq_ignore_ascii_case(name))
            .map(|v| v.value.as_str())
    }

    /// Consumes the set, returning the records as a vector
    pub fn into_vec(self) -> Vec<Record> {
        self.0
    }
}

impl From<Vec<Record>> for Records {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl IntoIterator for Records {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
