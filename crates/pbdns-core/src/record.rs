//! Record model
//!
//! - [`RecordType`]: the provider's record type whitelist
//! - [`RecordRow`]: one declared record, exactly as read from the declaration file
//! - [`Action`]: the operation applied uniformly to a batch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// DNS record types accepted by the provider
///
/// A row whose type is not one of these never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Alias,
    Srv,
    Tlsa,
    Caa,
    Https,
    Svcb,
}

impl RecordType {
    /// Every whitelisted type, in the order the provider documents them
    pub const ALL: [RecordType; 12] = [
        RecordType::A,
        RecordType::Mx,
        RecordType::Cname,
        RecordType::Alias,
        RecordType::Txt,
        RecordType::Ns,
        RecordType::Aaaa,
        RecordType::Srv,
        RecordType::Tlsa,
        RecordType::Caa,
        RecordType::Https,
        RecordType::Svcb,
    ];

    /// Canonical wire name (upper case)
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Ns => "NS",
            RecordType::Alias => "ALIAS",
            RecordType::Srv => "SRV",
            RecordType::Tlsa => "TLSA",
            RecordType::Caa => "CAA",
            RecordType::Https => "HTTPS",
            RecordType::Svcb => "SVCB",
        }
    }

    /// Comma-separated whitelist, used in validation messages
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(RecordType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Matching is ASCII case-insensitive and ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidRecordType {
                record_type: s.to_string(),
                allowed: Self::allowed_list(),
            })
    }
}

/// One declared DNS record
///
/// `record_type` is kept as declared so that rows with an unknown type can
/// still be reported back to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    /// Record name (e.g. "home" or "home.example.com")
    pub host: String,

    /// Record type as declared (validated later)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record value. May be empty for deletions.
    #[serde(default)]
    pub answer: String,
}

impl RecordRow {
    /// Create a new record row
    pub fn new(
        host: impl Into<String>,
        record_type: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            record_type: record_type.into(),
            answer: answer.into(),
        }
    }
}

impl fmt::Display for RecordRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.host, self.record_type, self.answer)
    }
}

/// Operation applied to every row of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a new record
    #[default]
    Create,
    /// Replace the content of every record matching (host, type)
    Update,
    /// Delete every record matching (host, type)
    Delete,
}

impl Action {
    /// Lower-case action name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Past tense, for log lines
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::invalid_action(s)),
        }
    }
}
