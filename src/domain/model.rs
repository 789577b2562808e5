use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One tenant/address pair as shown in the result view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    pub address: String,
}

impl ResultRow {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Names grouped under the exact address string they were listed with.
///
/// Name order inside a group is encounter order; formatting sorts a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedReport {
    pub(crate) groups: HashMap<String, Vec<String>>,
}

impl GroupedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, address: String, name: String) {
        self.groups.entry(address).or_default().push(name);
    }

    pub fn names(&self, address: &str) -> Option<&[String]> {
        self.groups.get(address).map(Vec::as_slice)
    }

    /// Number of address groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of names across all groups, duplicates included.
    pub fn total_names(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Look up the addresses a tenant name is registered at.
    Tenant,
    /// Look up the tenants registered at an address.
    Address,
}

impl SearchMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchMode::Tenant => "/search/_addresses",
            SearchMode::Address => "/search/_tenants",
        }
    }

    pub fn query_param(&self) -> &'static str {
        match self {
            SearchMode::Tenant => "name",
            SearchMode::Address => "address",
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tenant" => Ok(SearchMode::Tenant),
            "address" => Ok(SearchMode::Address),
            other => Err(format!("unknown search mode `{}` (expected tenant or address)", other)),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Tenant => write!(f, "tenant"),
            SearchMode::Address => write!(f, "address"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#5cb85c",
            Severity::Warning => "#ffc107",
            Severity::Error => "#dc3545",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Severity::Success => (0x5c, 0xb8, 0x5c),
            Severity::Warning => (0xff, 0xc1, 0x07),
            Severity::Error => (0xdc, 0x35, 0x45),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Body returned by the bulk import endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub success: u64,
    pub failed: u64,
}

impl UploadSummary {
    /// `None` when the server's counts do not fit in a `u64` together.
    pub fn total(&self) -> Option<u64> {
        self.success.checked_add(self.failed)
    }

    pub fn message(&self) -> Option<String> {
        self.total()
            .map(|total| format!("Imported {}/{} entries.", self.success, total))
    }
}

/// Classification of an insertion response by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    PartialSuccess,
    Failure,
}

impl InsertOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            201 => InsertOutcome::Created,
            206 => InsertOutcome::PartialSuccess,
            _ => InsertOutcome::Failure,
        }
    }
}

/// Bytes sent so far out of the upload's total size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    pub fn is_length_computable(&self) -> bool {
        self.total > 0
    }

    pub fn fraction(&self) -> Option<f64> {
        if !self.is_length_computable() {
            return None;
        }
        Some((self.loaded as f64 / self.total as f64).min(1.0))
    }

    pub fn percent(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }
}

/// Address as the search endpoints send it: nested `{address: ...}` or, from
/// older servers, a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressField {
    Nested {
        #[serde(default)]
        address: Option<String>,
    },
    Flat(String),
}

/// One record of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<AddressField>,
}

impl From<SearchRecord> for ResultRow {
    fn from(record: SearchRecord) -> Self {
        let address = match record.address {
            Some(AddressField::Nested { address }) => address.unwrap_or_default(),
            Some(AddressField::Flat(address)) => address,
            None => String::new(),
        };
        ResultRow {
            name: record.name.unwrap_or_default(),
            address,
        }
    }
}

/// Body sent to the single-record insert endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTenant {
    pub name: String,
    pub address: String,
}
