use crate::core::report::{format_report, group_by_address, render_csv};
use crate::core::{ResultRow, Storage};
use crate::utils::error::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const DEFAULT_TEXT_FILENAME: &str = "search_results.txt";
pub const DEFAULT_CSV_FILENAME: &str = "search_results.csv";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Grouped `[address]` report.
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    pub fn default_filename(&self) -> &'static str {
        match self {
            ExportFormat::Text => DEFAULT_TEXT_FILENAME,
            ExportFormat::Csv => DEFAULT_CSV_FILENAME,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain;charset=utf-8",
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format `{}` (expected text or csv)", other)),
        }
    }
}

/// A rendered export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub filename: String,
    pub format: ExportFormat,
    pub text: String,
}

impl ReportExport {
    pub fn from_rows(rows: &[ResultRow], format: ExportFormat, filename: impl Into<String>) -> Result<Self> {
        let text = match format {
            ExportFormat::Text => format_report(&group_by_address(rows)),
            ExportFormat::Csv => render_csv(rows)?,
        };
        Ok(Self {
            filename: filename.into(),
            format,
            text,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn data_uri(&self) -> String {
        data_uri(self.mime_type(), &self.text)
    }
}

pub fn data_uri(mime_type: &str, text: &str) -> String {
    format!("data:{},{}", mime_type, encode_uri_component(text))
}

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Saves `text` as `filename` and returns where it was written.
pub async fn export_report<S: Storage>(storage: &S, text: &str, filename: &str) -> Result<String> {
    tracing::debug!("Writing export ({} bytes) to {}", text.len(), filename);
    storage.write_file(filename, text.as_bytes()).await?;

    let location = storage.location(filename);
    tracing::info!("Exported search results to {}", location);
    Ok(location)
}
