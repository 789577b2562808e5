use crate::core::{GroupedReport, ResultRow};
use crate::utils::error::{FinderError, Result};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use std::cmp::Ordering;

/// Groups rows by exact address string, keeping names in encounter order.
pub fn group_by_address(rows: &[ResultRow]) -> GroupedReport {
    let mut report = GroupedReport::new();
    for row in rows {
        report.push(row.address.clone(), row.name.clone());
    }
    report
}

/// Renders `[address]\nname,name` blocks sorted by address, separated by a
/// blank line. Empty report gives an empty string.
pub fn format_report(report: &GroupedReport) -> String {
    let order = LocaleOrder::new();
    let mut groups: Vec<(&String, &Vec<String>)> = report.groups.iter().collect();
    groups.sort_by(|(a, _), (b, _)| order.cmp(a, b));

    groups
        .into_iter()
        .map(|(address, names)| {
            let mut sorted = names.clone();
            sorted.sort_by(|a, b| order.cmp(a, b));
            format!("[{}]\n{}", address, sorted.join(","))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Root-locale collation with a code point tie-break, so distinct strings
/// never compare equal.
pub struct LocaleOrder {
    collator: Option<CollatorBorrowed<'static>>,
}

impl LocaleOrder {
    pub fn new() -> Self {
        let collator = match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!("⚠️ Collation data unavailable, sorting by code point: {}", e);
                None
            }
        };
        Self { collator }
    }

    pub fn cmp(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => Ordering::Equal,
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for LocaleOrder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_table(rows: &[ResultRow]) -> String {
    if rows.is_empty() {
        return "No results.".to_string();
    }

    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{:<width$}  {}", "NAME", "ADDRESS", width = name_width));
    for row in rows {
        lines.push(format!("{:<width$}  {}", row.name, row.address, width = name_width));
    }
    lines.join("\n")
}

/// Flat `name,address` export in response order.
pub fn render_csv(rows: &[ResultRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "address"])?;
    for row in rows {
        writer.write_record([&row.name, &row.address])?;
    }

    let bytes = writer.into_inner().map_err(|e| FinderError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| FinderError::ValidationError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
