//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::Operation;
use super::formatter::OutputFormatter;
use anyhow::Result;
use debinfo_core::Control;
use debinfo_core::InventoryEntry;
use debinfo_core::PackageReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct MemberOutput<'a> {
    name: &'a str,
    size: u64,
    mode: String,
    mtime: i64,
}

#[derive(Serialize)]
struct EntryOutput {
    name: String,
    kind: &'static str,
    size: u64,
    mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_target: Option<String>,
}

impl From<&InventoryEntry> for EntryOutput {
    fn from(entry: &InventoryEntry) -> Self {
        Self {
            name: entry.path.display().to_string(),
            kind: entry.kind.name(),
            size: entry.size,
            mode: entry.mode_string(),
            mime: entry.content_type,
            link_target: entry
                .kind
                .link_target()
                .map(|target| target.display().to_string()),
        }
    }
}

#[derive(Serialize)]
struct Summary {
    file_count: usize,
    directory_count: usize,
    total_file_size: u64,
}

#[derive(Serialize)]
struct PackageOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<Vec<MemberOutput<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    control: Option<BTreeMap<&'a str, &'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Vec<EntryOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

impl<'a> PackageOutput<'a> {
    fn new(operation: Operation, report: &'a PackageReport) -> Self {
        let listing = operation.includes_listing();
        Self {
            members: (operation == Operation::Show).then(|| {
                report
                    .members
                    .iter()
                    .map(|m| MemberOutput {
                        name: &m.name,
                        size: m.size,
                        mode: format!("{:o}", m.mode),
                        mtime: m.mtime,
                    })
                    .collect()
            }),
            control: operation
                .includes_control()
                .then(|| report.control.iter().collect()),
            data: listing.then(|| report.inventory.entries.iter().map(EntryOutput::from).collect()),
            summary: listing.then(|| Summary {
                file_count: report.inventory.file_count,
                directory_count: report.inventory.directory_count,
                total_file_size: report.inventory.total_file_size,
            }),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn control_ready(&self, _operation: Operation, _text: &str, _control: &Control) {}

    fn entry_ready(&self, _operation: Operation, _entry: &InventoryEntry) {}

    fn finish(&self, operation: Operation, report: &PackageReport) -> Result<()> {
        let output = JsonOutput::success(operation.name(), PackageOutput::new(operation, report));
        Self::output(&output)
    }

    fn format_error(&self, operation: Option<Operation>, error: &anyhow::Error) {
        let name = operation.map_or("unknown", Operation::name);
        let output = JsonOutput::<()>::error(name, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
