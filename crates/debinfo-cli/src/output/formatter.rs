//! Output formatter trait for CLI results.

use anyhow::Result;
use debinfo_core::Control;
use debinfo_core::InventoryEntry;
use debinfo_core::PackageReport;
use debinfo_core::PackageVisitor;
use serde::Serialize;

/// Which command is producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Show,
    Control,
    List,
}

impl Operation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Control => "control",
            Self::List => "list",
        }
    }

    pub const fn includes_control(self) -> bool {
        matches!(self, Self::Show | Self::Control)
    }

    pub const fn includes_listing(self) -> bool {
        matches!(self, Self::Show | Self::List)
    }
}

/// Common output formatter trait.
///
/// `control_ready` and `entry_ready` are called while the package is still
/// streaming; `finish` gets the complete report.
pub trait OutputFormatter {
    /// Control stanza parsed
    fn control_ready(&self, operation: Operation, text: &str, control: &Control);

    /// One payload entry scanned
    fn entry_ready(&self, operation: Operation, entry: &InventoryEntry);

    /// Inspection finished successfully
    fn finish(&self, operation: Operation, report: &PackageReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: Option<Operation>, error: &anyhow::Error);
}

/// Forwards core callbacks to a formatter.
pub struct FormatterVisitor<'a> {
    formatter: &'a dyn OutputFormatter,
    operation: Operation,
}

impl<'a> FormatterVisitor<'a> {
    pub fn new(formatter: &'a dyn OutputFormatter, operation: Operation) -> Self {
        Self {
            formatter,
            operation,
        }
    }
}

impl PackageVisitor for FormatterVisitor<'_> {
    fn on_control(&mut self, text: &str, control: &Control) {
        self.formatter.control_ready(self.operation, text, control);
    }

    fn on_entry(&mut self, entry: &InventoryEntry) {
        self.formatter.entry_ready(self.operation, entry);
    }
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
