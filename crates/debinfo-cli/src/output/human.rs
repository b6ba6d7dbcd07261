//! Human-readable output formatter with colors and styling.

use super::formatter::Operation;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use debinfo_core::Control;
use debinfo_core::InventoryEntry;
use debinfo_core::PackageReport;

const NAME_WIDTH: usize = 40;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    human_readable: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool, human_readable: bool) -> Self {
        Self {
            verbose,
            quiet,
            human_readable,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn size_text(&self, bytes: u64) -> String {
        if self.human_readable {
            Self::format_size(bytes)
        } else {
            bytes.to_string()
        }
    }

    /// Re-serializes fields in stanza form, continuation lines indented.
    fn render_control(control: &Control) -> Vec<String> {
        let mut lines = Vec::new();
        for (key, value) in control.iter() {
            let mut parts = value.split('\n');
            lines.push(format!("{key}: {}", parts.next().unwrap_or_default()));
            lines.extend(parts.map(|part| format!(" {part}")));
        }
        lines
    }

    fn render_row(&self, entry: &InventoryEntry) -> String {
        format!(
            "{:<width$} {} {:>10} {}",
            entry.path.display(),
            entry.mode_string(),
            self.size_text(entry.size),
            entry.label(),
            width = NAME_WIDTH
        )
    }

    fn write_heading(&self, text: &str) {
        if self.use_colors {
            let _ = self.term.write_line(&style(text).bold().to_string());
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn control_ready(&self, operation: Operation, text: &str, control: &Control) {
        if self.quiet {
            return;
        }

        match operation {
            Operation::Show => {
                let _ = self.term.write_line(text.trim_end_matches('\n'));
                let _ = self.term.write_line("");
            }
            Operation::Control => {
                for line in Self::render_control(control) {
                    let _ = self.term.write_line(&line);
                }
            }
            Operation::List => {}
        }

        if operation.includes_listing() {
            self.write_heading(&format!(
                "{:<width$} {:<10} {:>10} {}",
                "Name",
                "Mode",
                "Size",
                "MIME",
                width = NAME_WIDTH
            ));
        }
    }

    fn entry_ready(&self, operation: Operation, entry: &InventoryEntry) {
        if self.quiet || !operation.includes_listing() {
            return;
        }
        let row = self.render_row(entry);
        if self.use_colors && entry.kind.is_directory() {
            let _ = self.term.write_line(&style(row).cyan().to_string());
        } else {
            let _ = self.term.write_line(&row);
        }
    }

    fn finish(&self, operation: Operation, report: &PackageReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.verbose && operation == Operation::Show {
            self.term.write_line("")?;
            self.write_heading("Members:");
            for member in &report.members {
                self.term.write_line(&format!(
                    "  {:<16} {:>10}  mode {:o}  mtime {}",
                    member.name, member.size, member.mode, member.mtime
                ))?;
            }
        }

        if operation.includes_listing() {
            let inventory = &report.inventory;
            self.term.write_line("")?;
            self.term
                .write_line(&format!("File count: {}", inventory.file_count))?;
            self.term
                .write_line(&format!("Directory count: {}", inventory.directory_count))?;
            self.term.write_line(&format!(
                "Total file size: {}",
                self.size_text(inventory.total_file_size)
            ))?;
        }

        Ok(())
    }

    fn format_error(&self, _operation: Option<Operation>, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use debinfo_core::inventory::EntryKind;
    use std::path::PathBuf;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_scaled() {
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(1536 * 1024), "1.5 MB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn test_render_control_restores_continuations() {
        let control: Control = "Package: hello\nDescription: greeter\n more\n .\n"
            .parse()
            .unwrap();
        assert_eq!(
            HumanFormatter::render_control(&control),
            ["Description: greeter", " more", " .", "Package: hello"]
        );
    }

    #[test]
    fn test_render_row() {
        let formatter = HumanFormatter::new(false, false, false);
        let entry = InventoryEntry {
            path: PathBuf::from("./usr/bin/hello"),
            kind: EntryKind::File,
            size: 26_960,
            mode: 0o755,
            content_type: Some("application/x-sharedlib"),
        };
        let row = formatter.render_row(&entry);
        assert!(row.starts_with("./usr/bin/hello "));
        assert!(row.contains("-rwxr-xr-x"));
        assert!(row.contains("26960"));
        assert!(row.ends_with("application/x-sharedlib"));
    }
}
