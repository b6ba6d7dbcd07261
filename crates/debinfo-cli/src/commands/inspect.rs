//! `show`, `control` and `list` command implementation

use crate::cli::PackageArgs;
use crate::error::add_package_context;
use crate::output::FormatterVisitor;
use crate::output::Operation;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use debinfo_core::InspectConfig;
use debinfo_core::inspect_package_with;
use std::fs::File;
use std::io::BufReader;
use std::io::{self};
use tracing::debug;

const STDIN_LABEL: &str = "<stdin>";

pub fn execute(
    args: &PackageArgs,
    operation: Operation,
    config: &InspectConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let mut visitor = FormatterVisitor::new(formatter, operation);

    let report = if let Some(path) = args.path() {
        let label = path.display().to_string();
        debug!(package = %label, operation = operation.name(), "inspecting");
        let file = File::open(path).with_context(|| format!("Failed to open '{label}'"))?;
        add_package_context(
            inspect_package_with(BufReader::new(file), config, &mut visitor),
            &label,
        )?
    } else {
        debug!(operation = operation.name(), "inspecting standard input");
        add_package_context(
            inspect_package_with(io::stdin().lock(), config, &mut visitor),
            STDIN_LABEL,
        )?
    };

    formatter.finish(operation, &report)
}
