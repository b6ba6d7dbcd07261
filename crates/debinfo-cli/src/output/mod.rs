//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::FormatterVisitor;
pub use formatter::Operation;
pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(
    json: bool,
    verbose: bool,
    quiet: bool,
    human_readable: bool,
) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet, human_readable))
    }
}
