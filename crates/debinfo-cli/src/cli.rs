//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use debinfo_core::InspectConfig;
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debinfo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long, global = true)]
    pub human_readable: bool,

    /// Maximum declared size of control.tar.gz (e.g. 100K, 1M)
    #[arg(long, global = true, value_name = "SIZE", value_parser = parse_byte_size)]
    pub max_control_size: Option<u64>,

    /// Bytes of each file read to detect its content type
    #[arg(long, global = true, value_name = "SIZE", value_parser = parse_byte_size)]
    pub sniff_limit: Option<u64>,
}

impl Cli {
    /// Inspection limits after applying command-line overrides.
    pub fn inspect_config(&self) -> InspectConfig {
        let mut config = InspectConfig::default();
        if let Some(size) = self.max_control_size {
            config.max_control_member_size = size;
        }
        if let Some(limit) = self.sniff_limit {
            config.sniff_limit = usize::try_from(limit).unwrap_or(usize::MAX);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show control fields and the payload listing
    Show(PackageArgs),
    /// Print the parsed control fields
    Control(PackageArgs),
    /// List payload contents with content types
    List(PackageArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackageArgs {
    /// Path to the .deb file (reads standard input if omitted or "-")
    #[arg(value_name = "PACKAGE")]
    pub package: Option<PathBuf>,
}

impl PackageArgs {
    /// Returns the package path, or `None` for standard input.
    pub fn path(&self) -> Option<&Path> {
        self.package
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("100K").unwrap(), 102_400);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_config_overrides() {
        let cli = Cli::parse_from([
            "debinfo",
            "--max-control-size",
            "1M",
            "--sniff-limit",
            "512",
            "show",
            "pkg.deb",
        ]);
        let config = cli.inspect_config();
        assert_eq!(config.max_control_member_size, 1024 * 1024);
        assert_eq!(config.sniff_limit, 512);
        assert_eq!(
            config.max_control_file_size,
            InspectConfig::default().max_control_file_size
        );
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::parse_from(["debinfo", "list", "-"]);
        let Commands::List(args) = &cli.command else {
            panic!("expected list");
        };
        assert!(args.path().is_none());

        let cli = Cli::parse_from(["debinfo", "control", "hello.deb"]);
        let Commands::Control(args) = &cli.command else {
            panic!("expected control");
        };
        assert_eq!(args.path(), Some(Path::new("hello.deb")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["debinfo", "-v", "-q", "show"]).is_err());
    }
}
