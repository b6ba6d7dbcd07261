//! Error conversion utilities for CLI.
//!
//! Converts debinfo-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use debinfo_core::ErrorCategory;
use debinfo_core::InspectError;

/// Member name suffixes for compression formats this tool cannot decode.
const UNSUPPORTED_COMPRESSION: [&str; 4] = [".xz", ".zst", ".bz2", ".lzma"];

/// Converts `InspectError` to a user-friendly anyhow error with context.
///
/// `source` names the input, e.g. a file path or `<stdin>`.
pub fn convert_inspect_error(err: InspectError, source: &str) -> anyhow::Error {
    match err {
        InspectError::BadSignature { found, .. } => {
            anyhow!(
                "'{source}' is not a Debian package (no ar signature, found {found:?})\n\
                 HINT: Pass a .deb file, not an extracted directory or a .changes file."
            )
        }
        InspectError::UnexpectedMember { expected, found }
            if UNSUPPORTED_COMPRESSION.iter().any(|ext| found.ends_with(ext)) =>
        {
            anyhow!(
                "Unsupported package compression in '{source}': found {found:?}, expected {expected:?}\n\
                 HINT: Only gzip-compressed members are supported. \
                 Repack with `dpkg-deb -Zgzip` to inspect this package."
            )
        }
        InspectError::MemberTooLarge { member, size, max } => {
            anyhow!(
                "Member {member:?} in '{source}' declared size too large: {size} bytes (limit {max})\n\
                 HINT: Use --max-control-size to raise the limit if the package is trusted."
            )
        }
        InspectError::VersionMismatch { found, .. } => {
            anyhow!(
                "Unsupported package format in '{source}': debian-binary is {found:?}\n\
                 HINT: Only format version 2.0 packages are supported."
            )
        }
        InspectError::Io(io_err) => {
            anyhow!("I/O error while reading '{source}': {io_err}")
        }
        err if err.category() == ErrorCategory::Grammar => {
            anyhow::Error::from(err).context(format!("Invalid control stanza in '{source}'"))
        }
        err if err.is_framing() => anyhow::Error::from(err).context(format!(
            "Corrupt package '{source}'\n\
             HINT: The file may be truncated or not a Debian package."
        )),
        _ => anyhow::Error::from(err).context(format!("Error inspecting package '{source}'")),
    }
}

/// Adds package context to a core result.
pub fn add_package_context<T>(
    result: Result<T, InspectError>,
    source: &str,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_inspect_error(e, source))
}
