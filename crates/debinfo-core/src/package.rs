//! Debian binary package assembly.
//!
//! A `.deb` is an `ar` archive with exactly three leading members, in order:
//!
//! 1. `debian-binary`: the literal `2.0\n`
//! 2. `control.tar.gz`: gzip-compressed tar holding `./control`
//! 3. `data.tar.gz`: gzip-compressed tar holding the installed files
//!
//! Members are consumed strictly in order with no seeking. The payload is
//! streamed through the inventory scanner and never buffered.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::InspectConfig;
use crate::InspectError;
use crate::NoopVisitor;
use crate::PackageReport;
use crate::PackageVisitor;
use crate::Result;
use crate::ar::ArReader;
use crate::ar::Member;
use crate::control::parse_control;
use crate::inventory::Inventory;
use crate::inventory::scan_payload_with;

/// Name of the version marker member.
pub const DEBIAN_BINARY: &str = "debian-binary";

/// The only supported package format version.
pub const FORMAT_VERSION: &str = "2.0\n";

/// Name of the compressed control archive member.
pub const CONTROL_MEMBER: &str = "control.tar.gz";

/// Name of the compressed payload archive member.
pub const DATA_MEMBER: &str = "data.tar.gz";

/// Paths accepted for the control file inside the control archive.
pub const CONTROL_FILE_PATHS: [&str; 2] = ["./control", "control"];

/// Inspects a package read from `reader`, starting at the `!<arch>\n`
/// signature.
///
/// # Errors
///
/// Returns the first framing, sequencing, content or grammar error found.
/// No partial report is produced.
///
/// # Examples
///
/// ```
/// use debinfo_core::{InspectConfig, inspect_package};
/// use debinfo_core::test_utils::{DebBuilder, TarTestBuilder};
///
/// let deb = DebBuilder::new()
///     .control("Package: hello\nVersion: 1.0\n")
///     .data(TarTestBuilder::new().add_file("./usr/bin/hello", b"#!/bin/sh\n").build())
///     .build();
///
/// let report = inspect_package(deb.as_slice(), &InspectConfig::default())?;
/// assert_eq!(report.package(), Some("hello"));
/// assert_eq!(report.inventory.file_count, 1);
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
pub fn inspect_package<R: Read>(reader: R, config: &InspectConfig) -> Result<PackageReport> {
    inspect_package_with(reader, config, &mut NoopVisitor)
}

/// Like [`inspect_package`], notifying `visitor` as the control stanza and
/// each payload entry become available.
///
/// # Errors
///
/// Same as [`inspect_package`].
pub fn inspect_package_with<R, V>(
    reader: R,
    config: &InspectConfig,
    visitor: &mut V,
) -> Result<PackageReport>
where
    R: Read,
    V: PackageVisitor + ?Sized,
{
    let mut ar = ArReader::with_signature(reader)?;
    inspect_members(&mut ar, config, visitor)
}

/// Opens `path` and inspects it with buffered reads.
///
/// # Errors
///
/// Returns [`InspectError::Io`] if the file cannot be opened, otherwise the
/// same errors as [`inspect_package`].
pub fn inspect_path<P: AsRef<Path>>(path: P, config: &InspectConfig) -> Result<PackageReport> {
    let path = path.as_ref();
    debug!(path = %path.display(), "inspecting package file");
    let file = File::open(path)?;
    inspect_package(BufReader::new(file), config)
}

/// Assembles a package from a reader already positioned past the signature.
///
/// Members after `data.tar.gz` are left unread.
///
/// # Errors
///
/// Same as [`inspect_package`], minus the signature check.
pub fn inspect_members<R, V>(
    ar: &mut ArReader<R>,
    config: &InspectConfig,
    visitor: &mut V,
) -> Result<PackageReport>
where
    R: Read,
    V: PackageVisitor + ?Sized,
{
    let mut report = PackageReport::default();

    {
        let mut member = expect_member(ar, DEBIAN_BINARY)?;
        report.members.push(member.header().clone());
        read_version(&mut member)?;
        debug!(version = FORMAT_VERSION.trim_end(), "format version ok");
    }

    {
        let mut member = expect_member(ar, CONTROL_MEMBER)?;
        report.members.push(member.header().clone());
        let text = read_control(&mut member, config)?;
        let control = parse_control(&text)?;
        debug!(fields = control.len(), package = ?control.package(), "parsed control stanza");
        visitor.on_control(&text, &control);
        report.control_text = text;
        report.control = control;
    }

    let mut member = expect_member(ar, DATA_MEMBER)?;
    report.members.push(member.header().clone());
    report.inventory = scan_data(&mut member, config, visitor)?;
    debug!(
        entries = report.inventory.len(),
        files = report.inventory.file_count,
        directories = report.inventory.directory_count,
        total_size = report.inventory.total_file_size,
        "scanned payload"
    );

    Ok(report)
}

/// Advances to the next member and checks its name.
fn expect_member<'a, R: Read>(
    ar: &'a mut ArReader<R>,
    expected: &'static str,
) -> Result<Member<'a, R>> {
    match ar.next_member()? {
        Some(member) if member.name() == expected => Ok(member),
        Some(member) => Err(InspectError::UnexpectedMember {
            expected,
            found: member.name().to_string(),
        }),
        None => Err(InspectError::MissingMember { expected }),
    }
}

fn read_version<R: Read>(member: &mut Member<'_, R>) -> Result<()> {
    let expected_size = FORMAT_VERSION.len() as u64;
    if member.size() != expected_size {
        return Err(InspectError::UnexpectedSize {
            member: member.name().to_string(),
            expected: expected_size,
            found: member.size(),
        });
    }

    let mut body = Vec::with_capacity(FORMAT_VERSION.len());
    member
        .read_to_end(&mut body)
        .map_err(InspectError::from_body_io)?;
    if body != FORMAT_VERSION.as_bytes() {
        return Err(InspectError::VersionMismatch {
            expected: FORMAT_VERSION,
            found: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(())
}

/// Extracts the `control` file text from the control archive member.
fn read_control<R: Read>(member: &mut Member<'_, R>, config: &InspectConfig) -> Result<String> {
    let name = member.name().to_string();
    if member.size() > config.max_control_member_size {
        return Err(InspectError::MemberTooLarge {
            member: name,
            size: member.size(),
            max: config.max_control_member_size,
        });
    }

    let decode_err = |source| InspectError::decompression(&name, source);

    let mut archive = tar::Archive::new(GzDecoder::new(member));
    for entry in archive.entries().map_err(decode_err)? {
        let entry = entry.map_err(decode_err)?;
        if !is_control_path(&entry) {
            continue;
        }

        let max = config.max_control_file_size;
        let mut buf = Vec::new();
        entry
            .take(max.saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(decode_err)?;
        if buf.len() as u64 > max {
            return Err(InspectError::ControlFileTooLarge { max });
        }
        return Ok(String::from_utf8(buf)?);
    }

    Err(InspectError::ControlFileNotFound { member: name })
}

fn is_control_path<R: Read>(entry: &tar::Entry<'_, R>) -> bool {
    let path = entry.path_bytes();
    CONTROL_FILE_PATHS.iter().any(|p| p.as_bytes() == &*path)
}

/// Streams the payload member through the inventory scanner.
fn scan_data<R, V>(
    member: &mut Member<'_, R>,
    config: &InspectConfig,
    visitor: &mut V,
) -> Result<Inventory>
where
    R: Read,
    V: PackageVisitor + ?Sized,
{
    let name = member.name().to_string();
    scan_payload_with(GzDecoder::new(member), config, |entry| visitor.on_entry(entry))
        .map_err(|source| InspectError::decompression(&name, source))
}
