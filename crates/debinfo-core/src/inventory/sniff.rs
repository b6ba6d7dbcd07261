//! Content-type sniffing from a bounded prefix.
//!
//! Detection only looks at the bytes it is given; callers decide how much of
//! a file to read (see [`crate::InspectConfig::sniff_limit`]). Labels are
//! MIME types. Text types carry a `charset=utf-8` parameter.

/// Label for zero-length content.
pub const EMPTY: &str = "inode/x-empty";

/// Label for UTF-8 text without a more specific match.
pub const TEXT: &str = "text/plain; charset=utf-8";

/// Label for anything that is neither recognized nor text.
pub const BINARY: &str = "application/octet-stream";

const ELF_MAGIC: &[u8] = b"\x7fELF";

/// Fixed byte signatures, checked in order.
const SIGNATURES: &[(usize, &[u8], &str)] = &[
    (0, b"!<arch>\ndebian-binary", "application/vnd.debian.binary-package"),
    (0, b"!<arch>\n", "application/x-archive"),
    (0, b"\x1f\x8b", "application/gzip"),
    (0, b"BZh", "application/x-bzip2"),
    (0, b"\xfd7zXZ\x00", "application/x-xz"),
    (0, b"\x28\xb5\x2f\xfd", "application/zstd"),
    (0, b"PK\x03\x04", "application/zip"),
    (257, b"ustar", "application/x-tar"),
    (0, b"\x89PNG\r\n\x1a\n", "image/png"),
    (0, b"\xff\xd8\xff", "image/jpeg"),
    (0, b"GIF87a", "image/gif"),
    (0, b"GIF89a", "image/gif"),
    (0, b"%PDF-", "application/pdf"),
    (0, b"SQLite format 3\x00", "application/vnd.sqlite3"),
    (0, b"\x00asm", "application/wasm"),
    (0, b"wOFF", "font/woff"),
    (0, b"wOF2", "font/woff2"),
    (0, b"OTTO", "font/otf"),
    (0, b"\x00\x01\x00\x00\x00", "font/ttf"),
    (0, b"\xde\x12\x04\x95", "application/x-gettext-translation"),
    (0, b"\x95\x04\x12\xde", "application/x-gettext-translation"),
];

/// Returns a best-guess content type for `prefix`.
///
/// # Examples
///
/// ```
/// use debinfo_core::inventory::sniff;
///
/// assert_eq!(sniff(b"hello world\n"), "text/plain; charset=utf-8");
/// assert_eq!(sniff(b"#!/bin/sh\nexit 0\n"), "text/x-shellscript");
/// assert_eq!(sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
/// assert_eq!(sniff(b"\0\x01\x02\x03binary"), "application/octet-stream");
/// assert_eq!(sniff(b""), "inode/x-empty");
/// ```
#[must_use]
pub fn sniff(prefix: &[u8]) -> &'static str {
    if prefix.is_empty() {
        return EMPTY;
    }
    if prefix.starts_with(ELF_MAGIC) {
        return sniff_elf(prefix);
    }
    if let Some(&(_, _, mime)) = SIGNATURES.iter().find(|(offset, magic, _)| {
        prefix
            .get(*offset..offset + magic.len())
            .is_some_and(|window| window == *magic)
    }) {
        return mime;
    }
    if !is_text(prefix) {
        return BINARY;
    }
    sniff_text(prefix).unwrap_or(TEXT)
}

/// Classifies an ELF object by its `e_type` field.
fn sniff_elf(prefix: &[u8]) -> &'static str {
    let Some(raw) = prefix.get(16..18) else {
        return "application/x-elf";
    };
    let e_type = match prefix.get(5) {
        Some(2) => u16::from_be_bytes([raw[0], raw[1]]),
        _ => u16::from_le_bytes([raw[0], raw[1]]),
    };
    match e_type {
        1 => "application/x-object",
        2 => "application/x-executable",
        3 => "application/x-sharedlib",
        4 => "application/x-coredump",
        _ => "application/x-elf",
    }
}

/// Refines text content by shebang or leading markup.
fn sniff_text(prefix: &[u8]) -> Option<&'static str> {
    let body = prefix.strip_prefix(b"\xef\xbb\xbf").unwrap_or(prefix);

    if let Some(shebang) = body.strip_prefix(b"#!") {
        let line = shebang.split(|&b| b == b'\n').next().unwrap_or_default();
        let line = String::from_utf8_lossy(line);
        let interpreter = line
            .split_whitespace()
            .find(|word| *word != "/usr/bin/env" && !word.starts_with('-'))
            .and_then(|word| word.rsplit('/').next())
            .unwrap_or_default();
        return Some(match interpreter {
            i if i.starts_with("python") => "text/x-python",
            i if i.starts_with("perl") => "text/x-perl",
            i if i.starts_with("ruby") => "text/x-ruby",
            i if i.starts_with("node") => "text/javascript",
            i if i.ends_with("sh") => "text/x-shellscript",
            _ => TEXT,
        });
    }

    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let head: Vec<u8> = body[start..]
        .iter()
        .take(256)
        .map(u8::to_ascii_lowercase)
        .collect();

    if head.starts_with(b"<?xml") {
        if contains(&head, b"<svg") {
            return Some("image/svg+xml");
        }
        return Some("text/xml; charset=utf-8");
    }
    if head.starts_with(b"<svg") {
        return Some("image/svg+xml");
    }
    if head.starts_with(b"<!doctype html") || head.starts_with(b"<html") {
        return Some("text/html; charset=utf-8");
    }
    None
}

/// UTF-8 text with no control bytes other than common whitespace and ESC.
///
/// A multi-byte sequence cut off at the end of the prefix is tolerated.
fn is_text(prefix: &[u8]) -> bool {
    let valid = match std::str::from_utf8(prefix) {
        Ok(text) => text.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => return false,
    };
    prefix[..valid]
        .iter()
        .all(|&b| !b.is_ascii_control() || matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
