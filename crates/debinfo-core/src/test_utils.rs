//! Test utilities for building packages in memory.
//!
//! Paths are written into tar headers byte-for-byte, so `./`-prefixed names
//! survive the way `dpkg-deb` writes them.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::ar::ArWriter;
use crate::package::CONTROL_MEMBER;
use crate::package::DATA_MEMBER;
use crate::package::DEBIAN_BINARY;
use crate::package::FORMAT_VERSION;

/// Gzip-compresses `data`.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builder for tar listings with files, directories, links and FIFOs.
///
/// # Examples
///
/// ```
/// use debinfo_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("./usr/")
///     .add_file("./usr/README", b"content")
///     .add_symlink("./usr/README.txt", "README")
///     .build();
/// assert_eq!(tar_data.len() % 512, 0);
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.append(path, tar::EntryType::Regular, mode, None, data)
    }

    /// Adds a directory with mode 0755.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.append(path, tar::EntryType::Directory, 0o755, None, &[])
    }

    /// Adds a symlink with mode 0777.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.append(path, tar::EntryType::Symlink, 0o777, Some(target), &[])
    }

    /// Adds a hardlink to an earlier entry.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.append(path, tar::EntryType::Link, 0o644, Some(target), &[])
    }

    /// Adds a named pipe with mode 0644.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.append(path, tar::EntryType::Fifo, 0o644, None, &[])
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    fn append(
        mut self,
        path: &str,
        kind: tar::EntryType,
        mode: u32,
        link: Option<&str>,
        data: &[u8],
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        let raw = header.as_old_mut();
        raw.name[..path.len()].copy_from_slice(path.as_bytes());
        if let Some(link) = link {
            raw.linkname[..link.len()].copy_from_slice(link.as_bytes());
        }
        header.set_entry_type(kind);
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `.deb` packages.
///
/// Defaults to a well-formed package with a minimal control stanza and an
/// empty payload; each setter replaces one piece so a test can break exactly
/// one rule.
///
/// # Examples
///
/// ```
/// use debinfo_core::test_utils::DebBuilder;
///
/// let deb = DebBuilder::new().control("Package: hello\n").build();
/// assert!(deb.starts_with(b"!<arch>\ndebian-binary   "));
/// ```
pub struct DebBuilder {
    names: [String; 3],
    version: Vec<u8>,
    control: Vec<u8>,
    data: Vec<u8>,
}

impl DebBuilder {
    /// Creates a builder for a valid minimal package.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: [
                DEBIAN_BINARY.to_string(),
                CONTROL_MEMBER.to_string(),
                DATA_MEMBER.to_string(),
            ],
            version: FORMAT_VERSION.as_bytes().to_vec(),
            control: Self::control_archive("Package: test\nVersion: 1.0\n"),
            data: gzip(&TarTestBuilder::new().build()),
        }
    }

    /// Builds a compressed control archive holding `./control` with `text`.
    #[must_use]
    pub fn control_archive(text: &str) -> Vec<u8> {
        gzip(
            &TarTestBuilder::new()
                .add_directory("./")
                .add_file("./control", text.as_bytes())
                .build(),
        )
    }

    /// Replaces the `debian-binary` body.
    #[must_use]
    pub fn version_body(mut self, body: &[u8]) -> Self {
        self.version = body.to_vec();
        self
    }

    /// Sets the control stanza text.
    #[must_use]
    pub fn control(mut self, text: &str) -> Self {
        self.control = Self::control_archive(text);
        self
    }

    /// Sets the control member body verbatim.
    #[must_use]
    pub fn raw_control(mut self, body: Vec<u8>) -> Self {
        self.control = body;
        self
    }

    /// Sets the payload from an uncompressed tar listing.
    #[must_use]
    pub fn data(mut self, tar: Vec<u8>) -> Self {
        self.data = gzip(&tar);
        self
    }

    /// Sets the data member body verbatim.
    #[must_use]
    pub fn raw_data(mut self, body: Vec<u8>) -> Self {
        self.data = body;
        self
    }

    /// Renames the three members.
    #[must_use]
    pub fn member_names(mut self, version: &str, control: &str, data: &str) -> Self {
        self.names = [version.to_string(), control.to_string(), data.to_string()];
        self
    }

    /// Writes the package.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut writer = ArWriter::new(Vec::new()).unwrap();
        let bodies = [&self.version, &self.control, &self.data];
        for (name, body) in self.names.iter().zip(bodies) {
            writer.append_data(name, body).unwrap();
        }
        writer.into_inner()
    }
}

impl Default for DebBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_tar_builder_keeps_raw_paths() {
        let tar_data = TarTestBuilder::new().add_directory("./etc/").build();
        let mut archive = tar::Archive::new(tar_data.as_slice());
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(&*entry.path_bytes(), b"./etc/");
    }

    #[test]
    fn test_gzip_round_trip() {
        let compressed = gzip(b"payload");
        let mut out = String::new();
        flate2::read::GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "payload");
    }

    #[test]
    fn test_deb_builder_layout() {
        let deb = DebBuilder::new().build();
        assert!(deb.starts_with(b"!<arch>\n"));
        assert_eq!(&deb[8..21], b"debian-binary");
        assert_eq!(&deb[68..72], b"2.0\n");
    }
}
