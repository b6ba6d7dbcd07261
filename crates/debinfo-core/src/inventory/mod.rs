//! Streaming inventory of a package payload.
//!
//! The payload is a tar listing. Each entry is classified as it streams by;
//! regular files have a bounded prefix read for content-type sniffing and the
//! rest of their content is skipped by the tar reader. Nothing but entry
//! metadata is kept.
//!
//! # Examples
//!
//! ```
//! use debinfo_core::InspectConfig;
//! use debinfo_core::inventory::scan_payload;
//! use debinfo_core::test_utils::TarTestBuilder;
//!
//! let tar = TarTestBuilder::new()
//!     .add_directory("./usr/")
//!     .add_file("./usr/README", b"read me")
//!     .build();
//!
//! let inventory = scan_payload(tar.as_slice(), &InspectConfig::default())?;
//! assert_eq!(inventory.directory_count, 1);
//! assert_eq!(inventory.file_count, 1);
//! assert_eq!(inventory.total_file_size, 7);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod entry;
pub mod mode;
pub mod sniff;

use std::io::Read;
use std::io::{self};
use std::path::PathBuf;

use tracing::trace;

use crate::InspectConfig;
use crate::io::read_prefix;

pub use entry::EntryKind;
pub use entry::InventoryEntry;
pub use mode::mode_string;
pub use sniff::sniff;

/// Ordered payload entries plus running aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Entries in stream order.
    pub entries: Vec<InventoryEntry>,

    /// Number of regular files.
    pub file_count: usize,

    /// Number of directories.
    pub directory_count: usize,

    /// Sum of declared sizes of regular files only.
    pub total_file_size: u64,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and updates the aggregates.
    pub fn add_entry(&mut self, entry: InventoryEntry) {
        match entry.kind {
            EntryKind::File => {
                self.file_count += 1;
                self.total_file_size = self.total_file_size.saturating_add(entry.size);
            }
            EntryKind::Directory => self.directory_count += 1,
            _ => {}
        }
        self.entries.push(entry);
    }

    /// Number of entries of any kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the listing had no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of symbolic and hard links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind.is_link()).count()
    }
}

/// Scans a decompressed tar stream into an [`Inventory`].
///
/// # Errors
///
/// Returns any I/O or tar format error from the stream.
pub fn scan_payload<R: Read>(reader: R, config: &InspectConfig) -> io::Result<Inventory> {
    scan_payload_with(reader, config, |_| {})
}

/// Like [`scan_payload`], calling `on_entry` for each entry as it is
/// classified.
///
/// # Errors
///
/// Returns any I/O or tar format error from the stream.
pub fn scan_payload_with<R, F>(reader: R, config: &InspectConfig, mut on_entry: F) -> io::Result<Inventory>
where
    R: Read,
    F: FnMut(&InventoryEntry),
{
    let mut archive = tar::Archive::new(reader);
    let mut inventory = Inventory::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let header = entry.header();
        let size = header.size()?;
        let mode = header.mode()? & 0o7777;
        let path = entry.path()?.into_owned();

        let kind = match header.entry_type() {
            tar::EntryType::Regular => EntryKind::File,
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Symlink => EntryKind::Symlink {
                target: link_target(&entry)?,
            },
            tar::EntryType::Link => EntryKind::Hardlink {
                target: link_target(&entry)?,
            },
            other => EntryKind::Other {
                type_flag: other.as_byte(),
            },
        };

        let content_type = if kind.is_file() && config.sniff_limit > 0 {
            Some(sniff(&read_prefix(&mut entry, config.sniff_limit)?))
        } else {
            None
        };

        let item = InventoryEntry {
            path,
            kind,
            size,
            mode,
            content_type,
        };
        trace!(path = %item.path.display(), kind = %item.kind, size, "scanned entry");
        on_entry(&item);
        inventory.add_entry(item);
    }

    Ok(inventory)
}

fn link_target<R: Read>(entry: &tar::Entry<'_, R>) -> io::Result<PathBuf> {
    Ok(entry
        .link_name()?
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default())
}
