//! Payload listing entries.

use std::fmt;
use std::path::PathBuf;

use super::mode::mode_string;

/// Label shown for directories.
pub const DIRECTORY_LABEL: &str = "<DIR>";

/// Label shown for regular files whose content type was not sniffed.
pub const UNKNOWN_LABEL: &str = "(unknown)";

/// Label shown for entry kinds the scanner does not classify.
pub const UNHANDLED_LABEL: &str = "(not handled)";

/// Kind of a payload entry.
///
/// # Examples
///
/// ```
/// use debinfo_core::inventory::EntryKind;
/// use std::path::PathBuf;
///
/// let file = EntryKind::File;
/// let link = EntryKind::Symlink {
///     target: PathBuf::from("../lib/libfoo.so.1"),
/// };
/// assert!(file.is_file());
/// assert!(link.is_link());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Directory.
    Directory,

    /// Symbolic link; `target` is stored exactly as in the archive.
    Symlink {
        /// The link target.
        target: PathBuf,
    },

    /// Hard link to an earlier entry.
    Hardlink {
        /// Path of the entry linked to.
        target: PathBuf,
    },

    /// Any other tar entry type (devices, FIFOs, continuous files, ...).
    Other {
        /// Raw tar type flag.
        type_flag: u8,
    },
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symbolic or hard link.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::Symlink { .. } | Self::Hardlink { .. })
    }

    /// Link target for symbolic and hard links.
    #[must_use]
    pub const fn link_target(&self) -> Option<&PathBuf> {
        match self {
            Self::Symlink { target } | Self::Hardlink { target } => Some(target),
            _ => None,
        }
    }

    /// File-type character used in the first column of a mode string.
    #[must_use]
    pub const fn type_char(&self) -> char {
        match self {
            Self::File | Self::Hardlink { .. } => '-',
            Self::Directory => 'd',
            Self::Symlink { .. } => 'l',
            Self::Other { type_flag: b'3' } => 'c',
            Self::Other { type_flag: b'4' } => 'b',
            Self::Other { type_flag: b'6' } => 'p',
            Self::Other { .. } => '?',
        }
    }

    /// Short lowercase name, e.g. `"file"` or `"symlink"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink { .. } => "symlink",
            Self::Hardlink { .. } => "hardlink",
            Self::Other { .. } => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified entry of the payload listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Path exactly as stored in the archive (usually `./`-prefixed).
    pub path: PathBuf,

    /// Entry kind.
    pub kind: EntryKind,

    /// Size declared in the tar header.
    pub size: u64,

    /// Permission bits from the tar header (type bits masked off).
    pub mode: u32,

    /// Sniffed content type; only set for regular files.
    pub content_type: Option<&'static str>,
}

impl InventoryEntry {
    /// ls-style mode string, e.g. `drwxr-xr-x`.
    #[must_use]
    pub fn mode_string(&self) -> String {
        mode_string(self.kind.type_char(), self.mode)
    }

    /// Display label: content type for files, `-> target` for links,
    /// `<DIR>` for directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use debinfo_core::inventory::{EntryKind, InventoryEntry};
    /// use std::path::PathBuf;
    ///
    /// let entry = InventoryEntry {
    ///     path: PathBuf::from("./usr/bin/vi"),
    ///     kind: EntryKind::Symlink {
    ///         target: PathBuf::from("/etc/alternatives/vi"),
    ///     },
    ///     size: 0,
    ///     mode: 0o777,
    ///     content_type: None,
    /// };
    /// assert_eq!(entry.label(), "-> /etc/alternatives/vi");
    /// assert_eq!(entry.mode_string(), "lrwxrwxrwx");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        match &self.kind {
            EntryKind::Directory => DIRECTORY_LABEL.to_string(),
            EntryKind::Symlink { target } | EntryKind::Hardlink { target } => {
                format!("-> {}", target.display())
            }
            EntryKind::File => self.content_type.unwrap_or(UNKNOWN_LABEL).to_string(),
            EntryKind::Other { .. } => UNHANDLED_LABEL.to_string(),
        }
    }
}
