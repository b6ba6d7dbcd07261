//! Inspection results and streaming callbacks.

use crate::Control;
use crate::ar::MemberHeader;
use crate::inventory::Inventory;
use crate::inventory::InventoryEntry;

/// Everything learned from one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    /// Headers of the three members, in archive order.
    pub members: Vec<MemberHeader>,

    /// Raw text of the `control` file.
    pub control_text: String,

    /// Parsed control stanza.
    pub control: Control,

    /// Payload listing with aggregates.
    pub inventory: Inventory,
}

impl PackageReport {
    /// Package name from the control stanza.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.control.package()
    }

    /// Header of the member called `name`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberHeader> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Callback trait for observing a package while it streams.
///
/// Callbacks fire as soon as each piece is known, so a consumer can print
/// a listing without waiting for the whole payload. Both methods default
/// to doing nothing.
///
/// # Examples
///
/// ```
/// use debinfo_core::PackageVisitor;
/// use debinfo_core::inventory::InventoryEntry;
///
/// struct Counter(usize);
///
/// impl PackageVisitor for Counter {
///     fn on_entry(&mut self, _entry: &InventoryEntry) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait PackageVisitor {
    /// Called once the control stanza has been parsed.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw `control` file text
    /// * `control` - Parsed fields
    fn on_control(&mut self, text: &str, control: &Control) {
        let _ = (text, control);
    }

    /// Called for each payload entry, in archive order.
    fn on_entry(&mut self, entry: &InventoryEntry) {
        let _ = entry;
    }
}

/// Visitor that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisitor;

impl PackageVisitor for NoopVisitor {}
