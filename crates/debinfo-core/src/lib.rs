//! Streaming inspection of Debian binary packages.
//!
//! `debinfo-core` reads a `.deb` front to back in a single pass: it checks
//! the `ar` framing, validates the three required members, parses the
//! `control` stanza and lists the payload with a content type for every
//! regular file. Nothing is extracted to disk and the payload is never held
//! in memory.
//!
//! # Examples
//!
//! ```no_run
//! use debinfo_core::InspectConfig;
//! use debinfo_core::inspect_path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = inspect_path("hello_2.10-3_amd64.deb", &InspectConfig::default())?;
//! println!("{} has {} files", report.package().unwrap_or("?"), report.inventory.file_count);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ar;
pub mod config;
pub mod control;
pub mod error;
pub mod inventory;
pub mod io;
pub mod package;
pub mod report;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main API types
pub use config::InspectConfig;
pub use control::Control;
pub use control::parse_control;
pub use error::ErrorCategory;
pub use error::HeaderField;
pub use error::InspectError;
pub use error::Result;
pub use inventory::Inventory;
pub use inventory::InventoryEntry;
pub use package::inspect_members;
pub use package::inspect_package;
pub use package::inspect_package_with;
pub use package::inspect_path;
pub use report::NoopVisitor;
pub use report::PackageReport;
pub use report::PackageVisitor;
