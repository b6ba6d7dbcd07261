//! I/O helpers shared by the archive layers.
//!
//! Everything here is forward-only: bytes are either read or skipped, never
//! revisited.

pub mod prefix;

pub use prefix::read_prefix;
pub use prefix::skip_remaining;
