//! Sequential reader and writer for the `ar` container.
//!
//! An `ar` archive is an 8-byte signature followed by members. Each member
//! is a 60-byte text header and a body padded to an even length:
//!
//! ```text
//! offset  width  field
//!      0     16  name (space padded, optional trailing '/')
//!     16     12  modification time, decimal seconds
//!     28      6  owner id, decimal
//!     34      6  group id, decimal
//!     40      8  mode, octal
//!     48     10  size, decimal
//!     58      2  trailer "`\n"
//! ```
//!
//! This module knows nothing about Debian packages; see
//! [`crate::package`] for the member ordering rules.

pub mod header;
pub mod reader;
pub mod writer;

use std::io::Read;

use crate::InspectError;
use crate::Result;

pub use header::HEADER_SIZE;
pub use header::MemberHeader;
pub use reader::ArReader;
pub use reader::Member;
pub use writer::ArWriter;

/// Global archive signature.
pub const SIGNATURE: &[u8; 8] = b"!<arch>\n";

/// Consumes and verifies the 8-byte archive signature.
///
/// # Errors
///
/// Returns [`InspectError::BadSignature`] if fewer than 8 bytes are available
/// or they differ from `!<arch>\n`.
///
/// # Examples
///
/// ```
/// use debinfo_core::ar::read_signature;
///
/// let mut data: &[u8] = b"!<arch>\nrest";
/// read_signature(&mut data)?;
/// assert_eq!(data, b"rest");
///
/// let mut bad: &[u8] = b"PK\x03\x04";
/// assert!(read_signature(&mut bad).is_err());
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
pub fn read_signature<R: Read>(reader: &mut R) -> Result<()> {
    let found = crate::io::read_prefix(reader, SIGNATURE.len())?;
    if found.as_slice() != SIGNATURE {
        return Err(InspectError::BadSignature {
            expected: "!<arch>\n",
            found: String::from_utf8_lossy(&found).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_short_input() {
        let mut data: &[u8] = b"!<ar";
        let err = read_signature(&mut data).unwrap_err();
        assert!(matches!(err, InspectError::BadSignature { ref found, .. } if found == "!<ar"));
    }

    #[test]
    fn test_signature_empty_input() {
        let mut data: &[u8] = b"";
        assert!(matches!(
            read_signature(&mut data),
            Err(InspectError::BadSignature { .. })
        ));
    }
}
