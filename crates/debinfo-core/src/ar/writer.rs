//! `ar` archive writer.

use std::io::Write;

use super::SIGNATURE;
use super::header::MemberHeader;
use crate::InspectError;
use crate::Result;

/// Byte written after odd-sized bodies.
const PAD_BYTE: u8 = b'\n';

/// Writes an `ar` archive member by member.
///
/// The signature is written on construction; each member is written as its
/// header, its body and, for odd sizes, one `\n` pad byte.
///
/// # Examples
///
/// ```
/// use debinfo_core::ar::{ArWriter, MemberHeader};
///
/// let mut writer = ArWriter::new(Vec::new())?;
/// writer.append_data("debian-binary", b"2.0\n")?;
///
/// let mut header = MemberHeader::new("notes", 3);
/// header.mtime = 1_700_000_000;
/// writer.append(&header, b"abc")?;
///
/// let bytes = writer.into_inner();
/// assert_eq!(bytes.len(), 8 + 60 + 4 + 60 + 4);
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
#[derive(Debug)]
pub struct ArWriter<W: Write> {
    inner: W,
}

impl<W: Write> ArWriter<W> {
    /// Creates a writer and emits the archive signature.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the signature fails.
    pub fn new(mut inner: W) -> Result<Self> {
        inner.write_all(SIGNATURE)?;
        Ok(Self { inner })
    }

    /// Appends a member with an explicit header.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UnexpectedSize`] if `data` does not match
    /// `header.size`, [`InspectError::FieldOverflow`] if the header does not
    /// serialize, or an I/O error.
    pub fn append(&mut self, header: &MemberHeader, data: &[u8]) -> Result<()> {
        if data.len() as u64 != header.size {
            return Err(InspectError::UnexpectedSize {
                member: header.name.clone(),
                expected: header.size,
                found: data.len() as u64,
            });
        }
        self.inner.write_all(&header.to_bytes()?)?;
        self.inner.write_all(data)?;
        if header.is_padded() {
            self.inner.write_all(&[PAD_BYTE])?;
        }
        Ok(())
    }

    /// Appends a member with a default header sized to `data`.
    ///
    /// # Errors
    ///
    /// See [`ArWriter::append`].
    pub fn append_data(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.append(&MemberHeader::new(name, data.len() as u64), data)
    }

    /// Returns a reference to the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the writer and returns the underlying sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}
