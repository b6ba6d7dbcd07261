//! Forward-only `ar` member reader.

use std::io::ErrorKind;
use std::io::Read;
use std::io::{self};

use tracing::debug;
use tracing::trace;

use super::header::HEADER_SIZE;
use super::header::MemberHeader;
use crate::InspectError;
use crate::Result;
use crate::io::skip_remaining;

/// Cursor state between two members.
#[derive(Debug)]
enum State {
    /// The next read is a header block. `pad_after` names the previous
    /// member when it had an odd size and its alignment byte is still unread.
    HeaderReady { pad_after: Option<String> },
    /// A member body is open with `remaining` bytes left.
    BodyOpen {
        name: String,
        size: u64,
        remaining: u64,
    },
}

impl State {
    fn after(name: &str, size: u64) -> Self {
        Self::HeaderReady {
            pad_after: (size % 2 == 1).then(|| name.to_string()),
        }
    }
}

/// Sequential reader over the members of an `ar` archive.
///
/// The reader owns its source and hands out one [`Member`] at a time. A
/// member borrows the reader mutably, so a second member cannot be opened
/// while the first is alive. Whatever the caller leaves unread is skipped
/// on the next call to [`ArReader::next_member`].
///
/// # Examples
///
/// ```
/// use debinfo_core::ar::{ArReader, ArWriter};
/// use std::io::Read;
///
/// let mut writer = ArWriter::new(Vec::new())?;
/// writer.append_data("hello.txt", b"hello")?;
/// writer.append_data("world.txt", b"world!")?;
/// let archive = writer.into_inner();
///
/// let mut reader = ArReader::with_signature(archive.as_slice())?;
/// let mut names = Vec::new();
/// while let Some(member) = reader.next_member()? {
///     names.push(member.header().name.clone());
/// }
/// assert_eq!(names, ["hello.txt", "world.txt"]);
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
#[derive(Debug)]
pub struct ArReader<R> {
    inner: R,
    state: State,
    last_discarded: u64,
}

impl<R: Read> ArReader<R> {
    /// Creates a reader over a source already positioned past the signature.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::HeaderReady { pad_after: None },
            last_discarded: 0,
        }
    }

    /// Verifies the `!<arch>\n` signature, then creates a reader.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadSignature`] if the signature is wrong.
    pub fn with_signature(mut inner: R) -> Result<Self> {
        super::read_signature(&mut inner)?;
        Ok(Self::new(inner))
    }

    /// Advances to the next member.
    ///
    /// Returns `Ok(None)` when the source ends cleanly at a header boundary.
    ///
    /// # Errors
    ///
    /// Fails on a truncated previous body, a missing alignment byte, a short
    /// header block, or any header field error.
    pub fn next_member(&mut self) -> Result<Option<Member<'_, R>>> {
        self.finish_body()?;
        self.skip_padding()?;

        let Some(block) = self.read_header_block()? else {
            debug!("end of archive");
            return Ok(None);
        };
        let header = MemberHeader::parse(&block)?;
        debug!(
            name = %header.name,
            size = header.size,
            mode = %format!("{:o}", header.mode),
            "opened member"
        );

        self.state = if header.size == 0 {
            State::HeaderReady { pad_after: None }
        } else {
            State::BodyOpen {
                name: header.name.clone(),
                size: header.size,
                remaining: header.size,
            }
        };

        Ok(Some(Member {
            header,
            reader: self,
        }))
    }

    /// Bytes skipped from the previous member's body by the most recent
    /// call to [`ArReader::next_member`].
    #[must_use]
    pub const fn last_discarded(&self) -> u64 {
        self.last_discarded
    }

    /// Returns `true` if a member body is open and not fully consumed.
    #[must_use]
    pub const fn is_body_open(&self) -> bool {
        matches!(self.state, State::BodyOpen { .. })
    }

    /// Consumes the reader and returns the underlying source.
    ///
    /// The source is left wherever the reader stopped; an open body is not
    /// skipped.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn finish_body(&mut self) -> Result<()> {
        self.last_discarded = 0;
        let State::BodyOpen {
            name,
            size,
            remaining,
        } = &self.state
        else {
            return Ok(());
        };
        let (name, size, remaining) = (name.clone(), *size, *remaining);

        let skipped = skip_remaining(&mut (&mut self.inner).take(remaining))?;
        if skipped < remaining {
            return Err(InspectError::TruncatedBody {
                member: name,
                size,
                missing: remaining - skipped,
            });
        }
        trace!(name = %name, skipped, "discarded unread body");

        self.last_discarded = skipped;
        self.state = State::after(&name, size);
        Ok(())
    }

    fn skip_padding(&mut self) -> Result<()> {
        let State::HeaderReady { pad_after } = &mut self.state else {
            return Ok(());
        };
        let Some(member) = pad_after.take() else {
            return Ok(());
        };

        let mut pad = [0u8; 1];
        if read_full(&mut self.inner, &mut pad)? != 1 {
            return Err(InspectError::MissingPadding { member });
        }
        Ok(())
    }

    fn read_header_block(&mut self) -> Result<Option<[u8; HEADER_SIZE]>> {
        let mut block = [0u8; HEADER_SIZE];
        match read_full(&mut self.inner, &mut block)? {
            0 => Ok(None),
            HEADER_SIZE => Ok(Some(block)),
            found => Err(InspectError::TruncatedHeader {
                expected: HEADER_SIZE,
                found,
            }),
        }
    }

    fn read_body(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let State::BodyOpen {
            name,
            size,
            remaining,
        } = &mut self.state
        else {
            return Ok(0);
        };
        if buf.is_empty() {
            return Ok(0);
        }

        let limit = usize::try_from(*remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let read = self.inner.read(&mut buf[..limit])?;
        if read == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                InspectError::TruncatedBody {
                    member: name.clone(),
                    size: *size,
                    missing: *remaining,
                },
            ));
        }

        *remaining -= read as u64;
        if *remaining == 0 {
            let (name, size) = (std::mem::take(name), *size);
            self.state = State::after(&name, size);
        }
        Ok(read)
    }
}

/// One archive member: its header and a bounded view of its body.
///
/// Reading past `size` bytes returns end-of-file. Dropping the member
/// without reading leaves the body to be skipped by the reader.
#[derive(Debug)]
pub struct Member<'a, R: Read> {
    header: MemberHeader,
    reader: &'a mut ArReader<R>,
}

impl<R: Read> Member<'_, R> {
    /// The parsed header.
    #[must_use]
    pub const fn header(&self) -> &MemberHeader {
        &self.header
    }

    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Declared body size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.header.size
    }

    /// Body bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        match self.reader.state {
            State::BodyOpen { remaining, .. } => remaining,
            State::HeaderReady { .. } => 0,
        }
    }
}

impl<R: Read> Read for Member<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read_body(buf)
    }
}

/// Fills `buf` as far as the source allows, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
