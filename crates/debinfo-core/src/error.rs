//! Error types for package inspection.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias using `InspectError`.
pub type Result<T> = std::result::Result<T, InspectError>;

/// One of the fixed-width fields of an `ar` member header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// Member name (bytes 0..16).
    Name,
    /// Modification time in decimal seconds (bytes 16..28).
    ModTime,
    /// Owner id in decimal (bytes 28..34).
    Owner,
    /// Group id in decimal (bytes 34..40).
    Group,
    /// File mode in octal (bytes 40..48).
    Mode,
    /// Body size in decimal bytes (bytes 48..58).
    Size,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::ModTime => "modification time",
            Self::Owner => "owner",
            Self::Group => "group",
            Self::Mode => "mode",
            Self::Size => "size",
        };
        f.write_str(name)
    }
}

/// Broad class of an [`InspectError`].
///
/// Every class is fatal; the category only helps callers decide how to
/// present the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Outer archive framing is broken (signature, header block, padding,
    /// trailer, truncated body).
    Framing,
    /// A header field could not be parsed or serialized.
    Field,
    /// Members are missing, misnamed, out of order or mis-sized.
    Sequencing,
    /// Member content is wrong or cannot be decoded.
    Content,
    /// The control stanza violates the key/value grammar.
    Grammar,
    /// The underlying byte source failed.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Framing => "framing",
            Self::Field => "field",
            Self::Sequencing => "sequencing",
            Self::Content => "content",
            Self::Grammar => "grammar",
            Self::Io => "i/o",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while inspecting a package.
#[derive(Error, Debug)]
pub enum InspectError {
    /// I/O operation on the byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source does not start with the `!<arch>\n` signature.
    #[error("bad ar signature: expected {expected:?}, got {found:?}")]
    BadSignature {
        /// The signature that was expected.
        expected: &'static str,
        /// The bytes found instead (lossy UTF-8).
        found: String,
    },

    /// A header block ended early.
    #[error("failed to read complete member header: expected {expected} bytes, got {found} bytes")]
    TruncatedHeader {
        /// Full header size.
        expected: usize,
        /// Bytes actually available.
        found: usize,
    },

    /// The alignment byte after an odd-sized member was missing.
    #[error("failed to skip to even byte alignment after {member:?}")]
    MissingPadding {
        /// The odd-sized member that should have been padded.
        member: String,
    },

    /// The two trailing header bytes were not `` `\n ``.
    #[error("invalid header trailer for {member:?} (got {found:02x?})")]
    BadTrailer {
        /// Name of the member whose header is broken.
        member: String,
        /// The two bytes found.
        found: [u8; 2],
    },

    /// The source ended before a member body was complete.
    #[error("member {member:?} is truncated: {missing} of {size} bytes missing")]
    TruncatedBody {
        /// Member name.
        member: String,
        /// Declared body size.
        size: u64,
        /// Bytes that could not be read.
        missing: u64,
    },

    /// A header field could not be parsed.
    #[error("failed to read member {field}: {value:?}")]
    InvalidHeaderField {
        /// The offending field.
        field: HeaderField,
        /// Raw field text (lossy UTF-8).
        value: String,
    },

    /// A value does not fit its fixed-width header field.
    #[error("member {field} {value:?} does not fit in {width} bytes")]
    FieldOverflow {
        /// The offending field.
        field: HeaderField,
        /// Rendered value.
        value: String,
        /// Width of the field in bytes.
        width: usize,
    },

    /// A member appeared where a different one was required.
    #[error("expected member {expected:?}, got {found:?}")]
    UnexpectedMember {
        /// Required member name.
        expected: &'static str,
        /// Name found in the archive.
        found: String,
    },

    /// The archive ended before a required member.
    #[error("archive ended before member {expected:?}")]
    MissingMember {
        /// Required member name.
        expected: &'static str,
    },

    /// A member declared a size other than the one required.
    #[error("member {member:?}: expected size {expected}, got {found}")]
    UnexpectedSize {
        /// Member name.
        member: String,
        /// Required size.
        expected: u64,
        /// Declared size.
        found: u64,
    },

    /// A member declared a size above the configured ceiling.
    #[error("member {member:?} declared size too large: {size} bytes (limit {max})")]
    MemberTooLarge {
        /// Member name.
        member: String,
        /// Declared size.
        size: u64,
        /// Configured ceiling.
        max: u64,
    },

    /// The version marker does not hold the supported format version.
    #[error("invalid debian-binary value: expected {expected:?}, got {found:?}")]
    VersionMismatch {
        /// The supported version literal.
        expected: &'static str,
        /// Content found (lossy UTF-8).
        found: String,
    },

    /// The control archive has no `./control` entry.
    #[error("failed to find control file in {member:?}")]
    ControlFileNotFound {
        /// The control archive member name.
        member: String,
    },

    /// The control file is larger than allowed.
    #[error("control file exceeds {max} bytes")]
    ControlFileTooLarge {
        /// Configured ceiling.
        max: u64,
    },

    /// The control file is not valid UTF-8.
    #[error("control file is not valid UTF-8: {0}")]
    ControlEncoding(#[from] std::string::FromUtf8Error),

    /// A compressed member could not be decompressed or its tar listing
    /// could not be read.
    #[error("failed to decode {member:?}: {source}")]
    Decompression {
        /// Member name.
        member: String,
        /// Underlying decoder error.
        #[source]
        source: std::io::Error,
    },

    /// A control line has no colon.
    #[error("invalid control line {line:?}")]
    InvalidLine {
        /// The offending line.
        line: String,
    },

    /// A continuation line appeared before any key.
    #[error("bad continuation line {line:?}: no preceding key")]
    BadContinuation {
        /// The offending line.
        line: String,
    },

    /// A key appeared twice in the stanza.
    #[error("duplicate control key {key:?}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
}

impl InspectError {
    /// Returns the broad class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use debinfo_core::{ErrorCategory, InspectError};
    ///
    /// let err = InspectError::DuplicateKey {
    ///     key: "Package".into(),
    /// };
    /// assert_eq!(err.category(), ErrorCategory::Grammar);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Io,
            Self::BadSignature { .. }
            | Self::TruncatedHeader { .. }
            | Self::MissingPadding { .. }
            | Self::BadTrailer { .. }
            | Self::TruncatedBody { .. } => ErrorCategory::Framing,
            Self::InvalidHeaderField { .. } | Self::FieldOverflow { .. } => ErrorCategory::Field,
            Self::UnexpectedMember { .. }
            | Self::MissingMember { .. }
            | Self::UnexpectedSize { .. }
            | Self::MemberTooLarge { .. } => ErrorCategory::Sequencing,
            Self::VersionMismatch { .. }
            | Self::ControlFileNotFound { .. }
            | Self::ControlFileTooLarge { .. }
            | Self::ControlEncoding(_)
            | Self::Decompression { .. } => ErrorCategory::Content,
            Self::InvalidLine { .. } | Self::BadContinuation { .. } | Self::DuplicateKey { .. } => {
                ErrorCategory::Grammar
            }
        }
    }

    /// Returns `true` if the outer archive framing is broken.
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        matches!(self.category(), ErrorCategory::Framing)
    }

    /// Returns `true` if the control stanza violates the grammar.
    #[must_use]
    pub const fn is_grammar(&self) -> bool {
        matches!(self.category(), ErrorCategory::Grammar)
    }

    /// Returns the member this error is about, if it names one.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match self {
            Self::MissingPadding { member }
            | Self::BadTrailer { member, .. }
            | Self::TruncatedBody { member, .. }
            | Self::UnexpectedSize { member, .. }
            | Self::MemberTooLarge { member, .. }
            | Self::ControlFileNotFound { member }
            | Self::Decompression { member, .. } => Some(member),
            Self::UnexpectedMember { found, .. } => Some(found),
            Self::MissingMember { expected } => Some(expected),
            _ => None,
        }
    }

    /// Finds a truncated member body reported through an `io::Error`.
    ///
    /// A member body reports an early end as an `UnexpectedEof` carrying
    /// [`InspectError::TruncatedBody`]. The gzip and tar layers may wrap it
    /// further, so the whole source chain is searched.
    #[must_use]
    pub fn truncation_in(err: &io::Error) -> Option<Self> {
        let mut current = err.get_ref().map(|e| e as &(dyn StdError + 'static));
        while let Some(e) = current {
            if let Some(Self::TruncatedBody {
                member,
                size,
                missing,
            }) = e.downcast_ref::<Self>()
            {
                return Some(Self::TruncatedBody {
                    member: member.clone(),
                    size: *size,
                    missing: *missing,
                });
            }
            // io::Error::source() skips the error it wraps
            current = match e.downcast_ref::<io::Error>() {
                Some(inner) => inner.get_ref().map(|e| e as &(dyn StdError + 'static)),
                None => e.source(),
            };
        }
        None
    }

    /// Converts an error from reading a member body, keeping truncation
    /// as a framing error.
    pub(crate) fn from_body_io(err: io::Error) -> Self {
        Self::truncation_in(&err).unwrap_or(Self::Io(err))
    }

    /// Converts a decoder error on `member`, keeping truncation of the
    /// underlying body as a framing error.
    pub(crate) fn decompression(member: &str, source: io::Error) -> Self {
        Self::truncation_in(&source).unwrap_or_else(|| Self::Decompression {
            member: member.to_string(),
            source,
        })
    }
}
