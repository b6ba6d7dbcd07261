//! Fixed-width `ar` member header.

use std::ops::Range;
use std::str::FromStr;

use crate::InspectError;
use crate::Result;
use crate::error::HeaderField;

/// Size of a member header block in bytes.
pub const HEADER_SIZE: usize = 60;

/// Magic bytes terminating every header block.
pub const TRAILER: [u8; 2] = [0x60, 0x0a];

const NAME: Range<usize> = 0..16;
const MOD_TIME: Range<usize> = 16..28;
const OWNER: Range<usize> = 28..34;
const GROUP: Range<usize> = 34..40;
const MODE: Range<usize> = 40..48;
const SIZE: Range<usize> = 48..58;
const TRAILER_RANGE: Range<usize> = 58..60;

/// Default mode for members written without an explicit header.
pub const DEFAULT_MODE: u32 = 0o100_644;

/// Parsed header of one archive member.
///
/// # Examples
///
/// ```
/// use debinfo_core::ar::MemberHeader;
///
/// let header = MemberHeader::new("debian-binary", 4);
/// let block = header.to_bytes()?;
/// assert_eq!(&block[..16], b"debian-binary   ");
/// assert_eq!(MemberHeader::parse(&block)?, header);
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberHeader {
    /// Member name, trimmed, with one trailing `/` removed.
    pub name: String,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: i64,
    /// Owner id.
    pub uid: i64,
    /// Group id.
    pub gid: i64,
    /// File mode bits.
    pub mode: u32,
    /// Body size in bytes, excluding alignment padding.
    pub size: u64,
}

impl MemberHeader {
    /// Creates a header owned by root with mode `0100644` and mtime 0.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mtime: 0,
            uid: 0,
            gid: 0,
            mode: DEFAULT_MODE,
            size,
        }
    }

    /// Parses a 60-byte header block.
    ///
    /// Fields are parsed in layout order; the trailer is checked last so the
    /// error can name the member.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidHeaderField`] for the first field that
    /// fails to parse and [`InspectError::BadTrailer`] if the block does not
    /// end in `` `\n ``.
    pub fn parse(block: &[u8; HEADER_SIZE]) -> Result<Self> {
        let raw_name = field_text(block, NAME, HeaderField::Name)?;
        let name = raw_name.strip_suffix('/').unwrap_or(raw_name);
        if name.is_empty() {
            return Err(InspectError::InvalidHeaderField {
                field: HeaderField::Name,
                value: raw_name.to_string(),
            });
        }

        let header = Self {
            name: name.to_string(),
            mtime: parse_decimal(block, MOD_TIME, HeaderField::ModTime)?,
            uid: parse_decimal(block, OWNER, HeaderField::Owner)?,
            gid: parse_decimal(block, GROUP, HeaderField::Group)?,
            mode: parse_octal(block, MODE, HeaderField::Mode)?,
            size: parse_decimal(block, SIZE, HeaderField::Size)?,
        };

        let trailer = [block[TRAILER_RANGE.start], block[TRAILER_RANGE.start + 1]];
        if trailer != TRAILER {
            return Err(InspectError::BadTrailer {
                member: header.name,
                found: trailer,
            });
        }

        Ok(header)
    }

    /// Serializes the header into a 60-byte block.
    ///
    /// Every field is left-justified and padded with spaces.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::FieldOverflow`] if a value is wider than its
    /// field.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut block = [b' '; HEADER_SIZE];
        put_field(&mut block, NAME, HeaderField::Name, &self.name)?;
        put_field(&mut block, MOD_TIME, HeaderField::ModTime, &self.mtime.to_string())?;
        put_field(&mut block, OWNER, HeaderField::Owner, &self.uid.to_string())?;
        put_field(&mut block, GROUP, HeaderField::Group, &self.gid.to_string())?;
        put_field(&mut block, MODE, HeaderField::Mode, &format!("{:o}", self.mode))?;
        put_field(&mut block, SIZE, HeaderField::Size, &self.size.to_string())?;
        block[TRAILER_RANGE].copy_from_slice(&TRAILER);
        Ok(block)
    }

    /// Returns `true` if one alignment byte follows the body.
    #[must_use]
    pub const fn is_padded(&self) -> bool {
        self.size % 2 == 1
    }
}

fn field_text(block: &[u8; HEADER_SIZE], range: Range<usize>, field: HeaderField) -> Result<&str> {
    let raw = &block[range];
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| InspectError::InvalidHeaderField {
            field,
            value: String::from_utf8_lossy(raw).into_owned(),
        })
}

fn parse_decimal<T: FromStr>(
    block: &[u8; HEADER_SIZE],
    range: Range<usize>,
    field: HeaderField,
) -> Result<T> {
    let text = field_text(block, range, field)?;
    text.parse().map_err(|_| InspectError::InvalidHeaderField {
        field,
        value: text.to_string(),
    })
}

fn parse_octal(block: &[u8; HEADER_SIZE], range: Range<usize>, field: HeaderField) -> Result<u32> {
    let text = field_text(block, range, field)?;
    u32::from_str_radix(text, 8).map_err(|_| InspectError::InvalidHeaderField {
        field,
        value: text.to_string(),
    })
}

fn put_field(
    block: &mut [u8; HEADER_SIZE],
    range: Range<usize>,
    field: HeaderField,
    value: &str,
) -> Result<()> {
    let width = range.len();
    if value.len() > width {
        return Err(InspectError::FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }
    block[range.start..range.start + value.len()].copy_from_slice(value.as_bytes());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn block(text: &str) -> [u8; HEADER_SIZE] {
        text.as_bytes().try_into().unwrap()
    }

    const DEBIAN_BINARY: &str =
        "debian-binary   1342943816  0     0     100644  4         `\n";

    #[test]
    fn test_parse_layout() {
        let header = MemberHeader::parse(&block(DEBIAN_BINARY)).unwrap();
        assert_eq!(header.name, "debian-binary");
        assert_eq!(header.mtime, 1_342_943_816);
        assert_eq!(header.uid, 0);
        assert_eq!(header.gid, 0);
        assert_eq!(header.mode, 0o100_644);
        assert_eq!(header.size, 4);
    }

    #[test]
    fn test_parse_strips_gnu_slash() {
        let header = MemberHeader::parse(&block(
            "data.tar.gz/    0           0     0     644     1024      `\n",
        ))
        .unwrap();
        assert_eq!(header.name, "data.tar.gz");
        assert_eq!(header.mode, 0o644);
        assert_eq!(header.size, 1024);
    }

    #[test]
    fn test_parse_rejects_non_octal_mode() {
        let err = MemberHeader::parse(&block(
            "debian-binary   0           0     0     100899  4         `\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            InspectError::InvalidHeaderField { field: HeaderField::Mode, ref value } if value == "100899"
        ));
    }

    #[test]
    fn test_parse_rejects_negative_size() {
        let err = MemberHeader::parse(&block(
            "debian-binary   0           0     0     100644  -4        `\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            InspectError::InvalidHeaderField {
                field: HeaderField::Size,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_negative_owner_and_group() {
        let header = MemberHeader::parse(&block(
            "debian-binary   0           -1    -1    100644  4         `\n",
        ))
        .unwrap();
        assert_eq!(header.uid, -1);
        assert_eq!(header.gid, -1);

        let mut round_trip = MemberHeader::new("debian-binary", 4);
        round_trip.uid = -1;
        round_trip.gid = -99_999;
        let bytes = round_trip.to_bytes().unwrap();
        assert_eq!(&bytes[28..40], b"-1    -99999");
        assert_eq!(MemberHeader::parse(&bytes).unwrap(), round_trip);
    }

    #[test]
    fn test_parse_rejects_blank_owner() {
        let err = MemberHeader::parse(&block(
            "debian-binary   0                 0     100644  4         `\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            InspectError::InvalidHeaderField {
                field: HeaderField::Owner,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        let err = MemberHeader::parse(&block(
            "/               0           0     0     0       8         `\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            InspectError::InvalidHeaderField {
                field: HeaderField::Name,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_bad_trailer_names_member() {
        let err = MemberHeader::parse(&block(
            "control.tar.gz  0           0     0     100644  4         XY",
        ))
        .unwrap_err();
        match err {
            InspectError::BadTrailer { member, found } => {
                assert_eq!(member, "control.tar.gz");
                assert_eq!(found, *b"XY");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_to_bytes_reproduces_block() {
        let original = block(DEBIAN_BINARY);
        let header = MemberHeader::parse(&original).unwrap();
        assert_eq!(header.to_bytes().unwrap(), original);
    }

    #[test]
    fn test_to_bytes_overflow() {
        let header = MemberHeader::new("a-name-longer-than-16", 0);
        assert!(matches!(
            header.to_bytes(),
            Err(InspectError::FieldOverflow {
                field: HeaderField::Name,
                width: 16,
                ..
            })
        ));

        let header = MemberHeader::new("big", 10_000_000_000);
        assert!(matches!(
            header.to_bytes(),
            Err(InspectError::FieldOverflow {
                field: HeaderField::Size,
                width: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_padding() {
        assert!(MemberHeader::new("odd", 3).is_padded());
        assert!(!MemberHeader::new("even", 4).is_padded());
        assert!(!MemberHeader::new("empty", 0).is_padded());
    }
}
