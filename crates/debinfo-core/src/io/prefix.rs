//! Capped peek-then-skip over forward-only readers.

use std::io::Read;
use std::io::{self};

/// Reads at most `limit` bytes from the front of `reader`.
///
/// Fewer bytes are returned only when the reader ends first. Nothing past
/// the limit is consumed, so the caller decides whether to skip the rest.
///
/// # Examples
///
/// ```
/// use debinfo_core::io::read_prefix;
///
/// let mut data: &[u8] = b"hello, world";
/// let prefix = read_prefix(&mut data, 5)?;
/// assert_eq!(prefix, b"hello");
/// assert_eq!(data, b", world");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn read_prefix<R: Read>(reader: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(limit.min(8 * 1024));
    reader.take(limit as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Reads and discards everything left in `reader`, returning the byte count.
///
/// # Examples
///
/// ```
/// use debinfo_core::io::skip_remaining;
///
/// let mut data: &[u8] = b"0123456789";
/// assert_eq!(skip_remaining(&mut data)?, 10);
/// assert!(data.is_empty());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn skip_remaining<R: Read>(reader: &mut R) -> io::Result<u64> {
    io::copy(reader, &mut io::sink())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_prefix_shorter_than_limit() {
        let mut data: &[u8] = b"abc";
        let prefix = read_prefix(&mut data, 3072).unwrap();
        assert_eq!(prefix, b"abc");
    }

    #[test]
    fn test_read_prefix_leaves_remainder() {
        let payload = vec![7u8; 10_000];
        let mut reader = payload.as_slice();
        let prefix = read_prefix(&mut reader, 3072).unwrap();
        assert_eq!(prefix.len(), 3072);
        assert_eq!(reader.len(), 10_000 - 3072);
    }

    #[test]
    fn test_read_prefix_zero_limit() {
        let mut data: &[u8] = b"abc";
        assert!(read_prefix(&mut data, 0).unwrap().is_empty());
        assert_eq!(data, b"abc");
    }

    #[test]
    fn test_skip_remaining_after_prefix() {
        let payload = vec![1u8; 5000];
        let mut reader = payload.as_slice();
        read_prefix(&mut reader, 1000).unwrap();
        assert_eq!(skip_remaining(&mut reader).unwrap(), 4000);
        assert_eq!(skip_remaining(&mut reader).unwrap(), 0);
    }
}
