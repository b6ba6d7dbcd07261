//! ls-style permission strings.

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;
const STICKY: u32 = 0o1000;

/// Renders `mode` as a ten-character `ls -l` permission string.
///
/// Only the low twelve bits of `mode` are used; the file type comes from
/// `type_char`.
///
/// # Examples
///
/// ```
/// use debinfo_core::inventory::mode_string;
///
/// assert_eq!(mode_string('-', 0o100644), "-rw-r--r--");
/// assert_eq!(mode_string('-', 0o4755), "-rwsr-xr-x");
/// assert_eq!(mode_string('d', 0o1777), "drwxrwxrwt");
/// ```
#[must_use]
pub fn mode_string(type_char: char, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(type_char);

    for (shift, special, special_char) in [(6, SETUID, 's'), (3, SETGID, 's'), (0, STICKY, 't')] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}
