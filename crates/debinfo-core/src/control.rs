//! Parser for the `control` file key/value stanza.
//!
//! The grammar is deliberately small:
//!
//! - `Key: value` lines start a field; the value is trimmed.
//! - Lines starting with one space continue the previous field; the space is
//!   removed and the line is appended after a newline.
//! - Empty lines are skipped and do not end the stanza.
//!
//! A binary package carries exactly one stanza, so no paragraph splitting is
//! done.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::str::FromStr;

use crate::InspectError;
use crate::Result;

/// Parsed fields of a `control` file.
///
/// Keys are kept verbatim (case-sensitive, untrimmed) and iterate in sorted
/// order.
///
/// # Examples
///
/// ```
/// use debinfo_core::Control;
///
/// let control: Control = "Package: hello\nDescription: greeter\n more text\n".parse()?;
/// assert_eq!(control.get("Package"), Some("hello"));
/// assert_eq!(control.get("Description"), Some("greeter\nmore text"));
/// # Ok::<(), debinfo_core::InspectError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Control {
    fields: BTreeMap<String, String>,
}

impl Control {
    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the stanza has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Package name.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.get("Package")
    }

    /// Package version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.get("Version")
    }

    /// Target architecture.
    #[must_use]
    pub fn architecture(&self) -> Option<&str> {
        self.get("Architecture")
    }
}

impl FromStr for Control {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self> {
        parse_control(s)
    }
}

impl<'a> IntoIterator for &'a Control {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Parses a `control` stanza.
///
/// # Errors
///
/// - [`InspectError::BadContinuation`] for a continuation line before any
///   field
/// - [`InspectError::InvalidLine`] for a line without a colon
/// - [`InspectError::DuplicateKey`] for a repeated key
pub fn parse_control(text: &str) -> Result<Control> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut last_key: Option<&str> = None;

    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix(' ') {
            let value = last_key
                .and_then(|key| fields.get_mut(key))
                .ok_or_else(|| InspectError::BadContinuation {
                    line: line.to_string(),
                })?;
            value.push('\n');
            value.push_str(continuation);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(InspectError::InvalidLine {
                line: line.to_string(),
            });
        };
        if fields.contains_key(key) {
            return Err(InspectError::DuplicateKey {
                key: key.to_string(),
            });
        }
        fields.insert(key.to_string(), value.trim().to_string());
        last_key = Some(key);
    }

    Ok(Control { fields })
}
