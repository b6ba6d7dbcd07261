//! Inspection limits.

/// Default ceiling for the declared size of the `control.tar.gz` member.
pub const DEFAULT_MAX_CONTROL_MEMBER_SIZE: u64 = 100 * 1024;

/// Default ceiling for the decompressed `control` file.
pub const DEFAULT_MAX_CONTROL_FILE_SIZE: u64 = 1024 * 1024;

/// Default number of bytes read from a regular file to sniff its content
/// type.
pub const DEFAULT_SNIFF_LIMIT: usize = 3072;

/// Limits applied while inspecting a package.
///
/// Every limit turns hostile or corrupt input into a hard error before any
/// unbounded work is done. Pass by reference; the struct is cheap to clone.
///
/// # Examples
///
/// ```
/// use debinfo_core::InspectConfig;
///
/// let config = InspectConfig::default();
/// assert_eq!(config.max_control_member_size, 102_400);
///
/// let custom = InspectConfig {
///     sniff_limit: 512,
///     ..Default::default()
/// };
/// assert_eq!(custom.sniff_limit, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    /// Maximum declared size of the compressed control archive member.
    pub max_control_member_size: u64,

    /// Maximum size of the decompressed `control` file.
    pub max_control_file_size: u64,

    /// Bytes of each regular file read for content-type sniffing.
    pub sniff_limit: usize,
}

impl Default for InspectConfig {
    /// Default values:
    /// - `max_control_member_size`: 100 KiB
    /// - `max_control_file_size`: 1 MiB
    /// - `sniff_limit`: 3072 bytes
    fn default() -> Self {
        Self {
            max_control_member_size: DEFAULT_MAX_CONTROL_MEMBER_SIZE,
            max_control_file_size: DEFAULT_MAX_CONTROL_FILE_SIZE,
            sniff_limit: DEFAULT_SNIFF_LIMIT,
        }
    }
}

impl InspectConfig {
    /// Creates a configuration with raised limits for trusted packages.
    ///
    /// Some packages ship maintainer scripts and triggers large enough to
    /// push the control archive past the default ceiling.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_control_member_size: 16 * 1024 * 1024,
            max_control_file_size: 16 * 1024 * 1024,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InspectConfig::default();
        assert_eq!(config.max_control_member_size, 102_400);
        assert_eq!(config.max_control_file_size, 1024 * 1024);
        assert_eq!(config.sniff_limit, 3072);
    }

    #[test]
    fn test_permissive_config() {
        let config = InspectConfig::permissive();
        assert!(config.max_control_member_size > DEFAULT_MAX_CONTROL_MEMBER_SIZE);
        assert!(config.max_control_file_size > DEFAULT_MAX_CONTROL_FILE_SIZE);
        assert_eq!(config.sniff_limit, DEFAULT_SNIFF_LIMIT);
    }
}
