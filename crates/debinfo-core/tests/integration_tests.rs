//! Integration tests for debinfo-core.
//!
//! These tests build whole packages in memory and drive them through the
//! public entry points.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Read;
use std::path::PathBuf;

use debinfo_core::ErrorCategory;
use debinfo_core::InspectConfig;
use debinfo_core::InspectError;
use debinfo_core::ar::ArReader;
use debinfo_core::ar::ArWriter;
use debinfo_core::ar::MemberHeader;
use debinfo_core::inspect_members;
use debinfo_core::inspect_package;
use debinfo_core::inventory::EntryKind;
use debinfo_core::test_utils::DebBuilder;
use debinfo_core::test_utils::TarTestBuilder;
use debinfo_core::test_utils::gzip;
use tempfile::TempDir;

const HELLO_CONTROL: &str = "\
Package: hello
Version: 2.10-3
Architecture: amd64
Maintainer: Santiago Vila <sanvila@debian.org>
Installed-Size: 280
Description: example package based on GNU hello
 The GNU hello program produces a familiar, friendly greeting.
";

fn elf_executable() -> Vec<u8> {
    let mut elf = b"\x7fELF\x02\x01\x01".to_vec();
    elf.resize(16, 0);
    elf.extend_from_slice(&2u16.to_le_bytes());
    elf.resize(4096, 0);
    elf
}

fn hello_payload() -> Vec<u8> {
    TarTestBuilder::new()
        .add_directory("./")
        .add_directory("./usr/")
        .add_directory("./usr/bin/")
        .add_file_with_mode("./usr/bin/hello", &elf_executable(), 0o755)
        .add_directory("./usr/share/doc/hello/")
        .add_file("./usr/share/doc/hello/copyright", b"GPL-3+\n")
        .add_symlink("./usr/share/doc/hello/changelog", "changelog.Debian.gz")
        .build()
}

fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x9E37_79B9_7F4A_7C15_u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 32) as u8
        })
        .collect()
}

#[test]
fn test_full_package_inspection() {
    let deb = DebBuilder::new()
        .control(HELLO_CONTROL)
        .data(hello_payload())
        .build();

    let report = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap();

    assert_eq!(report.control.get("Installed-Size"), Some("280"));
    assert_eq!(report.control_text, HELLO_CONTROL);
    assert_eq!(report.inventory.directory_count, 4);
    assert_eq!(report.inventory.file_count, 2);
    assert_eq!(report.inventory.total_file_size, 4096 + 7);

    let binary = report
        .inventory
        .entries
        .iter()
        .find(|e| e.path == PathBuf::from("./usr/bin/hello"))
        .unwrap();
    assert_eq!(binary.content_type, Some("application/x-executable"));
    assert_eq!(binary.mode_string(), "-rwxr-xr-x");

    let link = report.inventory.entries.last().unwrap();
    assert_eq!(link.label(), "-> changelog.Debian.gz");
}

#[test]
fn test_directory_text_and_symlink_aggregates() {
    let deb = DebBuilder::new()
        .data(
            TarTestBuilder::new()
                .add_directory("./etc/")
                .add_file("./etc/motd", b"hello you\n")
                .add_symlink("./etc/issue", "motd")
                .build(),
        )
        .build();

    let report = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap();
    let inventory = &report.inventory;
    assert_eq!(inventory.directory_count, 1);
    assert_eq!(inventory.file_count, 1);
    assert_eq!(inventory.total_file_size, 10);
    assert!(inventory.entries[1].label().starts_with("text/plain"));
    assert!(matches!(inventory.entries[2].kind, EntryKind::Symlink { .. }));
}

#[test]
fn test_old_format_version_rejected() {
    let deb = DebBuilder::new().version_body(b"1.0\n").build();
    let err = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap_err();
    assert!(matches!(err, InspectError::VersionMismatch { .. }));
    assert!(err.to_string().contains("2.0"));
    assert!(err.to_string().contains("1.0"));
}

#[test]
fn test_oversized_control_member_rejected_before_decoding() {
    let deb = DebBuilder::new().raw_control(vec![0xAA; 200_000]).build();
    let err = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap_err();
    assert!(err.to_string().contains("declared size too large"));
    assert_eq!(err.member(), Some("control.tar.gz"));
}

#[test]
fn test_permissive_config_allows_large_control_member() {
    // Incompressible maintainer scripts push the member past 100 KiB.
    let control = gzip(
        &TarTestBuilder::new()
            .add_file("./control", b"Package: big\n")
            .add_file("./postinst", &noise(256 * 1024))
            .build(),
    );
    assert!(control.len() as u64 > InspectConfig::default().max_control_member_size);

    let deb = DebBuilder::new().raw_control(control).build();
    assert!(inspect_package(deb.as_slice(), &InspectConfig::default()).is_err());

    let report = inspect_package(deb.as_slice(), &InspectConfig::permissive()).unwrap();
    assert_eq!(report.package(), Some("big"));
}

#[test]
fn test_corrupt_payload_is_decompression_error() {
    let deb = DebBuilder::new().raw_data(b"BZh91AY&SY".to_vec()).build();
    let err = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap_err();
    assert!(matches!(err, InspectError::Decompression { ref member, .. } if member == "data.tar.gz"));
    assert_eq!(err.category(), ErrorCategory::Content);
}

#[test]
fn test_truncated_package() {
    let payload = TarTestBuilder::new()
        .add_file("./usr/lib/blob.bin", &noise(16 * 1024))
        .add_file("./usr/lib/after", b"x")
        .build();
    let deb = DebBuilder::new().data(payload).build();
    let cut = &deb[..deb.len() - 8 * 1024];

    let err = inspect_package(cut, &InspectConfig::default()).unwrap_err();
    assert!(err.is_framing(), "{err}");
    assert!(
        matches!(err, InspectError::TruncatedBody { ref member, .. } if member == "data.tar.gz"),
        "{err}"
    );
}

#[test]
fn test_truncated_payload_tail() {
    let deb = DebBuilder::new()
        .data(
            TarTestBuilder::new()
                .add_file("./usr/share/doc/hello/README", b"0123456789")
                .build(),
        )
        .build();
    let cut = &deb[..deb.len() - 20];

    let err = inspect_package(cut, &InspectConfig::default()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Framing, "{err}");
    assert_eq!(err.member(), Some("data.tar.gz"));
}

#[test]
fn test_truncated_version_member() {
    let deb = DebBuilder::new().build();
    // signature, one header, then two of the four body bytes
    let cut = &deb[..8 + 60 + 2];

    let err = inspect_package(cut, &InspectConfig::default()).unwrap_err();
    assert!(
        matches!(
            err,
            InspectError::TruncatedBody {
                ref member,
                size: 4,
                missing: 2
            } if member == "debian-binary"
        ),
        "{err}"
    );
}

#[test]
fn test_truncated_control_member() {
    let deb = DebBuilder::new().control(HELLO_CONTROL).build();
    let control_start = 8 + 60 + 4 + 60;
    let cut = &deb[..control_start + 30];

    let err = inspect_package(cut, &InspectConfig::default()).unwrap_err();
    assert!(
        matches!(err, InspectError::TruncatedBody { ref member, .. } if member == "control.tar.gz"),
        "{err}"
    );
}

#[test]
fn test_truncated_header_after_signature() {
    let mut deb = b"!<arch>\n".to_vec();
    deb.extend_from_slice(&[b' '; 40]);
    let err = inspect_package(deb.as_slice(), &InspectConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        InspectError::TruncatedHeader {
            expected: 60,
            found: 40
        }
    ));
}

#[test]
fn test_empty_archive_is_missing_member() {
    let err = inspect_package(&b"!<arch>\n"[..], &InspectConfig::default()).unwrap_err();
    assert!(matches!(err, InspectError::MissingMember { expected: "debian-binary" }));
}

#[test]
fn test_inspect_members_after_manual_signature() {
    let deb = DebBuilder::new().control("Package: manual\n").build();
    let mut ar = ArReader::with_signature(deb.as_slice()).unwrap();
    let report = inspect_members(&mut ar, &InspectConfig::default(), &mut debinfo_core::NoopVisitor)
        .unwrap();
    assert_eq!(report.package(), Some("manual"));
    assert_eq!(report.members.len(), 3);
}

#[test]
fn test_reader_walks_package_members() {
    let deb = DebBuilder::new().build();
    let mut ar = ArReader::with_signature(deb.as_slice()).unwrap();

    let mut version = String::new();
    ar.next_member()
        .unwrap()
        .unwrap()
        .read_to_string(&mut version)
        .unwrap();
    assert_eq!(version, "2.0\n");

    let control_size = {
        let control = ar.next_member().unwrap().unwrap();
        assert_eq!(control.name(), "control.tar.gz");
        control.size()
    };

    {
        let data = ar.next_member().unwrap().unwrap();
        assert_eq!(data.name(), "data.tar.gz");
    }
    assert_eq!(ar.last_discarded(), control_size);
    assert!(ar.next_member().unwrap().is_none());
}

#[test]
fn test_member_header_fields_survive() {
    let mut writer = ArWriter::new(Vec::new()).unwrap();
    let header = MemberHeader {
        name: "debian-binary".into(),
        mtime: 1_700_000_000,
        uid: 1000,
        gid: 1000,
        mode: 0o100_644,
        size: 4,
    };
    writer.append(&header, b"2.0\n").unwrap();
    writer
        .append_data("control.tar.gz", &DebBuilder::control_archive("Package: a\n"))
        .unwrap();
    writer
        .append_data("data.tar.gz", &gzip(&TarTestBuilder::new().build()))
        .unwrap();

    let report = inspect_package(writer.into_inner().as_slice(), &InspectConfig::default()).unwrap();
    assert_eq!(report.members[0], header);
}

#[test]
fn test_inspect_path_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("hello.deb");
    std::fs::write(&path, DebBuilder::new().control(HELLO_CONTROL).build()).unwrap();

    let report = debinfo_core::inspect_path(&path, &InspectConfig::default()).unwrap();
    assert_eq!(report.control.architecture(), Some("amd64"));
}
