use std::path::Path;

use binflow_cli::commands::{extract, info, EXIT_OPEN_FAILED, EXIT_UNNAMED_ENTRY};
use binflow_core::backend::FileBackend;
use binflow_core::endian::ByteOrder;
use binflow_core::stream::TypedStream;
use binflow_core::zip::{LocalFileHeader, LOCAL_HEADER_SIGNATURE};
use tempfile::tempdir;

fn write_archive(path: &Path, name: &[u8], extra: &[u8], data: &[u8], method: u16) {
    let header = LocalFileHeader {
        signature: LOCAL_HEADER_SIGNATURE,
        version_needed: 20,
        compression_method: method,
        compressed_size: data.len() as u32,
        uncompressed_size: data.len() as u32,
        file_name_length: name.len() as u16,
        extra_field_length: extra.len() as u16,
        ..LocalFileHeader::default()
    };

    let mut stream = TypedStream::new(FileBackend::create(path).unwrap());
    stream.write_record(&header, ByteOrder::Little).unwrap();
    stream.write_raw(name).unwrap();
    stream.write_raw(extra).unwrap();
    stream.write_raw(data).unwrap();
    stream.quiesce().unwrap();
}

fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn extract_writes_the_first_entry_payload() {
    let td = tempdir().unwrap();
    let archive = td.path().join("in.zip");
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    write_archive(&archive, b"hello.txt", b"", b"hello world", 0);

    let code = extract::execute(archive.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, 0);

    let written = std::fs::read(dest.join("hello.txt")).unwrap();
    assert_eq!(written, b"hello world");
}

#[test]
fn extract_missing_archive_reports_open_failure() {
    let td = tempdir().unwrap();
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    let missing = td.path().join("missing.zip");
    let code = extract::execute(missing.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, EXIT_OPEN_FAILED);
    assert!(dir_is_empty(&dest));
}

#[test]
fn extract_unnamed_entry_is_rejected() {
    let td = tempdir().unwrap();
    let archive = td.path().join("unnamed.zip");
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    write_archive(&archive, b"", b"", b"payload", 0);

    let code = extract::execute(archive.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, EXIT_UNNAMED_ENTRY);
    assert!(dir_is_empty(&dest));
}

#[test]
fn extract_short_archive_extracts_nothing() {
    let td = tempdir().unwrap();
    let archive = td.path().join("short.zip");
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    std::fs::write(&archive, [0u8; 10]).unwrap();

    let code = extract::execute(archive.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, 0);
    assert!(dir_is_empty(&dest));
}

#[test]
fn extract_deflate_entry_writes_the_raw_bytes() {
    let td = tempdir().unwrap();
    let archive = td.path().join("deflate.zip");
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    let raw = [0x78u8, 0x9C, 0x01, 0x02, 0x03];
    write_archive(&archive, b"blob.bin", b"", &raw, 8);

    let code = extract::execute(archive.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, 0);

    // No decompression happens; the stored bytes land on disk untouched.
    let written = std::fs::read(dest.join("blob.bin")).unwrap();
    assert_eq!(written, raw);
}

#[test]
fn extract_empty_payload_creates_an_empty_file() {
    let td = tempdir().unwrap();
    let archive = td.path().join("empty.zip");
    let dest = td.path().join("out");
    std::fs::create_dir(&dest).unwrap();

    write_archive(&archive, b"empty.txt", b"", b"", 0);

    let code = extract::execute(archive.to_str().unwrap(), dest.to_str().unwrap());
    assert_eq!(code, 0);
    assert_eq!(std::fs::read(dest.join("empty.txt")).unwrap(), b"");
}

#[test]
fn info_renders_text_and_json() {
    let td = tempdir().unwrap();
    let archive = td.path().join("info.zip");

    write_archive(&archive, b"doc.txt", &[0x01, 0x02], b"content", 0);

    assert_eq!(info::execute(archive.to_str().unwrap(), false), 0);
    assert_eq!(info::execute(archive.to_str().unwrap(), true), 0);
}

#[test]
fn info_missing_archive_reports_open_failure() {
    let td = tempdir().unwrap();
    let missing = td.path().join("missing.zip");

    assert_eq!(info::execute(missing.to_str().unwrap(), false), EXIT_OPEN_FAILED);
}
