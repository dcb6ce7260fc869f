use binflow_core::zip::{LocalFileEntry, LocalFileHeader, ZipArchive};
use tracing::{error, warn};

use super::EXIT_OPEN_FAILED;

/// Decode the first entry of `archive` and print its header and trailing
/// fields, as text or as JSON.
///
/// Returns the process exit code: 0 on success and when the archive holds no
/// decodable entry, [`EXIT_OPEN_FAILED`] when the archive cannot be opened.
pub fn execute(archive: &str, json: bool) -> u8 {
    let mut archive = match ZipArchive::open(archive) {
        Ok(archive) => archive,
        Err(err) => {
            error!("{}", err);
            return EXIT_OPEN_FAILED;
        }
    };

    let Some(entry) = archive.first_entry() else {
        warn!("{} has no decodable local entry", archive.name());
        return 0;
    };

    if json {
        print_json(archive.name(), &entry);
    } else {
        print_text(archive.name(), &entry);
    }

    0
}

fn print_text(name: &str, entry: &LocalFileEntry) {
    println!("File: {}", name);
    println!();
    print_header(&entry.header);
    println!("FileName: {}", entry.file_name);

    if !entry.extra_field.is_empty() {
        println!("ExtraField: {}", hex_dump(&entry.extra_field));
    }
    if !entry.data.is_empty() {
        println!("Data: {}", hex_dump(&entry.data));
    }
}

fn print_header(header: &LocalFileHeader) {
    println!("LocalFileHeader:");
    println!("  signature: {:#x}", header.signature);
    println!("  version_needed: {:#x}", header.version_needed);
    println!("  flags: {:#x}", header.flags);
    println!("  compression_method: {:#x}", header.compression_method);
    println!("  last_mod_time: {:#x}", header.last_mod_time);
    println!("  last_mod_date: {:#x}", header.last_mod_date);
    println!("  crc32: {:#x}", header.crc32);
    println!("  compressed_size: {}", header.compressed_size);
    println!("  uncompressed_size: {}", header.uncompressed_size);
    println!("  file_name_length: {}", header.file_name_length);
    println!("  extra_field_length: {}", header.extra_field_length);
    println!();
}

fn print_json(name: &str, entry: &LocalFileEntry) {
    let doc = serde_json::json!({
        "archive": name,
        "header": entry.header,
        "file_name": entry.file_name,
        "extra_field": hex::encode(&entry.extra_field),
        "data": hex::encode(&entry.data),
    });

    match serde_json::to_string_pretty(&doc) {
        Ok(rendered) => println!("{}", rendered),
        Err(err) => error!("failed to render JSON: {}", err),
    }
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
