use std::path::Path;

use anyhow::{Context, Result};
use binflow_core::backend::FileBackend;
use binflow_core::stream::TypedStream;
use binflow_core::zip::{LocalFileEntry, ZipArchive};
use tracing::{error, info, warn};

use super::{EXIT_OPEN_FAILED, EXIT_UNNAMED_ENTRY};

/// Decode the first entry of `archive` and write its raw payload into
/// `dest`, named after the entry's stored file name.
///
/// Returns the process exit code: 0 on success and when the archive holds no
/// decodable entry (nothing to extract), [`EXIT_OPEN_FAILED`] when the
/// archive cannot be opened, [`EXIT_UNNAMED_ENTRY`] when the entry has no
/// stored name, 1 when writing the payload fails.
pub fn execute(archive: &str, dest: &str) -> u8 {
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

    if entry.file_name.is_empty() {
        error!("entry in {} has no stored file name", archive.name());
        return EXIT_UNNAMED_ENTRY;
    }

    match write_payload(&entry, dest.as_ref()) {
        Ok(()) => {
            info!("extracted {} ({} bytes)", entry.file_name, entry.data.len());
            0
        }
        Err(err) => {
            error!("{:#}", err);
            1
        }
    }
}

fn write_payload(entry: &LocalFileEntry, dest: &Path) -> Result<()> {
    if !entry.is_stored() {
        warn!(
            "{} uses compression method {}; writing the stored bytes without decompression",
            entry.file_name, entry.header.compression_method
        );
    }

    let path = dest.join(&entry.file_name);
    let backend = FileBackend::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut stream = TypedStream::new(backend);
    stream
        .write_raw(&entry.data)
        .with_context(|| format!("failed to write {}", path.display()))?;
    stream.quiesce().context("failed to close the output file")?;

    Ok(())
}
