//! ZIP local-file-entry decoding over a typed stream

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::backend::{FileBackend, StreamBackend};
use crate::endian::{ByteOrder, FieldKind, FieldSpec};
use crate::record::Record;
use crate::scalar::Scalar;
use crate::stream::TypedStream;
use crate::Result;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Signature that opens every ZIP local file header (`PK\x03\x04`).
pub const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Method 0: payload stored uncompressed.
    Stored,
    /// Method 8: DEFLATE.
    Deflate,
    /// Any other method value.
    Unknown(u16),
}

impl CompressionMethod {
    /// Classify a wire method value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    /// The wire method value.
    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(value) => *value,
        }
    }
}

/// Fixed 30-byte header that precedes every entry payload in a ZIP archive.
///
/// Field order and widths are bit-exact against the ZIP format; the packed
/// layout has no padding. Conventional archives store it little-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LocalFileHeader {
    /// Magic number, [`LOCAL_HEADER_SIGNATURE`] on well-formed archives.
    pub signature: u32,
    /// Minimum format version needed to extract.
    pub version_needed: u16,
    /// General-purpose bit flags.
    pub flags: u16,
    /// Wire value of the compression method; see
    /// [`LocalFileHeader::compression`].
    pub compression_method: u16,
    /// Modification time in MS-DOS format.
    pub last_mod_time: u16,
    /// Modification date in MS-DOS format.
    pub last_mod_date: u16,
    /// CRC-32 of the uncompressed data. Carried, never verified here.
    pub crc32: u32,
    /// Size of the entry payload as stored.
    pub compressed_size: u32,
    /// Size of the payload after decompression.
    pub uncompressed_size: u32,
    /// Length of the file name that follows the header.
    pub file_name_length: u16,
    /// Length of the extra field that follows the file name.
    pub extra_field_length: u16,
}

impl LocalFileHeader {
    /// Exact encoded size of the header in bytes.
    pub const SIZE: usize = 30;

    /// Classify the stored compression method.
    pub fn compression(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.compression_method)
    }
}

impl Record for LocalFileHeader {
    const WIDTH: usize = Self::SIZE;

    const LAYOUT: &'static [FieldSpec] = &[
        FieldSpec::new(0, FieldKind::Scalar { size: 4 }),  // signature
        FieldSpec::new(4, FieldKind::Scalar { size: 2 }),  // version_needed
        FieldSpec::new(6, FieldKind::Scalar { size: 2 }),  // flags
        FieldSpec::new(8, FieldKind::Enum { size: 2 }),    // compression_method
        FieldSpec::new(10, FieldKind::Scalar { size: 2 }), // last_mod_time
        FieldSpec::new(12, FieldKind::Scalar { size: 2 }), // last_mod_date
        FieldSpec::new(14, FieldKind::Scalar { size: 4 }), // crc32
        FieldSpec::new(18, FieldKind::Scalar { size: 4 }), // compressed_size
        FieldSpec::new(22, FieldKind::Scalar { size: 4 }), // uncompressed_size
        FieldSpec::new(26, FieldKind::Scalar { size: 2 }), // file_name_length
        FieldSpec::new(28, FieldKind::Scalar { size: 2 }), // extra_field_length
    ];

    fn decode_fields(bytes: &[u8]) -> Self {
        Self {
            signature: u32::decode(&bytes[0..4]),
            version_needed: u16::decode(&bytes[4..6]),
            flags: u16::decode(&bytes[6..8]),
            compression_method: u16::decode(&bytes[8..10]),
            last_mod_time: u16::decode(&bytes[10..12]),
            last_mod_date: u16::decode(&bytes[12..14]),
            crc32: u32::decode(&bytes[14..18]),
            compressed_size: u32::decode(&bytes[18..22]),
            uncompressed_size: u32::decode(&bytes[22..26]),
            file_name_length: u16::decode(&bytes[26..28]),
            extra_field_length: u16::decode(&bytes[28..30]),
        }
    }

    fn encode_fields(&self, out: &mut [u8]) {
        self.signature.encode(&mut out[0..4]);
        self.version_needed.encode(&mut out[4..6]);
        self.flags.encode(&mut out[6..8]);
        self.compression_method.encode(&mut out[8..10]);
        self.last_mod_time.encode(&mut out[10..12]);
        self.last_mod_date.encode(&mut out[12..14]);
        self.crc32.encode(&mut out[14..18]);
        self.compressed_size.encode(&mut out[18..22]);
        self.uncompressed_size.encode(&mut out[22..26]);
        self.file_name_length.encode(&mut out[26..28]);
        self.extra_field_length.encode(&mut out[28..30]);
    }
}

/// One decoded local file entry: header plus its three trailing fields.
///
/// Transient decode result with no persistent identity. `data` holds the
/// payload exactly as stored; no compression method is ever applied, so only
/// [`CompressionMethod::Stored`] entries carry ready-to-use content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalFileEntry {
    /// The fixed-size header.
    pub header: LocalFileHeader,
    /// Entry name, `file_name_length` bytes decoded lossily as UTF-8.
    pub file_name: String,
    /// Raw extra field, `extra_field_length` bytes.
    pub extra_field: Bytes,
    /// Raw payload, `compressed_size` bytes, never decompressed.
    pub data: Bytes,
}

impl LocalFileEntry {
    /// Whether the payload bytes are usable as-is.
    pub fn is_stored(&self) -> bool {
        self.header.compression() == CompressionMethod::Stored
    }
}

/// Decoder for the first local file entry of a ZIP archive.
///
/// Only the first local entry is ever decoded; the central directory is
/// never read, so multi-entry archives are out of scope.
#[derive(Debug)]
pub struct ZipArchive<B> {
    name: String,
    stream: TypedStream<B>,
}

impl ZipArchive<FileBackend> {
    /// Open an archive file.
    ///
    /// The display name is derived from the path's final component and used
    /// only for diagnostics.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let backend = FileBackend::open(path)?;
        Ok(Self::from_stream(name, TypedStream::new(backend)))
    }
}

impl<B: StreamBackend> ZipArchive<B> {
    /// Wrap an already-open stream under a display name.
    pub fn from_stream(name: impl Into<String>, stream: TypedStream<B>) -> Self {
        Self {
            name: name.into(),
            stream,
        }
    }

    /// Display name of the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recover the stream, consuming the archive.
    pub fn into_stream(self) -> TypedStream<B> {
        self.stream
    }

    /// Decode the first local file entry.
    ///
    /// The 30-byte header is read all-or-nothing with little-endian order;
    /// if it cannot be read, `None` is returned and no partial field is
    /// observable. The three trailing fields are best-effort: a read failure
    /// leaves that field empty instead of discarding the entry.
    pub fn first_entry(&mut self) -> Option<LocalFileEntry> {
        self.stream.seek(0).ok()?;

        let header: LocalFileHeader = match self.stream.read_record(ByteOrder::Little) {
            Ok(header) => header,
            Err(_err) => {
                #[cfg(feature = "logging")]
                debug!("no decodable local entry in {}: {}", self.name, _err);
                return None;
            }
        };

        #[cfg(feature = "logging")]
        if header.signature != LOCAL_HEADER_SIGNATURE {
            warn!(
                "unexpected local header signature {:#010x} in {}",
                header.signature, self.name
            );
        }

        #[cfg(feature = "logging")]
        if header.compression() != CompressionMethod::Stored {
            warn!(
                "entry in {} uses compression method {}; payload bytes are returned undecompressed",
                self.name, header.compression_method
            );
        }

        let mut entry = LocalFileEntry {
            header,
            ..LocalFileEntry::default()
        };

        if let Ok(file_name) = self.stream.read_string(usize::from(header.file_name_length)) {
            entry.file_name = file_name;
        }
        if let Ok(extra_field) = self
            .stream
            .read_bytes(usize::from(header.extra_field_length))
        {
            entry.extra_field = extra_field;
        }
        if let Ok(data) = self.stream.read_bytes(header.compressed_size as usize) {
            entry.data = data;
        }

        Some(entry)
    }
}
