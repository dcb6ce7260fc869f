//! # Binflow Core
//!
//! Typed, endian-aware binary stream I/O over pluggable raw-byte backends,
//! with a ZIP local-file-entry decoder as the bundled container format.
//!
//! ## Modules
//!
//! - `error`: status codes and the unified error value
//! - `endian`: byte-order conversion over scalars, arrays, and records
//! - `scalar`: the scalar wire codec
//! - `record`: schema-described plain records
//! - `backend`: raw-byte backends (file, null)
//! - `stream`: the typed stream layer
//! - `zip`: ZIP local-file-entry decoding

#![warn(missing_docs)]

pub mod backend;
pub mod endian;
pub mod error;
pub mod record;
pub mod scalar;
pub mod stream;
pub mod zip;

// Re-export commonly used types
pub use backend::{FileBackend, NullBackend, StreamBackend};
pub use endian::ByteOrder;
pub use error::{StatusCode, StreamError};
pub use stream::TypedStream;
pub use zip::{LocalFileEntry, LocalFileHeader, ZipArchive};

/// Result type alias for binflow operations
pub type Result<T> = core::result::Result<T, StreamError>;
