//! Raw-byte backends beneath the typed stream layer

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{io_code, StatusCode, StreamError};
use crate::Result;

#[cfg(feature = "logging")]
use tracing::debug;

/// Capability set every raw-byte backend must provide.
///
/// The typed stream layer is generic over this trait, so only conforming
/// backends can be wrapped; the conformance check happens at compile time.
/// A backend instance exclusively owns one open resource for its lifetime;
/// callers serialize concurrent use themselves.
pub trait StreamBackend {
    /// Release the owned resource. Idempotent: repeat calls succeed.
    fn quiesce(&mut self) -> Result<()>;

    /// Whether the backend can service data operations: true until it is
    /// closed or a raw operation leaves it in a failed state.
    fn validate(&self) -> bool;

    /// Total size of the resource in bytes. Must not perturb the externally
    /// visible cursor.
    fn size(&mut self) -> Result<u64>;

    /// Current cursor position.
    fn position(&mut self) -> Result<u64>;

    /// Move the cursor to an absolute byte offset.
    fn seek(&mut self, position: u64) -> Result<()>;

    /// Fill `buf` from the cursor, advancing it. Rejects empty buffers as
    /// [`StatusCode::FailedPrecondition`]; maps end-of-resource to
    /// [`StatusCode::OutOfRange`] and any other fault to
    /// [`StatusCode::Aborted`].
    fn raw_read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Fill `buf` from the cursor without consuming: the cursor is unchanged
    /// after return, including on failure. Same error taxonomy as
    /// [`StreamBackend::raw_read`].
    fn raw_peek(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write `buf` at the cursor, advancing it. Rejects empty buffers as
    /// [`StatusCode::FailedPrecondition`].
    fn raw_write(&mut self, buf: &[u8]) -> Result<()>;
}

/// File-backed stream backend.
///
/// Opens a path for combined read/write in binary mode and owns the handle
/// until [`StreamBackend::quiesce`]. An I/O fault (anything mapped to
/// [`StatusCode::Aborted`]) leaves the backend failed; end-of-file does not,
/// since the caller can recover by seeking.
#[derive(Debug)]
pub struct FileBackend {
    file: Option<File>,
    failed: bool,
}

impl FileBackend {
    /// Open an existing file for read/write access.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(path.as_ref(), OpenOptions::new().read(true).write(true))
    }

    /// Create or truncate a file and open it for read/write access.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(
            path.as_ref(),
            OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true),
        )
    }

    fn with_options(path: &Path, options: &OpenOptions) -> Result<Self> {
        let file = options.open(path).map_err(|err| {
            StreamError::new(
                io_code(&err),
                format!("failed to open {}: {}", path.display(), err),
            )
        })?;

        Ok(Self {
            file: Some(file),
            failed: false,
        })
    }

    fn handle(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(|| {
            StreamError::new(StatusCode::FailedPrecondition, "backend is closed")
        })
    }

    fn fault(&mut self, err: std::io::Error) -> StreamError {
        self.failed = true;
        StreamError::from(err)
    }
}

impl StreamBackend for FileBackend {
    fn quiesce(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            drop(file);

            #[cfg(feature = "logging")]
            debug!("file backend closed");
        }

        Ok(())
    }

    fn validate(&self) -> bool {
        self.file.is_some() && !self.failed
    }

    fn size(&mut self) -> Result<u64> {
        // Reading the metadata leaves the cursor untouched.
        match self.handle()?.metadata() {
            Ok(metadata) => Ok(metadata.len()),
            Err(err) => Err(self.fault(err)),
        }
    }

    fn position(&mut self) -> Result<u64> {
        match self.handle()?.stream_position() {
            Ok(position) => Ok(position),
            Err(err) => Err(self.fault(err)),
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        match self.handle()?.seek(SeekFrom::Start(position)) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.fault(err)),
        }
    }

    fn raw_read(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Err(StreamError::new(
                StatusCode::FailedPrecondition,
                "cannot read less than one byte",
            ));
        }

        match self.handle()?.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(StreamError::new(
                StatusCode::OutOfRange,
                "end of stream reached",
            )),
            Err(err) => Err(self.fault(err)),
        }
    }

    fn raw_peek(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Err(StreamError::new(
                StatusCode::FailedPrecondition,
                "cannot peek less than one byte",
            ));
        }

        let saved = match self.handle()?.stream_position() {
            Ok(position) => position,
            Err(err) => return Err(self.fault(err)),
        };

        let outcome = self.handle()?.read_exact(buf);

        // Restore the cursor before surfacing the read outcome.
        if let Err(err) = self.handle()?.seek(SeekFrom::Start(saved)) {
            return Err(self.fault(err));
        }

        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(StreamError::new(
                StatusCode::OutOfRange,
                "end of stream reached",
            )),
            Err(err) => Err(self.fault(err)),
        }
    }

    fn raw_write(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Err(StreamError::new(
                StatusCode::FailedPrecondition,
                "cannot write less than one byte",
            ));
        }

        match self.handle()?.write_all(buf) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fault(err)),
        }
    }
}

/// Backend that satisfies every raw operation without touching a resource.
///
/// Reads and peeks succeed with no bytes (the caller's buffer stays as it
/// was) and writes are discarded. Used to exercise the typed stream layer in
/// isolation.
#[derive(Debug)]
pub struct NullBackend {
    open: bool,
}

impl NullBackend {
    /// Create an open null backend.
    pub fn new() -> Self {
        Self { open: true }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBackend for NullBackend {
    fn quiesce(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn validate(&self) -> bool {
        self.open
    }

    fn size(&mut self) -> Result<u64> {
        Ok(0)
    }

    fn position(&mut self) -> Result<u64> {
        Ok(0)
    }

    fn seek(&mut self, _position: u64) -> Result<()> {
        Ok(())
    }

    fn raw_read(&mut self, _buf: &mut [u8]) -> Result<()> {
        Ok(())
    }

    fn raw_peek(&mut self, _buf: &mut [u8]) -> Result<()> {
        Ok(())
    }

    fn raw_write(&mut self, _buf: &[u8]) -> Result<()> {
        Ok(())
    }
}
