//! Typed read/peek/write layered over a raw-byte backend

use bytes::Bytes;

use crate::backend::StreamBackend;
use crate::endian::{convert_record, swap_in_place, ByteOrder};
use crate::error::{StatusCode, StreamError};
use crate::record::Record;
use crate::scalar::Scalar;
use crate::Result;

/// Largest scalar width the stream buffers on the stack.
const MAX_SCALAR_WIDTH: usize = 8;

const STREAM_STATE_INVALID: &str = "stream is not in a valid state";

/// Typed stream over a raw-byte backend.
///
/// Every data operation requires the backend to be in a valid state and
/// fails with [`StatusCode::FailedPrecondition`] otherwise. Values cross the
/// boundary in the byte order the caller names; conversion to the host's
/// native order happens here, not in the backend.
///
/// Operations on one stream instance observe a total order equal to call
/// order. The stream owns its backend; callers needing concurrency use one
/// stream per task.
#[derive(Debug)]
pub struct TypedStream<B> {
    backend: B,
}

impl<B: StreamBackend> TypedStream<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Recover the backend, consuming the stream.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Whether the underlying backend can service data operations.
    pub fn validate(&self) -> bool {
        self.backend.validate()
    }

    /// Release the underlying resource. Idempotent.
    pub fn quiesce(&mut self) -> Result<()> {
        self.backend.quiesce()
    }

    /// Move the cursor to an absolute byte offset.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.backend.seek(position)
    }

    /// Current cursor position.
    pub fn position(&mut self) -> Result<u64> {
        self.backend.position()
    }

    /// Total size of the underlying resource. The cursor is unaffected.
    pub fn size(&mut self) -> Result<u64> {
        self.backend.size()
    }

    fn check_state(&self) -> Result<()> {
        if self.backend.validate() {
            Ok(())
        } else {
            Err(StreamError::new(
                StatusCode::FailedPrecondition,
                STREAM_STATE_INVALID,
            ))
        }
    }

    /// Read one scalar stored in the given byte order.
    pub fn read_scalar<T: Scalar>(&mut self, order: ByteOrder) -> Result<T> {
        self.check_state()?;

        let mut buf = [0u8; MAX_SCALAR_WIDTH];
        let bytes = &mut buf[..T::WIDTH];

        self.backend.raw_read(bytes)?;
        swap_in_place(order, bytes, T::WIDTH);

        Ok(T::decode(bytes))
    }

    /// Read one scalar without consuming it: the cursor is unchanged after
    /// return.
    pub fn peek_scalar<T: Scalar>(&mut self, order: ByteOrder) -> Result<T> {
        self.check_state()?;

        let mut buf = [0u8; MAX_SCALAR_WIDTH];
        let bytes = &mut buf[..T::WIDTH];

        self.backend.raw_peek(bytes)?;
        swap_in_place(order, bytes, T::WIDTH);

        Ok(T::decode(bytes))
    }

    /// Write one scalar in the given byte order.
    pub fn write_scalar<T: Scalar>(&mut self, value: T, order: ByteOrder) -> Result<()> {
        self.check_state()?;

        let mut buf = [0u8; MAX_SCALAR_WIDTH];
        let bytes = &mut buf[..T::WIDTH];

        value.encode(bytes);
        swap_in_place(order, bytes, T::WIDTH);

        self.backend.raw_write(bytes)
    }

    /// Read one plain record stored in the given byte order.
    ///
    /// The record's bytes are read in a single raw operation, so the read is
    /// all-or-nothing, then converted field-wise through the record's schema.
    pub fn read_record<R: Record>(&mut self, order: ByteOrder) -> Result<R> {
        self.check_state()?;

        let mut buf = vec![0u8; R::WIDTH];
        self.backend.raw_read(&mut buf)?;
        convert_record(order, &mut buf, R::LAYOUT);

        Ok(R::decode_fields(&buf))
    }

    /// Write one plain record in the given byte order.
    pub fn write_record<R: Record>(&mut self, record: &R, order: ByteOrder) -> Result<()> {
        self.check_state()?;

        let mut buf = vec![0u8; R::WIDTH];
        record.encode_fields(&mut buf);
        convert_record(order, &mut buf, R::LAYOUT);

        self.backend.raw_write(&buf)
    }

    /// Read code units until a zero-valued terminator unit, converting each
    /// unit from the given byte order before the terminator comparison.
    ///
    /// The terminator is consumed but not returned. The first raw failure
    /// propagates. At most `max_units` non-terminator units are accepted;
    /// one more fails with [`StatusCode::ResourceExhausted`], bounding the
    /// allocation on malformed input.
    pub fn read_terminated<T>(&mut self, order: ByteOrder, max_units: usize) -> Result<Vec<T>>
    where
        T: Scalar + PartialEq + Default,
    {
        self.check_state()?;

        let terminator = T::default();
        let mut units = Vec::new();
        let mut buf = [0u8; MAX_SCALAR_WIDTH];
        let bytes = &mut buf[..T::WIDTH];

        loop {
            self.backend.raw_read(bytes)?;
            swap_in_place(order, bytes, T::WIDTH);

            let unit = T::decode(bytes);
            if unit == terminator {
                return Ok(units);
            }

            if units.len() == max_units {
                return Err(StreamError::new(
                    StatusCode::ResourceExhausted,
                    "terminated read exceeded the configured unit limit",
                ));
            }

            units.push(unit);
        }
    }

    /// Read a zero-terminated byte string of at most `max_len` bytes.
    ///
    /// Invalid UTF-8 is replaced, not rejected: the wire carries raw bytes.
    pub fn read_terminated_string(&mut self, max_len: usize) -> Result<String> {
        let bytes = self.read_terminated::<u8>(ByteOrder::native(), max_len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read exactly `len` bytes as text, regardless of embedded terminators.
    ///
    /// A zero-length request succeeds with an empty string without touching
    /// the backend.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read exactly `len` raw bytes.
    ///
    /// A zero-length request succeeds with an empty buffer without touching
    /// the backend.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.check_state()?;

        if len == 0 {
            return Ok(Bytes::new());
        }

        let mut buf = vec![0u8; len];
        self.backend.raw_read(&mut buf)?;

        Ok(Bytes::from(buf))
    }

    /// Write bytes unmodified. An empty slice is a successful no-op.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_state()?;

        if bytes.is_empty() {
            return Ok(());
        }

        self.backend.raw_write(bytes)
    }
}
