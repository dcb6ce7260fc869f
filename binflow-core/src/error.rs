//! Status codes and the unified error value for stream operations

use std::fmt;

/// Canonical failure kinds carried by every [`StreamError`].
///
/// The set is fixed; raw values outside it decode to [`StatusCode::Unknown`]
/// via [`StatusCode::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StatusCode {
    /// Not an error; the reserved success member. Never carried by an error.
    Success = 0,

    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,

    /// Unknown error.
    Unknown = 2,

    /// Invalid argument specified.
    InvalidArgument = 3,

    /// Deadline expired before the operation could complete.
    DeadlineExceeded = 4,

    /// Some requested entity (e.g., a file) was not found.
    NotFound = 5,

    /// The entity a client attempted to create already exists.
    AlreadyExists = 6,

    /// The caller does not have permission to execute the operation.
    PermissionDenied = 7,

    /// Some resource has been exhausted.
    ResourceExhausted = 8,

    /// The system is not in a state required for the operation's execution.
    FailedPrecondition = 9,

    /// The operation was aborted.
    Aborted = 10,

    /// The operation was attempted past the valid range (e.g., reading past
    /// end-of-stream).
    OutOfRange = 11,

    /// The operation is not implemented or not supported.
    Unimplemented = 12,

    /// Internal error.
    Internal = 13,

    /// The service is currently unavailable.
    Unavailable = 14,

    /// Unrecoverable data loss or corruption.
    DataLoss = 15,

    /// The request does not have valid authentication credentials.
    Unauthenticated = 16,
}

impl StatusCode {
    /// Convert a raw discriminant to a code known to this crate.
    ///
    /// Values outside the canonical set map to [`StatusCode::Unknown`].
    pub const fn from_raw(value: u32) -> Self {
        match value {
            0 => StatusCode::Success,
            1 => StatusCode::Cancelled,
            2 => StatusCode::Unknown,
            3 => StatusCode::InvalidArgument,
            4 => StatusCode::DeadlineExceeded,
            5 => StatusCode::NotFound,
            6 => StatusCode::AlreadyExists,
            7 => StatusCode::PermissionDenied,
            8 => StatusCode::ResourceExhausted,
            9 => StatusCode::FailedPrecondition,
            10 => StatusCode::Aborted,
            11 => StatusCode::OutOfRange,
            12 => StatusCode::Unimplemented,
            13 => StatusCode::Internal,
            14 => StatusCode::Unavailable,
            15 => StatusCode::DataLoss,
            16 => StatusCode::Unauthenticated,
            _ => StatusCode::Unknown,
        }
    }

    /// Human-readable name of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusCode::Success => "Success",
            StatusCode::Cancelled => "Cancelled",
            StatusCode::Unknown => "Unknown",
            StatusCode::InvalidArgument => "Invalid Argument",
            StatusCode::DeadlineExceeded => "Deadline Exceeded",
            StatusCode::NotFound => "Not Found",
            StatusCode::AlreadyExists => "Already Exists",
            StatusCode::PermissionDenied => "Permission Denied",
            StatusCode::ResourceExhausted => "Resource Exhausted",
            StatusCode::FailedPrecondition => "Failed Precondition",
            StatusCode::Aborted => "Aborted",
            StatusCode::OutOfRange => "Out of Range",
            StatusCode::Unimplemented => "Unimplemented",
            StatusCode::Internal => "Internal",
            StatusCode::Unavailable => "Unavailable",
            StatusCode::DataLoss => "Data Loss",
            StatusCode::Unauthenticated => "Unauthenticated",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error value returned by every fallible stream operation.
///
/// Success is expressed as `Ok(..)`; an error never carries
/// [`StatusCode::Success`]. Two errors compare equal when their codes match;
/// the message is human-facing text with no semantic meaning.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct StreamError {
    code: StatusCode,
    message: String,
}

impl StreamError {
    /// Create an error with a failure code and a descriptive message.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        debug_assert!(
            code != StatusCode::Success,
            "success is expressed as Ok, not as an error"
        );
        Self {
            code,
            message: message.into(),
        }
    }

    /// The failure kind.
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl PartialEq for StreamError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for StreamError {}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::new(io_code(&err), err.to_string())
    }
}

/// Map an I/O error kind into the status taxonomy.
pub(crate) fn io_code(err: &std::io::Error) -> StatusCode {
    match err.kind() {
        std::io::ErrorKind::UnexpectedEof => StatusCode::OutOfRange,
        std::io::ErrorKind::NotFound => StatusCode::NotFound,
        std::io::ErrorKind::PermissionDenied => StatusCode::PermissionDenied,
        _ => StatusCode::Aborted,
    }
}
