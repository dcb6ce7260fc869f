pub mod extract;
pub mod info;

/// Exit code when the archive cannot be opened.
pub const EXIT_OPEN_FAILED: u8 = 3;

/// Exit code when the first entry carries no stored file name.
pub const EXIT_UNNAMED_ENTRY: u8 = 4;
