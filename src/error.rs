//! Error types for FAT32 operations

use core::fmt;

/// Result type for FAT32 operations
pub type Result<T> = core::result::Result<T, Fat32Error>;

/// Errors that can occur during FAT32 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fat32Error {
    /// Short read/write against the backing image
    Io,

    /// Invalid geometry or signature in the boot sector
    CorruptVolume,

    /// File or directory not found
    NotFound,

    /// A path component resolved to something other than a directory
    NotADirectory,

    /// Directory still contains live entries
    NotEmpty,

    /// An entry with that name already exists
    AlreadyExists,

    /// A handle with that name is already open
    AlreadyOpen,

    /// No open handle with that name
    NotOpen,

    /// Entry is held by an open handle
    InUse,

    /// Handle was not opened for the requested access
    AccessMode,

    /// Read cursor is already at end of file
    EndOfFile,

    /// No free cluster left in the FAT
    NoSpace,

    /// Name cannot be expressed as an 8.3 short name
    InvalidName,

    /// Device too small to hold a FAT32 volume
    ImageTooSmall,
}

impl fmt::Display for Fat32Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error against backing image"),
            Self::CorruptVolume => write!(f, "invalid boot sector geometry"),
            Self::NotFound => write!(f, "file or directory not found"),
            Self::NotADirectory => write!(f, "path component is not a directory"),
            Self::NotEmpty => write!(f, "directory is not empty"),
            Self::AlreadyExists => write!(f, "entry already exists"),
            Self::AlreadyOpen => write!(f, "file is already open"),
            Self::NotOpen => write!(f, "file is not open"),
            Self::InUse => write!(f, "file is held by an open handle"),
            Self::AccessMode => write!(f, "operation not permitted by access mode"),
            Self::EndOfFile => write!(f, "cursor is at end of file"),
            Self::NoSpace => write!(f, "no free cluster available"),
            Self::InvalidName => write!(f, "not a valid 8.3 short name"),
            Self::ImageTooSmall => write!(f, "device too small for FAT32"),
        }
    }
}
