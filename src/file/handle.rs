//! Open file handle

use alloc::string::String;

use crate::directory::index::LocatedEntry;
use crate::types::OpenMode;

/// A logically open file
///
/// Tracks the on-disk identity of the entry (name, first cluster, slot
/// offset) plus the session-side cursor and access mode. At most one
/// handle per name may be open at a time; the open-file table enforces
/// this.
#[derive(Debug, Clone)]
pub struct FileHandle {
    /// Display form of the name the file was opened under
    pub name: String,

    /// Packed 11-byte short name, for identity comparisons
    pub short_name: [u8; 11],

    /// First cluster of the file's chain (0 while the file is empty)
    pub start_cluster: u32,

    /// Current file size in bytes
    pub size: u32,

    /// Cursor position for the next read/write
    pub cursor: u32,

    /// Access mode granted at open
    pub mode: OpenMode,

    /// Byte offset of the file's directory-entry slot
    pub entry_offset: u64,
}

impl FileHandle {
    /// Build a handle from a located directory entry, cursor at zero.
    pub fn from_entry(name: String, located: &LocatedEntry, mode: OpenMode) -> Self {
        Self {
            name,
            short_name: located.entry.name,
            start_cluster: located.entry.first_cluster(),
            size: located.entry.size,
            cursor: 0,
            mode,
            entry_offset: located.offset,
        }
    }
}
