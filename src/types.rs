//! Common types and constants for the FAT32 on-disk format

/// Device sector size in bytes (512-byte blocks assumed throughout)
pub const SECTOR_SIZE: usize = 512;

/// Size of one directory entry slot on disk
pub const DIR_ENTRY_SIZE: usize = 32;

/// Size of one FAT chain-link entry on disk
pub const FAT_ENTRY_SIZE: u64 = 4;

/// Only the low 28 bits of a FAT32 entry are significant
pub const FAT_ENTRY_MASK: u32 = 0x0FFF_FFFF;

/// FAT entry value marking a free cluster
pub const FREE_CLUSTER: u32 = 0;

/// Lowest end-of-chain marker value
pub const END_OF_CHAIN_MIN: u32 = 0x0FFF_FFF8;

/// End-of-chain marker written when claiming or terminating a chain
pub const END_OF_CHAIN: u32 = 0x0FFF_FFF8;

/// First valid data cluster number
pub const FIRST_DATA_CLUSTER: u32 = 2;

/// Name byte marking end-of-directory (this and all following slots unused)
pub const ENTRY_END_OF_DIRECTORY: u8 = 0x00;

/// Name byte marking a deleted (reusable) slot
pub const ENTRY_DELETED: u8 = 0xE5;

/// Read-only attribute bit
pub const ATTR_READ_ONLY: u8 = 0x01;
/// Hidden attribute bit
pub const ATTR_HIDDEN: u8 = 0x02;
/// System attribute bit
pub const ATTR_SYSTEM: u8 = 0x04;
/// Volume-label attribute bit
pub const ATTR_VOLUME_ID: u8 = 0x08;
/// Directory attribute bit
pub const ATTR_DIRECTORY: u8 = 0x10;
/// Archive attribute bit
pub const ATTR_ARCHIVE: u8 = 0x20;
/// Attribute value marking a long-name sequence slot
pub const ATTR_LONG_NAME: u8 = ATTR_READ_ONLY | ATTR_HIDDEN | ATTR_SYSTEM | ATTR_VOLUME_ID;

/// Decoded attribute bits of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    /// Entry is read-only
    pub read_only: bool,

    /// Entry is hidden from normal listings
    pub hidden: bool,

    /// Operating-system file
    pub system: bool,

    /// Entry is the volume label
    pub volume_id: bool,

    /// Entry is a subdirectory
    pub directory: bool,

    /// Archive (modified-since-backup) bit
    pub archive: bool,
}

impl Attributes {
    /// Decode from the raw attribute byte
    pub fn from_raw(raw: u8) -> Self {
        Self {
            read_only: raw & ATTR_READ_ONLY != 0,
            hidden: raw & ATTR_HIDDEN != 0,
            system: raw & ATTR_SYSTEM != 0,
            volume_id: raw & ATTR_VOLUME_ID != 0,
            directory: raw & ATTR_DIRECTORY != 0,
            archive: raw & ATTR_ARCHIVE != 0,
        }
    }
}

/// What a directory entry denotes, resolved once at decode time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Subdirectory
    Directory,
    /// Volume label entry
    VolumeId,
    /// One slot of a long-name sequence (skipped by the index)
    LongNamePart,
}

impl EntryKind {
    /// Derive the kind from the raw attribute byte
    pub fn from_raw(raw: u8) -> Self {
        if raw & ATTR_LONG_NAME == ATTR_LONG_NAME {
            EntryKind::LongNamePart
        } else if raw & ATTR_DIRECTORY != 0 {
            EntryKind::Directory
        } else if raw & ATTR_VOLUME_ID != 0 {
            EntryKind::VolumeId
        } else {
            EntryKind::File
        }
    }
}

/// Access mode of an open file handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Reads only
    Read,
    /// Writes only
    Write,
    /// Reads and writes
    ReadWrite,
}

impl OpenMode {
    /// Whether the mode permits reads
    pub fn can_read(self) -> bool {
        matches!(self, OpenMode::Read | OpenMode::ReadWrite)
    }

    /// Whether the mode permits writes
    pub fn can_write(self) -> bool {
        matches!(self, OpenMode::Write | OpenMode::ReadWrite)
    }
}
