//! Directory entry codec
//!
//! Each directory slot is a fixed 32-byte record. Multi-byte fields are
//! little-endian; the first cluster number is split across two non-adjacent
//! 16-bit halves.

use crate::device;
use crate::error::Result;
use crate::types::{
    Attributes, EntryKind, ATTR_LONG_NAME, DIR_ENTRY_SIZE, ENTRY_DELETED, ENTRY_END_OF_DIRECTORY,
};
use gpt_disk_io::BlockIo;

/// One 8.3 short-name directory entry (32 bytes on disk)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    /// 11-byte space-padded short name, not null-terminated on disk
    pub name: [u8; 11],

    /// Raw attribute bitmask
    pub attr: u8,

    /// High 16 bits of the first cluster number
    pub cluster_high: u16,

    /// Low 16 bits of the first cluster number
    pub cluster_low: u16,

    /// File size in bytes (meaningless for directories)
    pub size: u32,
}

impl DirEntry {
    /// Fresh entry with the given packed name and attribute byte
    pub fn new(name: [u8; 11], attr: u8) -> Self {
        Self {
            name,
            attr,
            cluster_high: 0,
            cluster_low: 0,
            size: 0,
        }
    }

    /// Decode from a raw 32-byte slot
    pub fn decode(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let mut name = [0u8; 11];
        name.copy_from_slice(&raw[0..11]);

        Self {
            name,
            attr: raw[11],
            cluster_high: u16::from_le_bytes([raw[20], raw[21]]),
            cluster_low: u16::from_le_bytes([raw[26], raw[27]]),
            size: u32::from_le_bytes([raw[28], raw[29], raw[30], raw[31]]),
        }
    }

    /// Encode to a raw 32-byte slot (timestamp fields zeroed)
    pub fn encode(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut raw = [0u8; DIR_ENTRY_SIZE];
        raw[0..11].copy_from_slice(&self.name);
        raw[11] = self.attr;
        raw[20..22].copy_from_slice(&self.cluster_high.to_le_bytes());
        raw[26..28].copy_from_slice(&self.cluster_low.to_le_bytes());
        raw[28..32].copy_from_slice(&self.size.to_le_bytes());
        raw
    }

    /// True iff this slot ends the directory (this and following slots unused)
    pub fn is_end_of_directory(&self) -> bool {
        self.name[0] == ENTRY_END_OF_DIRECTORY
    }

    /// True iff this slot was deleted and may be reused
    pub fn is_free(&self) -> bool {
        self.name[0] == ENTRY_DELETED
    }

    /// True iff this slot is part of a long-name sequence
    pub fn is_long_name(&self) -> bool {
        self.attr & ATTR_LONG_NAME == ATTR_LONG_NAME
    }

    /// Decoded attribute bits
    pub fn attributes(&self) -> Attributes {
        Attributes::from_raw(self.attr)
    }

    /// What this entry denotes
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_raw(self.attr)
    }

    /// First cluster number, reassembled from its two halves
    pub fn first_cluster(&self) -> u32 {
        ((self.cluster_high as u32) << 16) | self.cluster_low as u32
    }

    /// Store a first cluster number into the two halves
    pub fn set_first_cluster(&mut self, cluster: u32) {
        self.cluster_high = (cluster >> 16) as u16;
        self.cluster_low = (cluster & 0xFFFF) as u16;
    }
}

/// Decode the 32-byte record at a raw byte offset.
pub fn read_at<B: BlockIo>(block_io: &mut B, offset: u64) -> Result<DirEntry> {
    let mut raw = [0u8; DIR_ENTRY_SIZE];
    device::read_at(block_io, offset, &mut raw)?;
    Ok(DirEntry::decode(&raw))
}

/// Encode a record into the 32-byte slot at a raw byte offset.
pub fn write_at<B: BlockIo>(block_io: &mut B, offset: u64, entry: &DirEntry) -> Result<()> {
    device::write_at(block_io, offset, &entry.encode())
}

/// Mark the slot at a raw byte offset deleted.
///
/// Only the first name byte is overwritten; the rest of the record stays.
pub fn mark_deleted_at<B: BlockIo>(block_io: &mut B, offset: u64) -> Result<()> {
    device::write_at(block_io, offset, &[ENTRY_DELETED])
}

/// Patch only the cluster halves and size of the slot at a raw byte offset.
///
/// Used by the write path to persist file growth without disturbing the
/// rest of the record.
pub fn update_cluster_and_size<B: BlockIo>(
    block_io: &mut B,
    offset: u64,
    first_cluster: u32,
    size: u32,
) -> Result<()> {
    let high = ((first_cluster >> 16) as u16).to_le_bytes();
    let low = ((first_cluster & 0xFFFF) as u16).to_le_bytes();
    device::write_at(block_io, offset + 20, &high)?;
    device::write_at(block_io, offset + 26, &low)?;
    device::write_at(block_io, offset + 28, &size.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ATTR_ARCHIVE, ATTR_DIRECTORY};

    #[test]
    fn decode_picks_fields_from_fixed_offsets() {
        let mut raw = [0u8; DIR_ENTRY_SIZE];
        raw[0..11].copy_from_slice(b"README  TXT");
        raw[11] = ATTR_ARCHIVE;
        raw[20..22].copy_from_slice(&0x0004u16.to_le_bytes());
        raw[26..28].copy_from_slice(&0x0321u16.to_le_bytes());
        raw[28..32].copy_from_slice(&1234u32.to_le_bytes());

        let entry = DirEntry::decode(&raw);
        assert_eq!(&entry.name, b"README  TXT");
        assert_eq!(entry.first_cluster(), 0x0004_0321);
        assert_eq!(entry.size, 1234);
        assert_eq!(entry.kind(), EntryKind::File);
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut entry = DirEntry::new(*b"SUB        ", ATTR_DIRECTORY);
        entry.set_first_cluster(0x0012_3456);
        entry.size = 0;

        let decoded = DirEntry::decode(&entry.encode());
        assert_eq!(decoded, entry);
        assert_eq!(decoded.kind(), EntryKind::Directory);
    }

    #[test]
    fn long_name_marker_detected() {
        let entry = DirEntry::new([0x41; 11], ATTR_LONG_NAME);
        assert!(entry.is_long_name());
        assert_eq!(entry.kind(), EntryKind::LongNamePart);
    }
}
