//! Directory index
//!
//! Loads every live entry of a directory (a cluster chain) into an
//! in-memory list in on-disk order. The index is a transient snapshot:
//! it is rebuilt on every call and must never be assumed valid across a
//! mutation of the underlying chain.

use alloc::vec;
use alloc::vec::Vec;

use crate::device;
use crate::directory::record::DirEntry;
use crate::error::Result;
use crate::fat;
use crate::types::DIR_ENTRY_SIZE;
use crate::volume::VolumeDescriptor;
use gpt_disk_io::BlockIo;

/// A decoded entry together with the byte offset of its 32-byte slot
#[derive(Debug, Clone, Copy)]
pub struct LocatedEntry {
    /// The decoded record
    pub entry: DirEntry,

    /// Absolute byte offset of the slot on disk
    pub offset: u64,
}

/// Load all valid entries of the directory starting at `cluster`.
///
/// Scans each cluster of the chain sequentially. The scan stops entirely
/// at the first end-of-directory marker anywhere in the chain; deleted
/// and long-name slots are skipped. The returned order is the listing
/// order.
pub fn load<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
) -> Result<Vec<LocatedEntry>> {
    let cluster_size = volume.cluster_size() as usize;
    let mut buf = vec![0u8; cluster_size];
    let mut entries = Vec::new();

    let mut current = Some(cluster);
    while let Some(c) = current {
        let base = volume.cluster_offset(c);
        device::read_at(block_io, base, &mut buf)?;

        for slot in 0..cluster_size / DIR_ENTRY_SIZE {
            let start = slot * DIR_ENTRY_SIZE;
            let mut raw = [0u8; DIR_ENTRY_SIZE];
            raw.copy_from_slice(&buf[start..start + DIR_ENTRY_SIZE]);

            let entry = DirEntry::decode(&raw);
            if entry.is_end_of_directory() {
                return Ok(entries);
            }
            if entry.is_free() || entry.is_long_name() {
                continue;
            }

            entries.push(LocatedEntry {
                entry,
                offset: base + start as u64,
            });
        }

        current = fat::next_cluster(block_io, volume, c)?;
    }

    Ok(entries)
}
