//! Cursor-based file I/O across cluster chains
//!
//! A logical byte offset inside a file maps to a physical disk offset by
//! dividing by the cluster size and walking that many FAT links from the
//! file's first cluster. Read and write share this mapping so the two
//! paths cannot drift apart.

pub mod handle;

pub use handle::FileHandle;

use alloc::vec;
use alloc::vec::Vec;

use crate::device;
use crate::directory::record;
use crate::error::{Fat32Error, Result};
use crate::fat;
use crate::volume::VolumeDescriptor;
use gpt_disk_io::BlockIo;

/// Read up to `max_bytes` from the handle's cursor position.
///
/// The request is clamped to the bytes remaining before end of file. The
/// cursor advances by the number of bytes returned.
///
/// # Errors
/// [`Fat32Error::AccessMode`] when the handle is not read-enabled,
/// [`Fat32Error::EndOfFile`] when the cursor is already at the size,
/// [`Fat32Error::Io`] when the chain ends before the size says it should.
pub fn read<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    handle: &mut FileHandle,
    max_bytes: usize,
) -> Result<Vec<u8>> {
    if !handle.mode.can_read() {
        return Err(Fat32Error::AccessMode);
    }
    if handle.cursor >= handle.size {
        return Err(Fat32Error::EndOfFile);
    }

    let remaining_in_file = (handle.size - handle.cursor) as u64;
    let len = remaining_in_file.min(max_bytes as u64) as usize;
    let cluster_size = volume.cluster_size();

    let hops = handle.cursor / cluster_size;
    let mut cluster = fat::nth_cluster(block_io, volume, handle.start_cluster, hops)?
        .ok_or(Fat32Error::Io)?;

    let mut out = vec![0u8; len];
    let mut filled = 0usize;
    while filled < len {
        let within = handle.cursor % cluster_size;
        let chunk = ((cluster_size - within) as usize).min(len - filled);

        device::read_at(
            block_io,
            volume.cluster_offset(cluster) + within as u64,
            &mut out[filled..filled + chunk],
        )?;
        filled += chunk;
        handle.cursor += chunk as u32;

        if filled < len {
            cluster = fat::next_cluster(block_io, volume, cluster)?.ok_or(Fat32Error::Io)?;
        }
    }

    Ok(out)
}

/// Write `data` at the handle's cursor position, growing the file.
///
/// Crossing into a cluster with no successor allocates a fresh cluster and
/// links it before continuing. Allocation failure mid-write surfaces as
/// [`Fat32Error::NoSpace`] with the already-written prefix committed;
/// writes are not transactional. On success the handle's grown size and
/// first cluster are persisted to the file's directory entry.
pub fn write<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    handle: &mut FileHandle,
    data: &[u8],
) -> Result<()> {
    if !handle.mode.can_write() {
        return Err(Fat32Error::AccessMode);
    }
    if data.is_empty() {
        return Ok(());
    }

    let cluster_size = volume.cluster_size();

    // An empty file has no chain yet; claim its first cluster now.
    if !volume.is_valid_cluster(handle.start_cluster) {
        handle.start_cluster = fat::allocate(block_io, volume)?;
        record::update_cluster_and_size(
            block_io,
            handle.entry_offset,
            handle.start_cluster,
            handle.size,
        )?;
    }

    let mut cluster = handle.start_cluster;
    for _ in 0..handle.cursor / cluster_size {
        cluster = match fat::next_cluster(block_io, volume, cluster)? {
            Some(next) => next,
            None => {
                let grown = fat::allocate(block_io, volume)?;
                fat::link(block_io, volume, cluster, grown)?;
                grown
            }
        };
    }

    let mut written = 0usize;
    while written < data.len() {
        let within = handle.cursor % cluster_size;
        let chunk = ((cluster_size - within) as usize).min(data.len() - written);

        device::write_at(
            block_io,
            volume.cluster_offset(cluster) + within as u64,
            &data[written..written + chunk],
        )?;
        written += chunk;
        handle.cursor += chunk as u32;
        if handle.cursor > handle.size {
            handle.size = handle.cursor;
        }

        if written < data.len() {
            cluster = match fat::next_cluster(block_io, volume, cluster)? {
                Some(next) => next,
                None => {
                    let grown = fat::allocate(block_io, volume)?;
                    fat::link(block_io, volume, cluster, grown)?;
                    grown
                }
            };
        }
    }

    record::update_cluster_and_size(
        block_io,
        handle.entry_offset,
        handle.start_cluster,
        handle.size,
    )
}
