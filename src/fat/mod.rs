//! FAT chain-link entries, chain walking and cluster allocation
//!
//! The FAT is a flat on-disk array mapping each cluster number to its
//! successor. This module is the only place that computes FAT byte
//! offsets; chain-walking code everywhere else goes through
//! [`next_cluster`] and [`link`].

use crate::device;
use crate::error::{Fat32Error, Result};
use crate::types::{END_OF_CHAIN, END_OF_CHAIN_MIN, FAT_ENTRY_MASK, FIRST_DATA_CLUSTER, FREE_CLUSTER};
use crate::volume::VolumeDescriptor;
use gpt_disk_io::BlockIo;

/// Read a cluster's chain-link entry, masked to its 28 significant bits.
///
/// Reads the first FAT copy. Callers must validate `cluster` is in range;
/// out-of-range access is a caller contract violation.
pub fn read_entry<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
) -> Result<u32> {
    let mut buf = [0u8; 4];
    device::read_at(block_io, volume.fat_entry_offset(cluster), &mut buf)?;
    Ok(u32::from_le_bytes(buf) & FAT_ENTRY_MASK)
}

/// Write a cluster's chain-link entry, mirrored to every FAT copy.
pub fn write_entry<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
    value: u32,
) -> Result<()> {
    let bytes = (value & FAT_ENTRY_MASK).to_le_bytes();
    let copy_stride = volume.sectors_per_fat as u64 * volume.bytes_per_sector as u64;
    let first = volume.fat_entry_offset(cluster);

    for fat_num in 0..volume.num_fats as u64 {
        device::write_at(block_io, first + fat_num * copy_stride, &bytes)?;
    }
    Ok(())
}

/// Link `cluster` to `next` in the chain.
pub fn link<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
    next: u32,
) -> Result<()> {
    write_entry(block_io, volume, cluster, next)
}

/// Successor of `cluster` in its chain, or `None` at end-of-chain.
///
/// Also returns `None` when `cluster` is outside the data region or its
/// entry does not point at a valid cluster, so walkers terminate on
/// corrupt chains instead of wandering. Performs one FAT read per call.
pub fn next_cluster<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
) -> Result<Option<u32>> {
    if !volume.is_valid_cluster(cluster) {
        return Ok(None);
    }

    let entry = read_entry(block_io, volume, cluster)?;
    if entry >= END_OF_CHAIN_MIN || !volume.is_valid_cluster(entry) {
        return Ok(None);
    }
    Ok(Some(entry))
}

/// Walk `hops` links from `start`; `None` when the chain ends first.
///
/// File I/O locates the cluster holding byte offset `n` by dividing by the
/// cluster size and stepping that many links (never by arithmetic on the
/// start cluster number).
pub fn nth_cluster<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    start: u32,
    hops: u32,
) -> Result<Option<u32>> {
    let mut cluster = start;
    for _ in 0..hops {
        match next_cluster(block_io, volume, cluster)? {
            Some(next) => cluster = next,
            None => return Ok(None),
        }
    }
    Ok(Some(cluster))
}

/// Claim the first free cluster and mark it end-of-chain.
///
/// Linear scan over the data region, one FAT read per candidate. Callers
/// issue one call per needed cluster; batching is out of scope.
pub fn allocate<B: BlockIo>(block_io: &mut B, volume: &VolumeDescriptor) -> Result<u32> {
    let end = FIRST_DATA_CLUSTER + volume.total_data_clusters;
    for cluster in FIRST_DATA_CLUSTER..end {
        if read_entry(block_io, volume, cluster)? == FREE_CLUSTER {
            write_entry(block_io, volume, cluster, END_OF_CHAIN)?;
            return Ok(cluster);
        }
    }
    Err(Fat32Error::NoSpace)
}

/// Release a whole chain, zeroing each entry back to free.
pub fn free_chain<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    start: u32,
) -> Result<()> {
    let mut cluster = start;
    while volume.is_valid_cluster(cluster) {
        let next = read_entry(block_io, volume, cluster)?;
        write_entry(block_io, volume, cluster, FREE_CLUSTER)?;
        if next >= END_OF_CHAIN_MIN {
            break;
        }
        cluster = next;
    }
    Ok(())
}
