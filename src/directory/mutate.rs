//! Directory mutators: create/remove files and subdirectories
//!
//! Entries are marked deleted in place, never compacted. A directory whose
//! chain has no free slot left is extended by one freshly zeroed cluster.

use alloc::vec;

use crate::device;
use crate::directory::{find_entry, index, name, record};
use crate::directory::record::DirEntry;
use crate::error::{Fat32Error, Result};
use crate::fat;
use crate::types::{
    ATTR_ARCHIVE, ATTR_DIRECTORY, DIR_ENTRY_SIZE, ENTRY_DELETED, ENTRY_END_OF_DIRECTORY,
};
use crate::volume::VolumeDescriptor;
use gpt_disk_io::BlockIo;

fn zero_cluster<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    cluster: u32,
) -> Result<()> {
    let zeroes = vec![0u8; volume.cluster_size() as usize];
    device::write_at(block_io, volume.cluster_offset(cluster), &zeroes)
}

/// Byte offset of the first reusable slot in the directory chain.
///
/// Reusable means end-of-directory or deleted. When the whole chain is
/// occupied, a new cluster is allocated, zeroed and linked in, and its
/// first slot is returned.
fn find_free_slot<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
) -> Result<u64> {
    let cluster_size = volume.cluster_size() as usize;
    let mut buf = vec![0u8; cluster_size];

    let mut current = dir_cluster;
    loop {
        let base = volume.cluster_offset(current);
        device::read_at(block_io, base, &mut buf)?;

        for slot in 0..cluster_size / DIR_ENTRY_SIZE {
            let first_byte = buf[slot * DIR_ENTRY_SIZE];
            if first_byte == ENTRY_END_OF_DIRECTORY || first_byte == ENTRY_DELETED {
                return Ok(base + (slot * DIR_ENTRY_SIZE) as u64);
            }
        }

        match fat::next_cluster(block_io, volume, current)? {
            Some(next) => current = next,
            None => {
                let extension = fat::allocate(block_io, volume)?;
                zero_cluster(block_io, volume, extension)?;
                fat::link(block_io, volume, current, extension)?;
                return Ok(volume.cluster_offset(extension));
            }
        }
    }
}

/// Create an empty file entry in the directory at `dir_cluster`.
///
/// The entry starts with no cluster; the first write allocates one and
/// records it.
pub fn create_file<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
    file_name: &str,
) -> Result<()> {
    let packed = name::pack(file_name)?;
    if find_entry(block_io, volume, dir_cluster, file_name)?.is_some() {
        return Err(Fat32Error::AlreadyExists);
    }

    let slot = find_free_slot(block_io, volume, dir_cluster)?;
    record::write_at(block_io, slot, &DirEntry::new(packed, ATTR_ARCHIVE))
}

/// Remove an entry by name: mark its slot deleted and release its chain.
pub fn remove_file<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
    file_name: &str,
) -> Result<()> {
    let located =
        find_entry(block_io, volume, dir_cluster, file_name)?.ok_or(Fat32Error::NotFound)?;

    record::mark_deleted_at(block_io, located.offset)?;

    let first = located.entry.first_cluster();
    if volume.is_valid_cluster(first) {
        fat::free_chain(block_io, volume, first)?;
    }
    Ok(())
}

/// Create a subdirectory: one fresh cluster holding `.` and `..`, plus a
/// directory-typed entry in the parent.
pub fn make_directory<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
    dir_name: &str,
) -> Result<()> {
    let packed = name::pack(dir_name)?;
    if find_entry(block_io, volume, dir_cluster, dir_name)?.is_some() {
        return Err(Fat32Error::AlreadyExists);
    }

    let new_cluster = fat::allocate(block_io, volume)?;
    zero_cluster(block_io, volume, new_cluster)?;

    // `.` and `..` are two independent records: the first points at the
    // new directory itself, the second at the parent.
    let mut dot = DirEntry::new(name::DOT, ATTR_DIRECTORY);
    dot.set_first_cluster(new_cluster);

    let mut dot_dot = DirEntry::new(name::DOT_DOT, ATTR_DIRECTORY);
    dot_dot.set_first_cluster(dir_cluster);

    let base = volume.cluster_offset(new_cluster);
    record::write_at(block_io, base, &dot)?;
    record::write_at(block_io, base + DIR_ENTRY_SIZE as u64, &dot_dot)?;

    let mut parent_entry = DirEntry::new(packed, ATTR_DIRECTORY);
    parent_entry.set_first_cluster(new_cluster);

    let slot = find_free_slot(block_io, volume, dir_cluster)?;
    record::write_at(block_io, slot, &parent_entry)
}

/// Remove a subdirectory if it holds nothing but `.` and `..`.
///
/// The emptiness check runs before any mutation; a directory with a live
/// entry is left untouched.
pub fn remove_directory<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
    dir_name: &str,
) -> Result<()> {
    let located =
        find_entry(block_io, volume, dir_cluster, dir_name)?.ok_or(Fat32Error::NotFound)?;

    if located.entry.kind() != crate::types::EntryKind::Directory {
        return Err(Fat32Error::NotADirectory);
    }

    let target = located.entry.first_cluster();
    if volume.is_valid_cluster(target) {
        let entries = index::load(block_io, volume, target)?;
        let occupied = entries
            .iter()
            .any(|e| e.entry.name != name::DOT && e.entry.name != name::DOT_DOT);
        if occupied {
            return Err(Fat32Error::NotEmpty);
        }
    }

    record::mark_deleted_at(block_io, located.offset)?;
    if volume.is_valid_cluster(target) {
        fat::free_chain(block_io, volume, target)?;
    }
    Ok(())
}
