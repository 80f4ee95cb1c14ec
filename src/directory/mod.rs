//! Directory entries, index, path resolution and mutation

pub mod index;
pub mod mutate;
pub mod name;
pub mod record;

use alloc::vec::Vec;

use crate::error::{Fat32Error, Result};
use crate::types::{EntryKind, FIRST_DATA_CLUSTER};
use crate::volume::VolumeDescriptor;
use gpt_disk_io::BlockIo;

use self::index::LocatedEntry;

/// Look up `name` among the live entries of the directory at `dir_cluster`.
pub fn find_entry<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    dir_cluster: u32,
    name: &str,
) -> Result<Option<LocatedEntry>> {
    let entries = index::load(block_io, volume, dir_cluster)?;
    Ok(entries
        .into_iter()
        .find(|located| name::names_equal(&located.entry.name, name)))
}

/// Resolve a slash-separated path to a directory cluster.
///
/// The empty path (or one made only of separators) resolves to
/// `start_cluster` unchanged. Each component must name a directory in the
/// one before it: a match that is not a directory fails with
/// [`Fat32Error::NotADirectory`], a missing component with
/// [`Fat32Error::NotFound`].
pub fn resolve<B: BlockIo>(
    block_io: &mut B,
    volume: &VolumeDescriptor,
    start_cluster: u32,
    path: &str,
) -> Result<u32> {
    let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();

    let mut current = start_cluster;
    for component in components {
        let located = find_entry(block_io, volume, current, component)?
            .ok_or(Fat32Error::NotFound)?;

        if located.entry.kind() != EntryKind::Directory {
            return Err(Fat32Error::NotADirectory);
        }

        // A `..` entry pointing at the root is stored as cluster 0.
        let next = located.entry.first_cluster();
        current = if next < FIRST_DATA_CLUSTER {
            volume.root_cluster
        } else {
            next
        };
    }

    Ok(current)
}
