//! Boot-sector parsing and volume geometry
//!
//! The FAT32 boot sector occupies the first 512 bytes of the image and
//! fixes the geometry every other layer depends on: sector/cluster sizes,
//! the FAT region and the start of the data region.

pub mod format;

use crate::device;
use crate::error::{Fat32Error, Result};
use crate::types::{FAT_ENTRY_SIZE, FIRST_DATA_CLUSTER};
use gpt_disk_io::BlockIo;

/// Boot signature bytes at offsets 510/511
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// Parsed volume geometry (one per mounted image, immutable after mount)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDescriptor {
    /// Bytes per sector (offset 11)
    pub bytes_per_sector: u16,

    /// Sectors per cluster (offset 13)
    pub sectors_per_cluster: u8,

    /// Reserved sectors before the first FAT (offset 14)
    pub reserved_sectors: u16,

    /// Number of FAT copies (offset 16)
    pub num_fats: u8,

    /// Sectors per FAT (offset 36)
    pub sectors_per_fat: u32,

    /// Root directory cluster, normally 2 (offset 44)
    pub root_cluster: u32,

    /// Total sectors, from the 16-bit field if nonzero else the 32-bit field
    pub total_sectors: u32,

    /// Derived: clusters in the data region
    pub total_data_clusters: u32,

    /// Derived: chain-link entries each FAT copy can hold
    pub entries_per_fat: u32,

    /// Derived: byte offset where the data region starts
    pub data_region_start: u64,

    /// Image size in bytes, from the device
    pub image_size: u64,
}

impl VolumeDescriptor {
    /// Cluster size in bytes
    pub fn cluster_size(&self) -> u32 {
        self.bytes_per_sector as u32 * self.sectors_per_cluster as u32
    }

    /// Byte offset of the first byte of a data cluster
    pub fn cluster_offset(&self, cluster: u32) -> u64 {
        self.data_region_start
            + (cluster - FIRST_DATA_CLUSTER) as u64 * self.cluster_size() as u64
    }

    /// Byte offset of a cluster's chain-link entry in the first FAT copy
    pub fn fat_entry_offset(&self, cluster: u32) -> u64 {
        self.reserved_sectors as u64 * self.bytes_per_sector as u64
            + cluster as u64 * FAT_ENTRY_SIZE
    }

    /// Whether `cluster` lies in the valid data range `[2, totalDataClusters + 1]`
    pub fn is_valid_cluster(&self, cluster: u32) -> bool {
        cluster >= FIRST_DATA_CLUSTER && cluster < FIRST_DATA_CLUSTER + self.total_data_clusters
    }
}

fn read_u8<B: BlockIo>(block_io: &mut B, offset: u64) -> Result<u8> {
    let mut buf = [0u8; 1];
    device::read_at(block_io, offset, &mut buf)?;
    Ok(buf[0])
}

fn read_u16<B: BlockIo>(block_io: &mut B, offset: u64) -> Result<u16> {
    let mut buf = [0u8; 2];
    device::read_at(block_io, offset, &mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<B: BlockIo>(block_io: &mut B, offset: u64) -> Result<u32> {
    let mut buf = [0u8; 4];
    device::read_at(block_io, offset, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Mount a FAT32 volume from a block device
///
/// Reads each boot-sector field with its own positioned read and derives
/// the geometry the rest of the engine uses. The image's own geometry
/// fields are never rewritten.
///
/// # Errors
/// [`Fat32Error::Io`] on a short read; [`Fat32Error::CorruptVolume`] when
/// the boot signature is missing or a geometry field would divide by zero.
pub fn mount<B: BlockIo>(block_io: &mut B) -> Result<VolumeDescriptor> {
    let mut signature = [0u8; 2];
    device::read_at(block_io, 510, &mut signature)?;
    if signature != BOOT_SIGNATURE {
        return Err(Fat32Error::CorruptVolume);
    }

    let bytes_per_sector = read_u16(block_io, 11)?;
    let sectors_per_cluster = read_u8(block_io, 13)?;
    let reserved_sectors = read_u16(block_io, 14)?;
    let num_fats = read_u8(block_io, 16)?;
    let total_sectors_16 = read_u16(block_io, 19)?;
    let total_sectors_32 = read_u32(block_io, 32)?;
    let sectors_per_fat = read_u32(block_io, 36)?;
    let root_cluster = read_u32(block_io, 44)?;

    if bytes_per_sector == 0 || sectors_per_cluster == 0 || num_fats == 0 {
        return Err(Fat32Error::CorruptVolume);
    }

    let total_sectors = if total_sectors_16 != 0 {
        total_sectors_16 as u32
    } else {
        total_sectors_32
    };

    let fat_region_sectors = num_fats as u32 * sectors_per_fat;
    let overhead = reserved_sectors as u32 + fat_region_sectors;
    if total_sectors <= overhead {
        return Err(Fat32Error::CorruptVolume);
    }

    let total_data_clusters = (total_sectors - overhead) / sectors_per_cluster as u32;
    let entries_per_fat = sectors_per_fat * bytes_per_sector as u32 / FAT_ENTRY_SIZE as u32;
    let data_region_start = bytes_per_sector as u64 * overhead as u64;
    let image_size = device::size_bytes(block_io)?;

    Ok(VolumeDescriptor {
        bytes_per_sector,
        sectors_per_cluster,
        reserved_sectors,
        num_fats,
        sectors_per_fat,
        root_cluster,
        total_sectors,
        total_data_clusters,
        entries_per_fat,
        data_region_start,
        image_size,
    })
}
