//! FAT32 volume formatter
//!
//! Lays down a fresh, empty FAT32 volume: boot sector (plus backup copy),
//! FSInfo sector, zeroed FAT copies with the reserved entries and the root
//! cluster marked end-of-chain, and a zeroed root directory cluster.

use crate::device;
use crate::error::{Fat32Error, Result};
use crate::types::SECTOR_SIZE;
use gpt_disk_io::BlockIo;

const RESERVED_SECTORS: u16 = 32;
const NUM_FATS: u8 = 2;
const ROOT_CLUSTER: u32 = 2;

/// FAT size in sectors, from the Microsoft sizing formula.
fn calculate_fat_size(total_sectors: u32, sectors_per_cluster: u8) -> u32 {
    let tmp1 = total_sectors - RESERVED_SECTORS as u32;
    let tmp2 = (256 * sectors_per_cluster as u32 + NUM_FATS as u32) / 2;
    tmp1.div_ceil(tmp2)
}

fn build_boot_sector(total_sectors: u32, sectors_per_cluster: u8, fat_size: u32) -> [u8; SECTOR_SIZE] {
    let mut bs = [0u8; SECTOR_SIZE];

    bs[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]); // JMP short + NOP
    bs[3..11].copy_from_slice(b"FAT32RS ");
    bs[11..13].copy_from_slice(&(SECTOR_SIZE as u16).to_le_bytes());
    bs[13] = sectors_per_cluster;
    bs[14..16].copy_from_slice(&RESERVED_SECTORS.to_le_bytes());
    bs[16] = NUM_FATS;
    // root_entry_count, total_sectors_16 and fat_size_16 stay 0 on FAT32
    bs[21] = 0xF8; // hard-disk media descriptor
    bs[24..26].copy_from_slice(&63u16.to_le_bytes()); // sectors per track
    bs[26..28].copy_from_slice(&255u16.to_le_bytes()); // heads
    bs[32..36].copy_from_slice(&total_sectors.to_le_bytes());
    bs[36..40].copy_from_slice(&fat_size.to_le_bytes());
    bs[44..48].copy_from_slice(&ROOT_CLUSTER.to_le_bytes());
    bs[48..50].copy_from_slice(&1u16.to_le_bytes()); // FSInfo sector
    bs[50..52].copy_from_slice(&6u16.to_le_bytes()); // backup boot sector
    bs[64] = 0x80; // drive number
    bs[66] = 0x29; // extended boot signature
    bs[67..71].copy_from_slice(&0x1234_5678u32.to_le_bytes()); // volume serial
    bs[71..82].copy_from_slice(b"NO NAME    ");
    bs[82..90].copy_from_slice(b"FAT32   ");
    bs[510] = 0x55;
    bs[511] = 0xAA;

    bs
}

fn build_fsinfo(free_count: u32) -> [u8; SECTOR_SIZE] {
    let mut fsinfo = [0u8; SECTOR_SIZE];

    fsinfo[0..4].copy_from_slice(&0x4161_5252u32.to_le_bytes());
    fsinfo[484..488].copy_from_slice(&0x6141_7272u32.to_le_bytes());
    fsinfo[488..492].copy_from_slice(&free_count.to_le_bytes());
    fsinfo[492..496].copy_from_slice(&3u32.to_le_bytes()); // next free hint
    fsinfo[508..512].copy_from_slice(&0xAA55_0000u32.to_le_bytes());

    fsinfo
}

/// Format the whole device as an empty FAT32 volume.
///
/// Uses 32 reserved sectors and two FAT copies. The root directory is a
/// single zeroed cluster at cluster 2. Every FAT sector is zeroed, so any
/// previous contents of the device are unreachable afterwards.
///
/// # Errors
/// [`Fat32Error::ImageTooSmall`] when the device cannot hold the reserved
/// region, both FATs and at least one data cluster.
pub fn format_volume<B: BlockIo>(block_io: &mut B, sectors_per_cluster: u8) -> Result<()> {
    let total = device::size_bytes(block_io)? / SECTOR_SIZE as u64;
    if sectors_per_cluster == 0 || total > u32::MAX as u64 {
        return Err(Fat32Error::ImageTooSmall);
    }
    let total_sectors = total as u32;
    if total_sectors <= RESERVED_SECTORS as u32 + sectors_per_cluster as u32 {
        return Err(Fat32Error::ImageTooSmall);
    }

    let fat_size = calculate_fat_size(total_sectors, sectors_per_cluster);
    let overhead = RESERVED_SECTORS as u32 + NUM_FATS as u32 * fat_size;
    if total_sectors <= overhead + sectors_per_cluster as u32 {
        return Err(Fat32Error::ImageTooSmall);
    }
    let cluster_count = (total_sectors - overhead) / sectors_per_cluster as u32;

    let boot = build_boot_sector(total_sectors, sectors_per_cluster, fat_size);
    device::write_at(block_io, 0, &boot)?;
    device::write_at(block_io, 6 * SECTOR_SIZE as u64, &boot)?;

    let fsinfo = build_fsinfo(cluster_count - 1); // root cluster is taken
    device::write_at(block_io, SECTOR_SIZE as u64, &fsinfo)?;

    // First FAT sector: media entry, reserved entry, root cluster end-of-chain
    let mut first_fat = [0u8; SECTOR_SIZE];
    first_fat[0..4].copy_from_slice(&0xFFFF_FFF8u32.to_le_bytes());
    first_fat[4..8].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    first_fat[8..12].copy_from_slice(&0x0FFF_FFF8u32.to_le_bytes());

    let zero = [0u8; SECTOR_SIZE];
    for fat_num in 0..NUM_FATS as u32 {
        let fat_start = (RESERVED_SECTORS as u64 + (fat_num * fat_size) as u64)
            * SECTOR_SIZE as u64;
        device::write_at(block_io, fat_start, &first_fat)?;
        for sector in 1..fat_size as u64 {
            device::write_at(block_io, fat_start + sector * SECTOR_SIZE as u64, &zero)?;
        }
    }

    // Empty root directory cluster
    let root_start = overhead as u64 * SECTOR_SIZE as u64;
    for sector in 0..sectors_per_cluster as u64 {
        device::write_at(block_io, root_start + sector * SECTOR_SIZE as u64, &zero)?;
    }

    block_io.flush().map_err(|_| Fat32Error::Io)?;
    Ok(())
}
