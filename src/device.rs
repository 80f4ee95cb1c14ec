//! Positioned byte-level access over a block device
//!
//! Every other layer addresses the image by absolute byte offset; this
//! module hides the LBA arithmetic. Sub-sector writes are read-modify-write
//! against a sector bounce buffer.

use crate::error::{Fat32Error, Result};
use crate::types::SECTOR_SIZE;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Read exactly `buf.len()` bytes at the given byte offset.
///
/// A transfer the device cannot satisfy in full surfaces as [`Fat32Error::Io`].
pub fn read_at<B: BlockIo>(block_io: &mut B, offset: u64, buf: &mut [u8]) -> Result<()> {
    let mut sector = [0u8; SECTOR_SIZE];
    let mut lba = offset / SECTOR_SIZE as u64;
    let mut within = (offset % SECTOR_SIZE as u64) as usize;
    let mut filled = 0usize;

    while filled < buf.len() {
        block_io
            .read_blocks(Lba(lba), &mut sector)
            .map_err(|_| Fat32Error::Io)?;

        let take = (SECTOR_SIZE - within).min(buf.len() - filled);
        buf[filled..filled + take].copy_from_slice(&sector[within..within + take]);
        filled += take;
        within = 0;
        lba += 1;
    }

    Ok(())
}

/// Write exactly `data.len()` bytes at the given byte offset.
///
/// Partial sectors are read back first so surrounding bytes are preserved.
pub fn write_at<B: BlockIo>(block_io: &mut B, offset: u64, data: &[u8]) -> Result<()> {
    let mut sector = [0u8; SECTOR_SIZE];
    let mut lba = offset / SECTOR_SIZE as u64;
    let mut within = (offset % SECTOR_SIZE as u64) as usize;
    let mut written = 0usize;

    while written < data.len() {
        let take = (SECTOR_SIZE - within).min(data.len() - written);

        if take < SECTOR_SIZE {
            block_io
                .read_blocks(Lba(lba), &mut sector)
                .map_err(|_| Fat32Error::Io)?;
        }
        sector[within..within + take].copy_from_slice(&data[written..written + take]);

        block_io
            .write_blocks(Lba(lba), &sector)
            .map_err(|_| Fat32Error::Io)?;

        written += take;
        within = 0;
        lba += 1;
    }

    Ok(())
}

/// Total device size in bytes.
pub fn size_bytes<B: BlockIo>(block_io: &mut B) -> Result<u64> {
    let blocks = block_io.num_blocks().map_err(|_| Fat32Error::Io)?;
    Ok(blocks * SECTOR_SIZE as u64)
}
