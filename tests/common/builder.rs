use crate::common::MemoryBlockDevice;

use fat32::{format_volume, Session};

/// 2 MiB image: 4096 sectors, 1 sector per cluster, 4000 data clusters
pub const DEFAULT_SECTORS: usize = 4096;

/// Cramped image with only a handful of data clusters, for exhaustion tests
pub const TINY_SECTORS: usize = 40;

/// Format a fresh in-memory volume
pub fn formatted_device(sectors: usize) -> MemoryBlockDevice {
    let mut device = MemoryBlockDevice::zeroed(sectors);
    format_volume(&mut device, 1).expect("format succeeds");
    device
}

/// Format a fresh volume and mount a session on it
pub fn formatted_session() -> Session<MemoryBlockDevice> {
    Session::mount(formatted_device(DEFAULT_SECTORS)).expect("mount succeeds")
}
