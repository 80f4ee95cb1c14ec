//! FAT32 Volume Engine
//!
//! A `no_std` implementation of the FAT32 on-disk format that reads and
//! mutates a volume image directly at raw sector/cluster offsets, without
//! going through a host filesystem driver.
//!
//! # Overview
//!
//! The crate provides:
//! - Boot-sector parsing into an immutable volume descriptor
//! - FAT chain walking, allocation and reclamation
//! - 8.3 short-name directory entry decoding/encoding
//! - Path resolution, directory listing, mkdir/rmdir
//! - File create/delete and cursor-based byte-range read/write
//! - A session facade holding navigation state and the open-file table
//!
//! Long file names, timestamps, permissions and FAT12/16 are out of scope;
//! only 8.3 short-name entries are surfaced.
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Device layer** - positioned byte reads/writes over `BlockIo`
//! 2. **Volume layer** - boot-sector geometry (`VolumeDescriptor`)
//! 3. **FAT layer** - chain-link entries, walker, allocator
//! 4. **Directory layer** - entry codec, index, path resolver, mutators
//! 5. **File layer** - open handles mapping logical offsets to clusters
//! 6. **Session layer** - one context struct owning device + state
//!
//! # Usage
//!
//! ```ignore
//! use fat32::{OpenMode, Session};
//!
//! // Mount a FAT32 image exposed as a block device
//! let mut session = Session::mount(block_io)?;
//!
//! session.create_file("NOTES.TXT")?;
//! session.open("NOTES.TXT", OpenMode::Write)?;
//! session.write("NOTES.TXT", b"hello")?;
//! session.close("NOTES.TXT")?;
//! ```
//!
//! The crate assumes 512-byte device blocks. None of the mutating
//! operations are safe to call concurrently from multiple threads without
//! external serialization; a session is a single logical actor. Writes are
//! not transactional: a write that fails mid-flight after allocating
//! clusters leaves those clusters linked (at-least-partial-effect).

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod device;
pub mod directory;
pub mod error;
pub mod fat;
pub mod file;
pub mod session;
pub mod types;
pub mod volume;

pub use error::{Fat32Error, Result};
pub use types::{Attributes, EntryKind, OpenMode};

// High-level API exports
pub use directory::record::DirEntry;
pub use session::Session;
pub use volume::format::format_volume;
pub use volume::{mount, VolumeDescriptor};
