//! Session facade: one context struct per mounted image
//!
//! Owns the block device, the volume descriptor, the navigation state
//! (current directory cluster, ancestor stack, textual path) and the
//! open-file table. Each method maps 1:1 to a command of the external
//! dispatcher (`ls`, `cd`, `mkdir`, `open`, ...). A session is a single
//! logical actor: nothing here is safe to drive from multiple threads
//! without external serialization.

use alloc::string::String;
use alloc::vec::Vec;

use crate::directory::{self, index, mutate, name};
use crate::error::{Fat32Error, Result};
use crate::file::{self, FileHandle};
use crate::types::{EntryKind, OpenMode};
use crate::volume::{self, VolumeDescriptor};
use gpt_disk_io::BlockIo;

/// A mounted FAT32 volume plus all per-session mutable state
pub struct Session<B: BlockIo> {
    device: B,
    volume: VolumeDescriptor,
    current_cluster: u32,
    ancestors: Vec<u32>,
    path_components: Vec<String>,
    open_files: Vec<FileHandle>,
}

impl<B: BlockIo> Session<B> {
    /// Mount the volume on `device` and start a session at the root.
    pub fn mount(mut device: B) -> Result<Self> {
        let volume = volume::mount(&mut device)?;
        let current_cluster = volume.root_cluster;
        Ok(Self {
            device,
            volume,
            current_cluster,
            ancestors: Vec::new(),
            path_components: Vec::new(),
            open_files: Vec::new(),
        })
    }

    /// Volume geometry, for `info`-style reporting.
    pub fn volume(&self) -> &VolumeDescriptor {
        &self.volume
    }

    /// Cluster of the current directory.
    pub fn current_cluster(&self) -> u32 {
        self.current_cluster
    }

    /// Textual current path, `/` for the root.
    pub fn current_path(&self) -> String {
        if self.path_components.is_empty() {
            return String::from("/");
        }
        let mut path = String::new();
        for component in &self.path_components {
            path.push('/');
            path.push_str(component);
        }
        path
    }

    /// Release the session, handing the device back.
    pub fn into_device(self) -> B {
        self.device
    }

    fn resolve_start(&self, path: &str) -> u32 {
        if path.starts_with('/') {
            self.volume.root_cluster
        } else {
            self.current_cluster
        }
    }

    /// List the entries of `path` (empty path: the current directory) in
    /// on-disk order.
    pub fn list(&mut self, path: &str) -> Result<Vec<String>> {
        let start = self.resolve_start(path);
        let cluster = directory::resolve(&mut self.device, &self.volume, start, path)?;
        let entries = index::load(&mut self.device, &self.volume, cluster)?;
        Ok(entries
            .iter()
            .map(|located| name::display(&located.entry.name))
            .collect())
    }

    /// Change the current directory.
    ///
    /// `..` pops the ancestor stack (a no-op at the root), `.` stays put,
    /// anything else must name a subdirectory. On failure the navigation
    /// state is left unchanged.
    pub fn change_dir(&mut self, path: &str) -> Result<()> {
        let mut cluster = self.resolve_start(path);
        let mut ancestors;
        let mut components;
        if path.starts_with('/') {
            ancestors = Vec::new();
            components = Vec::new();
        } else {
            ancestors = self.ancestors.clone();
            components = self.path_components.clone();
        }

        for part in path.split('/').filter(|c| !c.is_empty()) {
            match part {
                "." => {}
                ".." => {
                    if let Some(parent) = ancestors.pop() {
                        cluster = parent;
                        components.pop();
                    }
                }
                _ => {
                    let located =
                        directory::find_entry(&mut self.device, &self.volume, cluster, part)?
                            .ok_or(Fat32Error::NotFound)?;
                    if located.entry.kind() != EntryKind::Directory {
                        return Err(Fat32Error::NotADirectory);
                    }
                    ancestors.push(cluster);
                    components.push(name::display(&located.entry.name));
                    cluster = located.entry.first_cluster();
                }
            }
        }

        self.current_cluster = cluster;
        self.ancestors = ancestors;
        self.path_components = components;
        Ok(())
    }

    /// Create a subdirectory in the current directory.
    pub fn make_dir(&mut self, dir_name: &str) -> Result<()> {
        mutate::make_directory(&mut self.device, &self.volume, self.current_cluster, dir_name)
    }

    /// Remove an empty subdirectory of the current directory.
    pub fn remove_dir(&mut self, dir_name: &str) -> Result<()> {
        mutate::remove_directory(&mut self.device, &self.volume, self.current_cluster, dir_name)
    }

    /// Create an empty file in the current directory.
    pub fn create_file(&mut self, file_name: &str) -> Result<()> {
        mutate::create_file(&mut self.device, &self.volume, self.current_cluster, file_name)
    }

    /// Delete a file from the current directory.
    ///
    /// Fails with [`Fat32Error::InUse`] while a handle with that name is
    /// open.
    pub fn remove_file(&mut self, file_name: &str) -> Result<()> {
        let packed = name::pack(file_name)?;
        if self.open_files.iter().any(|h| h.short_name == packed) {
            return Err(Fat32Error::InUse);
        }
        mutate::remove_file(&mut self.device, &self.volume, self.current_cluster, file_name)
    }

    /// Open a file in the current directory.
    ///
    /// At most one handle per name; a second open fails with
    /// [`Fat32Error::AlreadyOpen`]. Directories and volume labels cannot
    /// be opened.
    pub fn open(&mut self, file_name: &str, mode: OpenMode) -> Result<()> {
        let packed = name::pack(file_name)?;
        if self.open_files.iter().any(|h| h.short_name == packed) {
            return Err(Fat32Error::AlreadyOpen);
        }

        let located =
            directory::find_entry(&mut self.device, &self.volume, self.current_cluster, file_name)?
                .ok_or(Fat32Error::NotFound)?;
        if located.entry.kind() != EntryKind::File {
            return Err(Fat32Error::AccessMode);
        }

        self.open_files
            .push(FileHandle::from_entry(name::display(&packed), &located, mode));
        Ok(())
    }

    /// Close the handle opened under `file_name`.
    pub fn close(&mut self, file_name: &str) -> Result<()> {
        let idx = self.handle_index(file_name)?;
        self.open_files.remove(idx);
        Ok(())
    }

    /// Read up to `max_bytes` from the named open handle.
    pub fn read(&mut self, file_name: &str, max_bytes: usize) -> Result<Vec<u8>> {
        let idx = self.handle_index(file_name)?;
        let Session {
            ref mut device,
            ref volume,
            ref mut open_files,
            ..
        } = *self;
        file::read(device, volume, &mut open_files[idx], max_bytes)
    }

    /// Write `data` through the named open handle.
    pub fn write(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        let idx = self.handle_index(file_name)?;
        let Session {
            ref mut device,
            ref volume,
            ref mut open_files,
            ..
        } = *self;
        file::write(device, volume, &mut open_files[idx], data)
    }

    fn handle_index(&self, file_name: &str) -> Result<usize> {
        let packed = name::pack(file_name).map_err(|_| Fat32Error::NotOpen)?;
        self.open_files
            .iter()
            .position(|h| h.short_name == packed)
            .ok_or(Fat32Error::NotOpen)
    }
}
