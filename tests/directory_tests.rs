//! Directory index, path resolution and mutation tests

mod common;

use common::builder::{formatted_device, DEFAULT_SECTORS};
use fat32::directory::{self, index, mutate, name};
use fat32::{fat, mount, EntryKind, Fat32Error};

#[test]
fn created_file_is_listed_and_findable() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "TEST").unwrap();

    let entries = index::load(&mut device, &volume, root).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(&entries[0].entry.name, b"TEST       ");
    assert_eq!(entries[0].entry.kind(), EntryKind::File);
    assert_eq!(entries[0].entry.size, 0);
    assert_eq!(entries[0].entry.first_cluster(), 0);

    let located = directory::find_entry(&mut device, &volume, root, "test")
        .unwrap()
        .expect("padded, case-insensitive lookup");
    assert_eq!(located.offset, entries[0].offset);
}

#[test]
fn create_rejects_duplicates_and_bad_names() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "TEST").unwrap();
    assert_eq!(
        mutate::create_file(&mut device, &volume, root, "TEST"),
        Err(Fat32Error::AlreadyExists)
    );
    assert_eq!(
        mutate::create_file(&mut device, &volume, root, "WAYTOOLONGNAME"),
        Err(Fat32Error::InvalidName)
    );
}

#[test]
fn remove_marks_slot_deleted_and_second_remove_fails() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "TEST").unwrap();
    let offset = directory::find_entry(&mut device, &volume, root, "TEST")
        .unwrap()
        .unwrap()
        .offset;

    mutate::remove_file(&mut device, &volume, root, "TEST").unwrap();

    // The slot is tombstoned in place, never compacted.
    assert_eq!(device.data[offset as usize], 0xE5);
    assert!(index::load(&mut device, &volume, root).unwrap().is_empty());
    assert_eq!(
        mutate::remove_file(&mut device, &volume, root, "TEST"),
        Err(Fat32Error::NotFound)
    );
}

#[test]
fn deleted_slot_is_reused_by_the_next_create() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "A").unwrap();
    mutate::create_file(&mut device, &volume, root, "B").unwrap();
    let a_offset = directory::find_entry(&mut device, &volume, root, "A")
        .unwrap()
        .unwrap()
        .offset;

    mutate::remove_file(&mut device, &volume, root, "A").unwrap();
    mutate::create_file(&mut device, &volume, root, "C").unwrap();

    let c_offset = directory::find_entry(&mut device, &volume, root, "C")
        .unwrap()
        .unwrap()
        .offset;
    assert_eq!(c_offset, a_offset);
}

#[test]
fn make_directory_writes_independent_dot_entries() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::make_directory(&mut device, &volume, root, "SUB").unwrap();

    let sub = directory::find_entry(&mut device, &volume, root, "SUB")
        .unwrap()
        .unwrap();
    assert_eq!(sub.entry.kind(), EntryKind::Directory);
    let sub_cluster = sub.entry.first_cluster();
    assert!(volume.is_valid_cluster(sub_cluster));

    let entries = index::load(&mut device, &volume, sub_cluster).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entry.name, name::DOT);
    assert_eq!(entries[0].entry.first_cluster(), sub_cluster);
    assert_eq!(entries[1].entry.name, name::DOT_DOT);
    assert_eq!(entries[1].entry.first_cluster(), root);
    assert_ne!(entries[0].offset, entries[1].offset);
}

#[test]
fn resolve_walks_nested_directories() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::make_directory(&mut device, &volume, root, "A").unwrap();
    let a = directory::find_entry(&mut device, &volume, root, "A")
        .unwrap()
        .unwrap()
        .entry
        .first_cluster();
    mutate::make_directory(&mut device, &volume, a, "B").unwrap();
    let b = directory::find_entry(&mut device, &volume, a, "B")
        .unwrap()
        .unwrap()
        .entry
        .first_cluster();

    assert_eq!(directory::resolve(&mut device, &volume, root, "A/B").unwrap(), b);
    assert_eq!(directory::resolve(&mut device, &volume, a, "B").unwrap(), b);
    assert_eq!(directory::resolve(&mut device, &volume, b, "..").unwrap(), a);
    // `..` out of a root child is stored as cluster 0 and maps back to root.
    assert_eq!(directory::resolve(&mut device, &volume, a, "..").unwrap(), root);
}

#[test]
fn resolve_of_empty_path_is_identity() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    assert_eq!(directory::resolve(&mut device, &volume, root, "").unwrap(), root);
    assert_eq!(directory::resolve(&mut device, &volume, root, "///").unwrap(), root);
}

#[test]
fn resolve_distinguishes_missing_from_non_directory() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "FILE").unwrap();

    assert_eq!(
        directory::resolve(&mut device, &volume, root, "NOPE"),
        Err(Fat32Error::NotFound)
    );
    assert_eq!(
        directory::resolve(&mut device, &volume, root, "FILE"),
        Err(Fat32Error::NotADirectory)
    );
}

#[test]
fn remove_directory_requires_emptiness() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::make_directory(&mut device, &volume, root, "SUB").unwrap();
    let sub = directory::find_entry(&mut device, &volume, root, "SUB")
        .unwrap()
        .unwrap()
        .entry
        .first_cluster();
    mutate::create_file(&mut device, &volume, sub, "INNER").unwrap();

    let before = device.data.clone();
    assert_eq!(
        mutate::remove_directory(&mut device, &volume, root, "SUB"),
        Err(Fat32Error::NotEmpty)
    );
    // Failed removal mutates nothing.
    assert_eq!(device.data, before);

    mutate::remove_file(&mut device, &volume, sub, "INNER").unwrap();
    mutate::remove_directory(&mut device, &volume, root, "SUB").unwrap();
    assert!(index::load(&mut device, &volume, root).unwrap().is_empty());
    // The directory's cluster went back to the free pool.
    assert_eq!(fat::read_entry(&mut device, &volume, sub).unwrap(), 0);
}

#[test]
fn remove_directory_rejects_files() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    mutate::create_file(&mut device, &volume, root, "FILE").unwrap();
    assert_eq!(
        mutate::remove_directory(&mut device, &volume, root, "FILE"),
        Err(Fat32Error::NotADirectory)
    );
}

#[test]
fn full_directory_cluster_grows_by_one_cluster() {
    let mut device = formatted_device(DEFAULT_SECTORS);
    let volume = mount(&mut device).unwrap();
    let root = volume.root_cluster;

    // One 512-byte cluster holds 16 slots.
    for i in 0..17 {
        let file_name = format!("F{i}");
        mutate::create_file(&mut device, &volume, root, &file_name).unwrap();
    }

    assert_eq!(index::load(&mut device, &volume, root).unwrap().len(), 17);
    // The root chain now spans two clusters.
    assert!(fat::next_cluster(&mut device, &volume, root).unwrap().is_some());
}
