//! 8.3 short-name handling
//!
//! On disk a short name is 11 bytes: 8 base characters and a 3 character
//! extension, each space-padded, no dot, uppercase. Trailing spaces are
//! padding, so `"TEST"` and the on-disk `b"TEST       "` are the same name.

use alloc::string::String;

use crate::error::{Fat32Error, Result};

/// `.` entry name as stored on disk
pub const DOT: [u8; 11] = *b".          ";

/// `..` entry name as stored on disk
pub const DOT_DOT: [u8; 11] = *b"..         ";

fn valid_short_byte(b: u8) -> bool {
    // Conservative subset: enough for 8.3 interop, rejects separators,
    // spaces and control bytes.
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'~' | b'!' | b'#' | b'$' | b'%' | b'&')
}

/// Pack an input name into the 11-byte space-padded on-disk form.
///
/// `.` and `..` pack to their fixed dot-entry forms. Lowercase input is
/// uppercased; a name whose base exceeds 8 bytes or extension exceeds 3
/// bytes cannot be expressed and fails with [`Fat32Error::InvalidName`].
pub fn pack(input: &str) -> Result<[u8; 11]> {
    if input == "." {
        return Ok(DOT);
    }
    if input == ".." {
        return Ok(DOT_DOT);
    }

    let (base, ext) = match input.rsplit_once('.') {
        Some((base, ext)) => (base.as_bytes(), ext.as_bytes()),
        None => (input.as_bytes(), &b""[..]),
    };

    if base.is_empty() || base.len() > 8 || ext.len() > 3 {
        return Err(Fat32Error::InvalidName);
    }

    let mut packed = [b' '; 11];
    for (i, &b) in base.iter().enumerate() {
        if !valid_short_byte(b) {
            return Err(Fat32Error::InvalidName);
        }
        packed[i] = b.to_ascii_uppercase();
    }
    for (i, &b) in ext.iter().enumerate() {
        if !valid_short_byte(b) {
            return Err(Fat32Error::InvalidName);
        }
        packed[8 + i] = b.to_ascii_uppercase();
    }

    Ok(packed)
}

/// Compare an on-disk name against an input name with padding semantics.
///
/// A disk-side space where the input has ended counts as a match; any
/// other mismatch fails. Comparison is case-insensitive, matching the
/// on-disk uppercase convention.
pub fn names_equal(disk: &[u8; 11], input: &str) -> bool {
    match pack(input) {
        Ok(packed) => packed == *disk,
        Err(_) => false,
    }
}

/// Unpack an on-disk name for display: padding stripped, dot reinserted.
pub fn display(disk: &[u8; 11]) -> String {
    if *disk == DOT {
        return String::from(".");
    }
    if *disk == DOT_DOT {
        return String::from("..");
    }

    let base = trim_trailing_spaces(&disk[0..8]);
    let ext = trim_trailing_spaces(&disk[8..11]);

    let mut out = String::with_capacity(12);
    for &b in base {
        out.push(b as char);
    }
    if !ext.is_empty() {
        out.push('.');
        for &b in ext {
            out.push(b as char);
        }
    }
    out
}

fn trim_trailing_spaces(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b' ' {
        end -= 1;
    }
    &bytes[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_pads_with_spaces() {
        assert_eq!(pack("TEST").unwrap(), *b"TEST       ");
        assert_eq!(pack("readme.txt").unwrap(), *b"README  TXT");
        assert_eq!(pack("A").unwrap(), *b"A          ");
    }

    #[test]
    fn pack_rejects_oversized_and_bad_bytes() {
        assert_eq!(pack("TOOLONGNAME"), Err(Fat32Error::InvalidName));
        assert_eq!(pack("A.LONG"), Err(Fat32Error::InvalidName));
        assert_eq!(pack(""), Err(Fat32Error::InvalidName));
        assert_eq!(pack("A B"), Err(Fat32Error::InvalidName));
        assert_eq!(pack("A/B"), Err(Fat32Error::InvalidName));
    }

    #[test]
    fn dot_entries_pack_to_fixed_forms() {
        assert_eq!(pack(".").unwrap(), DOT);
        assert_eq!(pack("..").unwrap(), DOT_DOT);
    }

    #[test]
    fn padded_comparison() {
        assert!(names_equal(b"TEST       ", "TEST"));
        assert!(names_equal(b"TEST       ", "test"));
        assert!(names_equal(b"README  TXT", "README.TXT"));
        assert!(!names_equal(b"TEST       ", "TES"));
        assert!(!names_equal(b"TEST       ", "TESTS"));
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(display(b"TEST       "), "TEST");
        assert_eq!(display(b"README  TXT"), "README.TXT");
        assert_eq!(display(&DOT), ".");
        assert_eq!(display(&DOT_DOT), "..");
    }
}
