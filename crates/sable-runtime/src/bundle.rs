//! Frozen-bundle detection.
//!
//! A pre-bundled sable executable carries an appended payload marked by
//! a fixed trailer magic at the very end of the file. Such a build has
//! every module embedded at bundle time, so the path-safe resolver
//! chain is never installed for it. Detection is best-effort: any read
//! error means "not bundled".

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Magic bytes at the very end of a bundled executable.
pub const TRAILER_MAGIC: [u8; 8] = *b"SBLEAOT\0";

/// Whether the current executable carries a bundle trailer.
pub fn is_bundled() -> bool {
    match std::env::current_exe() {
        Ok(exe) => file_is_bundled(&exe).unwrap_or(false),
        Err(_) => false,
    }
}

/// Whether `path` ends with the bundle trailer magic.
pub fn file_is_bundled(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len < TRAILER_MAGIC.len() as u64 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-(TRAILER_MAGIC.len() as i64)))?;
    let mut trailer = [0u8; TRAILER_MAGIC.len()];
    file.read_exact(&mut trailer)?;
    Ok(trailer == TRAILER_MAGIC)
}
