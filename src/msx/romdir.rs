//! Content-addressed ROM index
//!
//! Every regular file under the ROM directory is hashed once at startup;
//! blocks and firmware entries then name their payloads by SHA-1 digest
//! instead of by path. The index is immutable after construction, so it can
//! be shared read-only across parallel pack builds.

use crate::exceptions::{PackError, Result};
use log::{debug, trace, warn};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 160-bit content digest
pub type ContentHash = [u8; 20];

/// Digest → path table over one ROM directory
#[derive(Debug, Default)]
pub struct RomIndex {
    entries: HashMap<ContentHash, PathBuf>,
}

impl RomIndex {
    /// Hash every regular file under `dir` (recursively) and build the index
    ///
    /// Duplicate digests keep the file seen last; a warning names both
    /// paths so collisions are never silent.
    pub fn build(dir: &Path) -> Result<Self> {
        let mut entries = HashMap::new();

        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| {
                PackError::Generic(format!("Failed to walk ROM dir {}: {e}", dir.display()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            let digest = hash_file(&path)?;
            trace!("indexed {} as sha1:{}", path.display(), hex::encode(digest));

            if let Some(previous) = entries.insert(digest, path.clone()) {
                warn!(
                    "digest collision: {} replaces {} for sha1:{}",
                    path.display(),
                    previous.display(),
                    hex::encode(digest)
                );
            }
        }

        debug!("ROM index: {} images under {}", entries.len(), dir.display());
        Ok(RomIndex { entries })
    }

    /// Look up the file carrying the given digest
    pub fn resolve(&self, hash: &ContentHash) -> Option<&Path> {
        self.entries.get(hash).map(PathBuf::as_path)
    }

    /// Number of indexed images
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no images were indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-1 of a file's full contents, streamed
fn hash_file(path: &Path) -> Result<ContentHash> {
    let file = File::open(path)
        .map_err(|e| PackError::Generic(format!("Failed to open {}: {e}", path.display())))?;
    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().into())
}

/// Parse a hex SHA-1 digest as carried in descriptors
pub fn parse_hash(hex_str: &str) -> Result<ContentHash> {
    let bytes = hex::decode(hex_str.trim())
        .map_err(|e| PackError::Generic(format!("Invalid SHA1 digest '{hex_str}': {e}")))?;
    bytes
        .try_into()
        .map_err(|_| PackError::Generic(format!("SHA1 digest '{hex_str}' is not 160 bits")))
}
