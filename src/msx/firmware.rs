//! Extension (firmware) pack assembly
//!
//! Extension packs are flat: one firmware header followed by the image, per
//! entry, with no trailing config block. Images shorter than their declared
//! size are padded with 0xFF, matching erased flash.

use super::constants::{FW_FILL_BYTE, extension_code};
use super::encoder::{encode_firmware_header, size_in_pages};
use super::manifest::ExtensionManifest;
use super::romdir::{RomIndex, parse_hash};
use crate::exceptions::{PackError, Result};
use log::{debug, info, warn};
use std::fs;

/// Assemble one extension pack into a byte buffer
pub fn assemble_extension_pack(manifest: &ExtensionManifest, index: &RomIndex) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    for entry in &manifest.firmware {
        let code = extension_code(&entry.name)
            .ok_or_else(|| PackError::UnknownExtension(entry.name.clone()))?;

        // The digest is the only content key; entries without one carry
        // nothing to embed
        let Some(sha1) = entry.sha1.as_deref() else {
            warn!("firmware {} has no SHA1, skipping", entry.name);
            continue;
        };
        let hash = parse_hash(sha1)?;
        let path = index.resolve(&hash).ok_or_else(|| {
            PackError::UnresolvedContent(format!(
                "firmware {} ({}) sha1:{sha1} not found in ROM directory",
                entry.name,
                entry.filename.as_deref().unwrap_or("<unnamed>"),
            ))
        })?;

        let payload = fs::read(path)?;
        let file_size = payload.len() as u64;
        let size = entry.size.unwrap_or(file_size);
        debug!(
            "firmware {}: declared {size} bytes, image {file_size} bytes",
            entry.name
        );

        out.extend_from_slice(&encode_firmware_header(code, size_in_pages(size)));
        out.extend_from_slice(&payload);
        if size > file_size {
            out.resize(out.len() + (size - file_size) as usize, FW_FILL_BYTE);
        }
    }

    info!("extension pack assembled: {} bytes", out.len());
    Ok(out)
}
