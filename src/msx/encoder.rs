//! Block encoding - fixed 16-byte headers plus slot-table entries
//!
//! Header layout, offsets in bytes:
//!
//! ```text
//! 0..3   "MSX" magic
//! 3      fill<<7 | read_only<<6 | mapper kind
//! 4      config kind (mirrors report their target's config kind)
//! 5..7   bank count, big-endian
//! 7..    slot-table entries, layout depends on the block kind
//! ..16   zero padding
//! ```
//!
//! Slot-table bytes are self-describing to the emulator loader: bit 7 marks
//! a directly mapped bank, bit 6 a mirrored one, so no separate tag field
//! is needed.

use super::blocks::{BlockKind, ConfigKind, MapperKind, SlotAddress};
use super::constants::{BLOCK_HEADER_SIZE, ENTRY_ACTIVE, ENTRY_MIRROR, FW_PAGE_SHIFT, MSX_MAGIC};
use crate::exceptions::{PackError, Result};
use log::trace;

/// A fully resolved block, ready for encoding
///
/// `reference` is populated before encoding by sibling lookup in the
/// enclosing secondary slot; a mirror descriptor whose reference failed to
/// resolve never reaches the encoder.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    /// First bank, low 2 bits significant
    pub start: u8,
    pub count: u16,
    /// SHA-1 of the embedded image, if this block carries one
    pub sha1: Option<[u8; 20]>,
    /// Original image filename, for diagnostics
    pub filename: Option<String>,
    /// Resolved mirror target
    pub reference: Option<Box<BlockDescriptor>>,
}

impl BlockDescriptor {
    /// Header-only descriptor, no payload and no reference
    pub fn bare(kind: BlockKind, start: u8, count: u16) -> Self {
        BlockDescriptor {
            kind,
            start,
            count,
            sha1: None,
            filename: None,
            reference: None,
        }
    }

    fn reference(&self) -> Result<&BlockDescriptor> {
        self.reference.as_deref().ok_or_else(|| {
            PackError::UnresolvedReference(format!(
                "{:?} block at bank {} has no resolved target",
                self.kind, self.start
            ))
        })
    }
}

// Bank number for entry i of a block starting at `start`; banks wrap
// within the 4-page window
fn bank(start: u8, i: u16) -> u8 {
    ((start as u16 + i) & 3) as u8
}

/// Encode one block header (16 bytes, or longer if the slot table overflows
/// the padding area)
pub fn encode_block(slot: SlotAddress, desc: &BlockDescriptor) -> Result<Vec<u8>> {
    let attrs = desc.kind.attributes();
    let packed = slot.packed();

    let mut head = Vec::with_capacity(BLOCK_HEADER_SIZE);
    head.extend_from_slice(MSX_MAGIC);

    let mut flags = attrs.mapper as u8;
    if attrs.fill {
        flags |= 0x80;
    }
    if attrs.read_only {
        flags |= 0x40;
    }
    head.push(flags);

    // Mirrors report the semantic role of their target, not their own
    // passthrough role
    let config = if desc.kind.inherits_ref_config() {
        desc.reference()?.kind.attributes().config
    } else {
        attrs.config
    };
    head.push(config as u8);

    head.extend_from_slice(&desc.count.to_be_bytes());

    if desc.kind.is_direct_mapped() {
        for i in 0..desc.count {
            head.push(ENTRY_ACTIVE | packed | bank(desc.start, i));
            head.push(i as u8);
        }
    } else if desc.kind.is_bank_mirror() {
        let ref_start = desc.reference()?.start;
        for i in 0..desc.count {
            head.push(ENTRY_MIRROR | packed | bank(desc.start, i));
            head.push(packed | bank(ref_start, i));
        }
    } else if desc.kind.is_subslot_spanning() {
        // Fixed entries covering sub-slots 0-3 of the packed slot
        for k in 0..4u8 {
            head.push(ENTRY_ACTIVE | (packed + k));
            head.push(0);
        }
    }

    while head.len() < BLOCK_HEADER_SIZE {
        head.push(0);
    }

    trace!(
        "encoded {:?} block at {}/{}: {}",
        desc.kind,
        slot.primary,
        slot.secondary,
        hex::encode(&head)
    );
    Ok(head)
}

/// Encode the trailing global-config block
pub fn encode_global_config(config: u8) -> Vec<u8> {
    let mut head = Vec::with_capacity(BLOCK_HEADER_SIZE);
    head.extend_from_slice(MSX_MAGIC);
    head.push(MapperKind::Unused as u8);
    head.push(ConfigKind::Config as u8);
    head.push(config);
    head.resize(BLOCK_HEADER_SIZE, 0);
    head
}

/// Encode a firmware extension header; `size_pages` is the image size in
/// 16 KiB units
pub fn encode_firmware_header(extension_code: u8, size_pages: u16) -> Vec<u8> {
    let mut head = Vec::with_capacity(BLOCK_HEADER_SIZE);
    head.extend_from_slice(MSX_MAGIC);
    head.push(0);
    head.push(extension_code);
    head.extend_from_slice(&size_pages.to_be_bytes());
    head.resize(BLOCK_HEADER_SIZE, 0);
    head
}

/// Convert a byte size to 16 KiB pages as carried in firmware headers
pub fn size_in_pages(size_bytes: u64) -> u16 {
    (size_bytes >> FW_PAGE_SHIFT) as u16
}
