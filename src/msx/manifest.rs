//! Hardware-description manifest structures
//!
//! One manifest describes one pack. Machine manifests carry the primary →
//! secondary → block tree; extension manifests carry a flat firmware list.
//! The top-level `config` field discriminates the two.

use serde::{Deserialize, Serialize};

/// Machine configuration: one full slot tree plus the machine generation
#[derive(Debug, Serialize, Deserialize)]
pub struct MachineManifest {
    /// Machine generation name ("MSX1" or "MSX2")
    #[serde(default)]
    pub machine: Option<String>,

    /// Primary slots in descriptor order
    #[serde(default)]
    pub primary: Vec<PrimaryEntry>,

    /// Base64-encoded keyboard layout payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kbd_layout: Option<String>,
}

/// One primary slot and its secondaries
#[derive(Debug, Serialize, Deserialize)]
pub struct PrimaryEntry {
    pub slot: u8,
    #[serde(default)]
    pub secondary: Vec<SecondaryEntry>,
}

/// One secondary slot and its blocks
#[derive(Debug, Serialize, Deserialize)]
pub struct SecondaryEntry {
    pub slot: u8,
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
}

/// One memory block within a secondary slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEntry {
    /// First bank this block occupies (low 2 bits significant)
    pub start: u8,

    /// Block kind name, e.g. "ROM", "RAM MAPPER", "IO_MIRROR"
    #[serde(rename = "type")]
    pub kind: String,

    /// Number of banks
    #[serde(default, rename = "block_count")]
    pub count: u16,

    /// Original image filename, kept for diagnostics only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// SHA-1 digest of the embedded image, hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// Start bank of a sibling block this one mirrors
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<u8>,
}

/// Extension configuration: standalone firmware images
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtensionManifest {
    #[serde(default, rename = "fw")]
    pub firmware: Vec<FirmwareEntry>,
}

/// One firmware image in an extension pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareEntry {
    /// Extension name from the fixed table, e.g. "SCC", "FM_PAC"
    pub name: String,

    /// Original image filename, kept for diagnostics only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// SHA-1 digest of the image, hex; entries without one are skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// Declared pack size in bytes; defaults to the image length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}
