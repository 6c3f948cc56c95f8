//! Block type registry and slot addressing
//!
//! Every block kind carries a fixed attribute tuple (fill flag, read-only
//! flag, mapper kind, config kind) that drives its header encoding. The
//! table is closed: the `attributes` match is exhaustive over `BlockKind`,
//! so adding a kind without its tuple fails to compile.

use crate::exceptions::{PackError, Result};

/// How a block's banks are switched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapperKind {
    Unused = 0,
    Auto = 1,
    None = 2,
    Ram = 3,
}

/// Semantic role of a block's banks, reported to the emulator loader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigKind {
    None = 0,
    Fdc = 1,
    SlotA = 2,
    SlotB = 3,
    KbdLayout = 4,
    Config = 5,
}

/// Block kinds understood by the encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    None,
    Ram,
    RamMapper,
    Rom,
    Fdc,
    SlotA,
    SlotB,
    KbdLayout,
    RomMirror,
    IoMirror,
    Mirror,
    Empty,
}

/// Fixed encoding attributes of a block kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockAttributes {
    /// Pre-fill the banks before loading (header bit 7)
    pub fill: bool,
    /// Banks are write-protected (header bit 6)
    pub read_only: bool,
    pub mapper: MapperKind,
    pub config: ConfigKind,
}

const fn attrs(fill: bool, read_only: bool, mapper: MapperKind, config: ConfigKind) -> BlockAttributes {
    BlockAttributes {
        fill,
        read_only,
        mapper,
        config,
    }
}

impl BlockKind {
    /// Encoding attributes of this kind
    pub const fn attributes(self) -> BlockAttributes {
        match self {
            BlockKind::None => attrs(false, false, MapperKind::Unused, ConfigKind::None),
            BlockKind::Ram => attrs(true, false, MapperKind::None, ConfigKind::None),
            BlockKind::RamMapper => attrs(true, false, MapperKind::Ram, ConfigKind::None),
            BlockKind::Rom => attrs(true, true, MapperKind::None, ConfigKind::None),
            BlockKind::Fdc => attrs(true, true, MapperKind::None, ConfigKind::Fdc),
            BlockKind::SlotA => attrs(false, false, MapperKind::Unused, ConfigKind::SlotA),
            BlockKind::SlotB => attrs(false, false, MapperKind::Unused, ConfigKind::SlotB),
            BlockKind::KbdLayout => attrs(false, false, MapperKind::Unused, ConfigKind::KbdLayout),
            BlockKind::RomMirror => attrs(false, false, MapperKind::None, ConfigKind::None),
            BlockKind::IoMirror => attrs(false, false, MapperKind::Unused, ConfigKind::None),
            BlockKind::Mirror => attrs(false, false, MapperKind::None, ConfigKind::None),
            BlockKind::Empty => attrs(false, false, MapperKind::Unused, ConfigKind::None),
        }
    }

    /// Kinds whose slot table maps banks directly (0x80 entries)
    pub fn is_direct_mapped(self) -> bool {
        matches!(
            self,
            BlockKind::Ram | BlockKind::Rom | BlockKind::Fdc | BlockKind::IoMirror
        )
    }

    /// Kinds whose slot table points at another block's banks (0x40 entries)
    pub fn is_bank_mirror(self) -> bool {
        matches!(self, BlockKind::Mirror | BlockKind::RomMirror)
    }

    /// Kinds that inherit the referenced block's config kind
    pub fn inherits_ref_config(self) -> bool {
        matches!(self, BlockKind::IoMirror | BlockKind::Mirror)
    }

    /// Kinds covering all four sub-slots with fixed entries
    pub fn is_subslot_spanning(self) -> bool {
        matches!(self, BlockKind::RamMapper | BlockKind::SlotA | BlockKind::SlotB)
    }

    /// Parse a descriptor kind name. Accepts the original spaced names
    /// ("RAM MAPPER") as written in existing hardware descriptions.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "NONE" => Ok(BlockKind::None),
            "RAM" => Ok(BlockKind::Ram),
            "RAM MAPPER" | "RAM_MAPPER" => Ok(BlockKind::RamMapper),
            "ROM" => Ok(BlockKind::Rom),
            "FDC" => Ok(BlockKind::Fdc),
            "SLOT A" | "SLOT_A" => Ok(BlockKind::SlotA),
            "SLOT B" | "SLOT_B" => Ok(BlockKind::SlotB),
            "KBD LAYOUT" | "KBD_LAYOUT" => Ok(BlockKind::KbdLayout),
            "ROM_MIRROR" => Ok(BlockKind::RomMirror),
            "IO_MIRROR" => Ok(BlockKind::IoMirror),
            "MIRROR" => Ok(BlockKind::Mirror),
            "EMPTY" => Ok(BlockKind::Empty),
            other => Err(PackError::UnknownBlockKind(other.to_string())),
        }
    }
}

/// Two-level hardware slot address
///
/// Only the low 2 bits of each level are significant; higher bits are
/// masked off silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotAddress {
    pub primary: u8,
    pub secondary: u8,
}

impl SlotAddress {
    pub fn new(primary: u8, secondary: u8) -> Self {
        SlotAddress { primary, secondary }
    }

    /// Pack into the slot-table byte layout: primary in bits 4-5,
    /// secondary in bits 2-3, bits 0-1 left for the bank number
    pub fn packed(self) -> u8 {
        ((self.primary & 3) << 4) | ((self.secondary & 3) << 2)
    }
}
