// Core wire-format constants for MSX packs.
// These are part of the pack layout consumed by the emulator loader and
// never change; anything tunable lives on the CLI instead.

/// 3-byte magic tag opening every block header
pub const MSX_MAGIC: &[u8; 3] = b"MSX";

/// Every block header is exactly this many bytes, zero-padded
pub const BLOCK_HEADER_SIZE: usize = 16;

/// Slot-table entry flag: directly mapped, bank is active
pub const ENTRY_ACTIVE: u8 = 0x80;

/// Slot-table entry flag: mirror mode, second byte names the source bank
pub const ENTRY_MIRROR: u8 = 0x40;

/// Firmware size fields are expressed in 16 KiB pages
pub const FW_PAGE_SHIFT: u32 = 14;

/// Padding byte for firmware images shorter than their declared size
pub const FW_FILL_BYTE: u8 = 0xFF;

/// Recognized firmware extension names; the wire code is the table index
pub const EXTENSION_NAMES: &[&str] = &[
    "NONE",
    "FDC",
    "FM_PAC",
    "SCC",
    "SCC2",
    "MEGA_FLASH_ROM_SCC_SD",
    "GM2",
    "EMPTY",
];

/// Recognized machine generations; the config-byte code is the table index
pub const MACHINE_NAMES: &[&str] = &["MSX1", "MSX2"];

/// Look up a firmware extension's wire code by name
pub fn extension_code(name: &str) -> Option<u8> {
    EXTENSION_NAMES.iter().position(|n| *n == name).map(|i| i as u8)
}

/// Look up a machine generation's config code by name
pub fn machine_code(name: &str) -> Option<u8> {
    MACHINE_NAMES.iter().position(|n| *n == name).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_codes_match_table_order() {
        assert_eq!(extension_code("NONE"), Some(0));
        assert_eq!(extension_code("SCC"), Some(3));
        assert_eq!(extension_code("GM2"), Some(6));
        assert_eq!(extension_code("MSX-DOS"), None);
    }

    #[test]
    fn test_machine_codes() {
        assert_eq!(machine_code("MSX1"), Some(0));
        assert_eq!(machine_code("MSX2"), Some(1));
        assert_eq!(machine_code("MSX2+"), None);
    }
}
