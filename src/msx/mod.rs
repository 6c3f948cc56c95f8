//! MSX pack format implementation

pub mod assembler;
pub mod blocks;
pub mod constants;
pub mod encoder;
pub mod firmware;
pub mod manifest;
pub mod romdir;

// Re-export main functions
pub use assembler::assemble_machine_pack;
pub use firmware::assemble_extension_pack;

// Re-export types for advanced usage
pub use blocks::{BlockAttributes, BlockKind, ConfigKind, MapperKind, SlotAddress};
pub use encoder::BlockDescriptor;
pub use manifest::{ExtensionManifest, MachineManifest};
pub use romdir::{ContentHash, RomIndex};
