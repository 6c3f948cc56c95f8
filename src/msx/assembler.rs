//! Machine pack assembly
//!
//! Walks the primary/secondary/block tree, encodes every block, and returns
//! the complete pack as one byte buffer. Nothing is persisted here: on any
//! error the buffer is dropped with the assembler, so a failed pack can
//! never leave a partial artifact behind.
//!
//! Mirror blocks are written in a second pass. The emulator loader assumes
//! directly mapped banks precede the mirrors that point at them, so every
//! referencing block's header goes into a deferred queue and is flushed, in
//! encounter order, only after the whole tree has been walked.

use super::blocks::{BlockKind, SlotAddress};
use super::encoder::{BlockDescriptor, encode_block, encode_global_config};
use super::manifest::{BlockEntry, MachineManifest};
use super::romdir::{RomIndex, parse_hash};
use crate::exceptions::{PackError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, info, trace};
use std::fs;

/// Assemble one machine pack into a byte buffer
pub fn assemble_machine_pack(manifest: &MachineManifest, index: &RomIndex) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut deferred: Vec<Vec<u8>> = Vec::new();
    let mut config: u8 = 0;

    for primary in &manifest.primary {
        for secondary in &primary.secondary {
            let slot = SlotAddress::new(primary.slot, secondary.slot);

            for block in &secondary.blocks {
                let desc = resolve_block(block, &secondary.blocks)?;
                let head = encode_block(slot, &desc)?;
                trace!(
                    "block {:?} at {}/{} bank {} ({} banks)",
                    desc.kind, primary.slot, secondary.slot, desc.start, desc.count
                );

                if block.reference.is_some() {
                    // Mirrors wait until every direct block is out
                    deferred.push(head);
                } else {
                    out.extend_from_slice(&head);
                    if let Some(hash) = desc.sha1 {
                        embed_content(&mut out, &desc, &hash, index)?;
                    }
                }
            }

            // Any nonzero secondary marks this primary slot as expanded
            if secondary.slot > 0 {
                config |= 1 << (primary.slot & 3);
            }
        }
    }

    debug!("flushing {} deferred mirror block(s)", deferred.len());
    for head in deferred {
        out.extend_from_slice(&head);
    }

    if let Some(layout) = &manifest.kbd_layout {
        let payload = BASE64
            .decode(layout.trim())
            .map_err(|e| PackError::Generic(format!("Invalid kbd_layout payload: {e}")))?;
        let desc = BlockDescriptor::bare(BlockKind::KbdLayout, 0, 0);
        let head = encode_block(SlotAddress::new(0, 0), &desc)?;
        out.extend_from_slice(&head);
        out.extend_from_slice(&payload);
        debug!("keyboard layout: {} bytes", payload.len());
    }

    config |= (machine_generation(manifest)? & 3) << 4;
    out.extend_from_slice(&encode_global_config(config));

    info!("machine pack assembled: {} bytes, config {config:#04x}", out.len());
    Ok(out)
}

/// Build the resolved descriptor for one block entry, looking up its mirror
/// target among the sibling blocks of the same secondary slot
fn resolve_block(entry: &BlockEntry, siblings: &[BlockEntry]) -> Result<BlockDescriptor> {
    let mut desc = descriptor_of(entry)?;

    if let Some(ref_start) = entry.reference {
        let target = siblings
            .iter()
            .find(|sibling| sibling.start == ref_start)
            .ok_or_else(|| {
                PackError::UnresolvedReference(format!(
                    "{} block at bank {} references start {}, but no sibling declares it",
                    entry.kind, entry.start, ref_start
                ))
            })?;
        // One level only: a target's own reference is not chased
        desc.reference = Some(Box::new(descriptor_of(target)?));
    }

    Ok(desc)
}

fn descriptor_of(entry: &BlockEntry) -> Result<BlockDescriptor> {
    Ok(BlockDescriptor {
        kind: BlockKind::parse(&entry.kind)?,
        start: entry.start & 3,
        count: entry.count,
        sha1: entry.sha1.as_deref().map(parse_hash).transpose()?,
        filename: entry.filename.clone(),
        reference: None,
    })
}

/// Locate a block's image by digest and append its full contents
fn embed_content(
    out: &mut Vec<u8>,
    desc: &BlockDescriptor,
    hash: &[u8; 20],
    index: &RomIndex,
) -> Result<()> {
    let path = index.resolve(hash).ok_or_else(|| {
        PackError::UnresolvedContent(format!(
            "ROM {} sha1:{} not found in ROM directory",
            desc.filename.as_deref().unwrap_or("<unnamed>"),
            hex::encode(hash)
        ))
    })?;

    let payload = fs::read(path)?;
    trace!("embedded {} ({} bytes)", path.display(), payload.len());
    out.extend_from_slice(&payload);
    Ok(())
}

fn machine_generation(manifest: &MachineManifest) -> Result<u8> {
    let name = manifest
        .machine
        .as_deref()
        .ok_or_else(|| PackError::UnsupportedMachine("machine generation missing".to_string()))?;
    super::constants::machine_code(name)
        .ok_or_else(|| PackError::UnsupportedMachine(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msx::constants::BLOCK_HEADER_SIZE;
    use crate::msx::manifest::{PrimaryEntry, SecondaryEntry};
    use std::fs;

    fn rom_block(start: u8, count: u16, sha1: Option<&str>) -> BlockEntry {
        BlockEntry {
            start,
            kind: "ROM".to_string(),
            count,
            filename: None,
            sha1: sha1.map(str::to_string),
            reference: None,
        }
    }

    fn mirror_block(start: u8, count: u16, reference: u8) -> BlockEntry {
        BlockEntry {
            start,
            kind: "MIRROR".to_string(),
            count,
            filename: None,
            sha1: None,
            reference: Some(reference),
        }
    }

    fn machine(primary: Vec<PrimaryEntry>) -> MachineManifest {
        MachineManifest {
            machine: Some("MSX1".to_string()),
            primary,
            kbd_layout: None,
        }
    }

    fn single_secondary(p: u8, s: u8, blocks: Vec<BlockEntry>) -> Vec<PrimaryEntry> {
        vec![PrimaryEntry {
            slot: p,
            secondary: vec![SecondaryEntry { slot: s, blocks }],
        }]
    }

    // sha1("\xAB\xCD")
    const AB_CD_SHA1: &str = "32825eb98de842ee3e4df005a07b7d65522a46a0";

    fn indexed_rom(contents: &[u8]) -> (tempfile::TempDir, RomIndex) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("image.rom"), contents).unwrap();
        let index = RomIndex::build(dir.path()).unwrap();
        (dir, index)
    }

    #[test]
    fn test_rom_pack_scenario_bytes() {
        let (_dir, index) = indexed_rom(&[0xAB, 0xCD]);
        let manifest = machine(single_secondary(0, 0, vec![rom_block(0, 2, Some(AB_CD_SHA1))]));

        let pack = assemble_machine_pack(&manifest, &index).unwrap();

        // ROM header, payload, trailing config block
        assert_eq!(pack.len(), BLOCK_HEADER_SIZE + 2 + BLOCK_HEADER_SIZE);
        assert_eq!(&pack[0..3], b"MSX");
        assert_eq!(&pack[5..7], &[0x00, 0x02]);
        assert_eq!(&pack[7..11], &[0x80, 0x00, 0x81, 0x01]);
        assert_eq!(&pack[16..18], &[0xAB, 0xCD]);

        let config_block = &pack[18..34];
        assert_eq!(&config_block[0..3], b"MSX");
        assert_eq!(config_block[4], 5); // CONFIG
        assert_eq!(config_block[5], 0x00); // MSX1, nothing expanded
    }

    #[test]
    fn test_mirrors_flush_after_all_direct_blocks() {
        let primaries = vec![
            PrimaryEntry {
                slot: 0,
                secondary: vec![SecondaryEntry {
                    slot: 0,
                    blocks: vec![rom_block(0, 1, None), mirror_block(2, 1, 0)],
                }],
            },
            PrimaryEntry {
                slot: 1,
                secondary: vec![SecondaryEntry {
                    slot: 0,
                    blocks: vec![rom_block(0, 1, None), mirror_block(3, 1, 0)],
                }],
            },
        ];
        let pack = assemble_machine_pack(&machine(primaries), &RomIndex::default()).unwrap();

        // Four blocks plus config: direct, direct, then both mirrors in
        // encounter order
        assert_eq!(pack.len(), 5 * BLOCK_HEADER_SIZE);
        let entry = |b: usize| &pack[b * BLOCK_HEADER_SIZE + 7..b * BLOCK_HEADER_SIZE + 9];
        assert_eq!(entry(0)[0] & 0xC0, 0x80);
        assert_eq!(entry(1)[0] & 0xC0, 0x80);
        assert_eq!(entry(2)[0] & 0xC0, 0x40); // slot 0 mirror first
        assert_eq!(entry(2)[0], 0x40 | 2);
        assert_eq!(entry(3)[0], 0x40 | (1 << 4) | 3); // then slot 1 mirror
    }

    #[test]
    fn test_expanded_primary_sets_config_bit() {
        let primaries = vec![
            PrimaryEntry {
                slot: 0,
                secondary: vec![SecondaryEntry { slot: 0, blocks: vec![] }],
            },
            PrimaryEntry {
                slot: 3,
                secondary: vec![
                    SecondaryEntry { slot: 0, blocks: vec![] },
                    SecondaryEntry { slot: 2, blocks: vec![] },
                ],
            },
        ];
        let mut manifest = machine(primaries);
        manifest.machine = Some("MSX2".to_string());

        let pack = assemble_machine_pack(&manifest, &RomIndex::default()).unwrap();
        let config = pack[pack.len() - BLOCK_HEADER_SIZE + 5];
        // bit 3 for the expanded primary, generation 1 in bits 4-5
        assert_eq!(config, 0b0001_1000);
    }

    #[test]
    fn test_all_default_secondaries_leave_bits_clear() {
        let manifest = machine(single_secondary(2, 0, vec![]));
        let pack = assemble_machine_pack(&manifest, &RomIndex::default()).unwrap();
        let config = pack[pack.len() - BLOCK_HEADER_SIZE + 5];
        assert_eq!(config & 0x0F, 0);
    }

    #[test]
    fn test_unresolved_reference_fails_pack() {
        let manifest = machine(single_secondary(0, 0, vec![mirror_block(2, 1, 1)]));
        assert!(matches!(
            assemble_machine_pack(&manifest, &RomIndex::default()),
            Err(PackError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_unresolved_content_yields_no_pack() {
        let manifest = machine(single_secondary(
            0,
            0,
            vec![rom_block(0, 1, Some(AB_CD_SHA1))],
        ));
        // Empty index: the digest cannot resolve, the whole pack is refused
        let result = assemble_machine_pack(&manifest, &RomIndex::default());
        assert!(matches!(result, Err(PackError::UnresolvedContent(_))));
    }

    #[test]
    fn test_mirror_reads_sibling_kind_for_config() {
        let blocks = vec![
            BlockEntry {
                start: 0,
                kind: "FDC".to_string(),
                count: 1,
                filename: None,
                sha1: None,
                reference: None,
            },
            BlockEntry {
                start: 2,
                kind: "IO_MIRROR".to_string(),
                count: 1,
                filename: None,
                sha1: None,
                reference: Some(0),
            },
        ];
        let pack =
            assemble_machine_pack(&machine(single_secondary(0, 0, blocks)), &RomIndex::default())
                .unwrap();
        // deferred IO_MIRROR header sits after the FDC block
        let mirror = &pack[BLOCK_HEADER_SIZE..2 * BLOCK_HEADER_SIZE];
        assert_eq!(mirror[4], 1); // FDC config kind, inherited
    }

    #[test]
    fn test_kbd_layout_block_and_payload() {
        let mut manifest = machine(vec![]);
        manifest.kbd_layout = Some(BASE64.encode([1u8, 2, 3, 4]));

        let pack = assemble_machine_pack(&manifest, &RomIndex::default()).unwrap();
        // kbd header + payload + config block
        assert_eq!(pack.len(), BLOCK_HEADER_SIZE + 4 + BLOCK_HEADER_SIZE);
        assert_eq!(pack[4], 4); // KBD_LAYOUT config kind
        assert_eq!(&pack[16..20], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_machine_generation_fails() {
        let mut manifest = machine(vec![]);
        manifest.machine = None;
        assert!(matches!(
            assemble_machine_pack(&manifest, &RomIndex::default()),
            Err(PackError::UnsupportedMachine(_))
        ));

        manifest.machine = Some("MSX3".to_string());
        assert!(matches!(
            assemble_machine_pack(&manifest, &RomIndex::default()),
            Err(PackError::UnsupportedMachine(_))
        ));
    }
}
