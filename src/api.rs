//! High-level API for pack building

use crate::exceptions::{PackError, Result};
use crate::msx::{self, RomIndex};
use log::debug;
use std::path::Path;

/// Build one pack from a manifest file, detecting the config kind
///
/// The top-level `"config"` field discriminates machine configurations
/// from firmware extension configurations. Returns the assembled pack as a
/// byte buffer; the caller decides where (and whether) to persist it.
pub fn build_pack(manifest_path: &Path, index: &RomIndex) -> Result<Vec<u8>> {
    let manifest_data = std::fs::read_to_string(manifest_path)?;
    let manifest: serde_json::Value = serde_json::from_str(&manifest_data)?;

    let config = manifest
        .get("config")
        .and_then(|c| c.as_str())
        .unwrap_or("machine");
    debug!("{}: {config} configuration", manifest_path.display());

    match config {
        "machine" => {
            let manifest: msx::MachineManifest = serde_json::from_str(&manifest_data)?;
            msx::assemble_machine_pack(&manifest, index)
        }
        "extension" => {
            let manifest: msx::ExtensionManifest = serde_json::from_str(&manifest_data)?;
            msx::assemble_extension_pack(&manifest, index)
        }
        other => Err(PackError::Generic(format!(
            "Unknown config kind '{other}' in {}",
            manifest_path.display()
        ))),
    }
}

/// Build a machine pack from a manifest file
pub fn build_machine_pack(manifest_path: &Path, index: &RomIndex) -> Result<Vec<u8>> {
    let manifest_data = std::fs::read_to_string(manifest_path)?;
    let manifest: msx::MachineManifest = serde_json::from_str(&manifest_data)?;
    msx::assemble_machine_pack(&manifest, index)
}

/// Build an extension pack from a manifest file
pub fn build_extension_pack(manifest_path: &Path, index: &RomIndex) -> Result<Vec<u8>> {
    let manifest_data = std::fs::read_to_string(manifest_path)?;
    let manifest: msx::ExtensionManifest = serde_json::from_str(&manifest_data)?;
    msx::assemble_extension_pack(&manifest, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_build_pack_dispatches_on_config_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(
            &path,
            r#"{"config": "extension", "fw": []}"#,
        )
        .unwrap();

        let pack = build_pack(&path, &RomIndex::default()).unwrap();
        assert!(pack.is_empty());
    }

    #[test]
    fn test_build_pack_defaults_to_machine_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machine.json");
        fs::write(&path, r#"{"machine": "MSX1", "primary": []}"#).unwrap();

        let pack = build_pack(&path, &RomIndex::default()).unwrap();
        // just the trailing global-config block
        assert_eq!(pack.len(), 16);
        assert_eq!(&pack[0..3], b"MSX");
    }

    #[test]
    fn test_unknown_config_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        fs::write(&path, r#"{"config": "cassette"}"#).unwrap();

        assert!(matches!(
            build_pack(&path, &RomIndex::default()),
            Err(PackError::Generic(_))
        ));
    }
}
