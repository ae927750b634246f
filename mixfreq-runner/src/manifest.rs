//! Run manifest export (JSON).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::batch::BatchReport;
use crate::config::PrepConfig;

/// Current schema version for persisted manifests.
pub const SCHEMA_VERSION: u32 = 1;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub config: PrepConfig,
    pub report: BatchReport,
}

/// Write `manifest.json` into the configured output directory.
pub fn write_manifest(config: &PrepConfig, report: &BatchReport) -> Result<PathBuf> {
    let manifest = RunManifest {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        report: report.clone(),
    };

    let path = config.output.dir.join(MANIFEST_FILE);
    let json =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize run manifest")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(path)
}

/// Read a manifest back, rejecting unknown schema versions.
pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("Failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}
