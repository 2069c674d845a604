pub mod autorequire;
pub mod config;
pub mod validate;

use acl::{ManifestLoader, ManifestReport};
use anyhow::{bail, Result};
use colored::*;
use std::path::Path;

/// Load a manifest file, or every manifest in a directory.
///
/// Failures are collected per file so every problem is reported in one run.
pub async fn load_manifests(path: &Path) -> Result<ManifestReport> {
    if path.is_dir() {
        Ok(ManifestLoader::load_resources_from_directory(path).await?)
    } else if path.is_file() {
        Ok(ManifestLoader::load_files(vec![path.to_path_buf()]).await)
    } else {
        bail!("Manifest path does not exist: {}", path.display());
    }
}

pub fn print_failures(report: &ManifestReport) {
    for (file, reason) in &report.failures {
        eprintln!(
            "{} {}: {}",
            "✗".red(),
            file.display(),
            reason.to_string().red()
        );
    }
}

/// Turn collected failures into an error once output has been printed
pub fn ensure_clean(report: &ManifestReport) -> Result<()> {
    if !report.is_clean() {
        bail!(
            "{} of {} manifest file(s) failed validation",
            report.failures.len(),
            report.files.len()
        );
    }
    Ok(())
}
