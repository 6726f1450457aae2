use super::NamedSource;
use crate::error::{KubescoreError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const STDIN_NAME: &str = "-";

/// Reads every input. Directories contribute their `*.yaml`/`*.yml` files in
/// sorted order; `-` reads standard input.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<NamedSource>> {
    let mut sources = Vec::new();
    for path in paths {
        if path.as_os_str() == STDIN_NAME {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            sources.push(NamedSource::new(STDIN_NAME, bytes));
            continue;
        }
        if !path.exists() {
            return Err(KubescoreError::PathNotFound(path.display().to_string()));
        }
        if path.is_dir() {
            for file in list_manifests(path) {
                sources.push(read_file(&file)?);
            }
        } else {
            sources.push(read_file(path)?);
        }
    }
    Ok(sources)
}

fn read_file(path: &Path) -> Result<NamedSource> {
    let bytes = std::fs::read(path)?;
    Ok(NamedSource::new(path.display().to_string(), bytes))
}

pub fn list_manifests(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_manifest(path))
        .collect()
}

fn is_manifest(path: &Path) -> bool {
    let manifest = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if !manifest {
        tracing::debug!("ignoring non-yaml file {}", path.display());
    }
    manifest
}
