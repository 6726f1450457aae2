use crate::error::{KubescoreError, Result};
use crate::types::config::KubescoreConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "kubescore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".kubescore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/kubescore/config.toml";

/// Loads global, project and local configuration, later files winning.
/// An explicit `config_path` replaces the project file and must exist.
pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<KubescoreConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, config_path, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    config_path: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<KubescoreConfig> {
    let project_path = match config_path {
        Some(path) if !path.exists() => {
            return Err(KubescoreError::PathNotFound(path.display().to_string()));
        }
        Some(path) => path.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &project_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: KubescoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| KubescoreError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!("loading config from {}", path.display());
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| KubescoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
