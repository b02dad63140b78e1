use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use tutorial_world::{BlockSettings, DEFAULT_CONTAINER_CAPACITY};

pub const DEFAULT_CONFIG_PATH: &str = "config/tutorial.toml";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Slot count of the trash block.
    pub trash_capacity: usize,
    /// Crafting bench tier.
    pub bench_tier: u8,
    /// Recipe categories offered by the crafting bench.
    pub bench_categories: Vec<String>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            trash_capacity: DEFAULT_CONTAINER_CAPACITY,
            bench_tier: 1,
            bench_categories: vec!["tutorial".to_string()],
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PluginConfig {
    /// Read and parse a config file, returning errors to the caller.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Report why `path` could not be used and return the defaults.
    pub fn fallback(path: &Path, err: &anyhow::Error) -> Self {
        let missing = err
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
        if missing && path == Path::new(DEFAULT_CONFIG_PATH) {
            warn!("Plugin config not found at {}. Using defaults", path.display());
        } else {
            warn!("{err:#}. Using defaults");
        }
        PluginConfig::default()
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn block_settings(&self) -> BlockSettings {
        BlockSettings {
            trash_capacity: self.trash_capacity,
            bench_tier: self.bench_tier,
            bench_categories: self.bench_categories.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "tutorial-config-{name}-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let cfg: PluginConfig = toml::from_str("trash_capacity = 9").unwrap();
        assert_eq!(cfg.trash_capacity, 9);
        assert_eq!(cfg.bench_tier, 1);
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn unreadable_or_invalid_files_fall_back_to_defaults() {
        let dir = temp_dir("invalid");
        let missing = dir.join("missing.toml");
        let err = PluginConfig::read(&missing).unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(PluginConfig::fallback(&missing, &err), PluginConfig::default());

        let path = dir.join("bad.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "trash_capacity = \"lots\"").unwrap();
        let err = PluginConfig::read(&path).unwrap_err();
        assert_eq!(PluginConfig::fallback(&path, &err), PluginConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = temp_dir("save").join("nested/tutorial.toml");
        let cfg = PluginConfig {
            trash_capacity: 54,
            bench_tier: 3,
            bench_categories: vec!["tools".into(), "decor".into()],
            log_filter: "debug".into(),
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(PluginConfig::read(&path).unwrap(), cfg);
        assert_eq!(cfg.block_settings().trash_capacity, 54);
    }
}
