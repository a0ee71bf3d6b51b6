use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct RewindConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub mappings: MappingsSection,
    #[serde(default)]
    pub items: ItemsSection,
    #[serde(default)]
    pub replay: ReplaySection,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MappingsSection {
    /// JSON file with the 1.14 → 1.13.2 id tables.
    #[serde(default = "default_mappings_path")]
    pub path: String,
}

fn default_mappings_path() -> String {
    "mappings/1.14-to-1.13.2.json".into()
}

impl Default for MappingsSection {
    fn default() -> Self {
        Self {
            path: default_mappings_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemsSection {
    /// Prefix for NBT keys that hold data the older client cannot show.
    #[serde(default = "default_nbt_namespace")]
    pub nbt_namespace: String,
}

fn default_nbt_namespace() -> String {
    mc_rewind_core::enchantment::DEFAULT_NAMESPACE.into()
}

impl Default for ItemsSection {
    fn default() -> Self {
        Self {
            nbt_namespace: default_nbt_namespace(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReplaySection {
    /// JSON-lines capture files, one connection each.
    #[serde(default)]
    pub captures: Vec<String>,
    /// Where rewritten captures are written. Nothing is written when unset.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl RewindConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
