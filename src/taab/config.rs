use crate::error::{Result, TaabError};
use crate::model::SchemaVariant;
use crate::store::DEFAULT_SLOT_KEY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for taab, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaabConfig {
    /// Column layout for forms, import and export
    #[serde(default)]
    pub schema: SchemaVariant,

    /// Whether exports carry attached images
    #[serde(default)]
    pub include_images: bool,

    /// Name of the persistence slot
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Where exports go when no `--out` is given (current dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

impl Default for TaabConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVariant::default(),
            include_images: false,
            storage_key: default_storage_key(),
            export_dir: None,
        }
    }
}

impl TaabConfig {
    pub const KEYS: [&'static str; 4] = ["schema", "include_images", "storage_key", "export_dir"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: TaabConfig = serde_json::from_str(&content)
            .map_err(|e| TaabError::Config(format!("{}: {}", config_path.display(), e)))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "schema" => Some(self.schema.to_string()),
            "include_images" => Some(self.include_images.to_string()),
            "storage_key" => Some(self.storage_key.clone()),
            "export_dir" => Some(
                self.export_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "schema" => self.schema = value.parse()?,
            "include_images" => {
                self.include_images = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => return Err(format!("Expected true or false, got '{}'", other)),
                }
            }
            "storage_key" => self.storage_key = check_storage_key(value)?,
            "export_dir" => {
                self.export_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value.trim()))
                }
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

/// The slot lives next to the config file as `<key>.json`, so a key must be
/// a plain file stem that cannot land on `config.json` (filesystems may be
/// case-insensitive) or look like a hidden temp file.
fn check_storage_key(value: &str) -> std::result::Result<String, String> {
    let key = value.trim();
    let slot_file = format!("{}.json", key);
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\'])
        || slot_file.eq_ignore_ascii_case(CONFIG_FILENAME)
    {
        return Err(format!("Invalid storage key '{}'", value));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TaabConfig::default();
        assert_eq!(config.schema, SchemaVariant::Institution);
        assert!(!config.include_images);
        assert_eq!(config.storage_key, "taabEntries");
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = TaabConfig::load(temp.path()).unwrap();
        assert_eq!(config, TaabConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested");

        let mut config = TaabConfig::default();
        config.set("schema", "generic").unwrap();
        config.set("include_images", "yes").unwrap();
        config.save(&dir).unwrap();

        let loaded = TaabConfig::load(&dir).unwrap();
        assert_eq!(loaded.schema, SchemaVariant::Generic);
        assert!(loaded.include_images);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), r#"{"schema":"branded"}"#).unwrap();
        let config = TaabConfig::load(temp.path()).unwrap();
        assert_eq!(config.schema, SchemaVariant::Branded);
        assert_eq!(config.storage_key, "taabEntries");
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), "{").unwrap();
        assert!(matches!(
            TaabConfig::load(temp.path()),
            Err(TaabError::Config(_))
        ));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = TaabConfig::default();
        assert!(config.set("schema", "spreadsheet").is_err());
        assert!(config.set("include_images", "maybe").is_err());
        assert!(config.set("storage_key", "a/b").is_err());
        assert!(config.set("storage_key", "config").is_err());
        assert!(config.set("storage_key", " Config ").is_err());
        assert!(config.set("storage_key", ".hidden").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, TaabConfig::default());
    }

    #[test]
    fn test_storage_key_never_shares_the_config_file() {
        let temp = TempDir::new().unwrap();
        let mut config = TaabConfig::default();
        config.set("storage_key", "scans").unwrap();
        assert_eq!(config.storage_key, "scans");
        assert!(config.set("storage_key", "config").is_err());
        config.save(temp.path()).unwrap();

        let loaded = TaabConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.storage_key, "scans");
    }

    #[test]
    fn test_get_every_key() {
        let config = TaabConfig::default();
        for key in TaabConfig::KEYS {
            assert!(config.get(key).is_some(), "{} should be readable", key);
        }
        assert_eq!(config.get("nope"), None);
    }
}
