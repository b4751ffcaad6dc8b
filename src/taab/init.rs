use crate::api::TaabApi;
use crate::config::TaabConfig;
use crate::error::{Result, TaabError};
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides the data directory (used by tests and portable installs).
pub const HOME_ENV: &str = "TAAB_HOME";

pub struct TaabContext {
    pub api: TaabApi<FsBackend>,
    pub data_dir: PathBuf,
}

/// `$TAAB_HOME` if set and non-empty, else the platform data directory.
pub fn data_dir(home_override: Option<&str>) -> Result<PathBuf> {
    if let Some(home) = home_override {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let proj_dirs = ProjectDirs::from("com", "taab", "taab")
        .ok_or_else(|| TaabError::Config("Could not determine data dir".to_string()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

pub fn initialize_at(data_dir: &Path) -> Result<TaabContext> {
    let config = TaabConfig::load(data_dir)?;
    let backend = FsBackend::new(data_dir.to_path_buf());
    let api = TaabApi::new(backend, config, data_dir.to_path_buf());
    Ok(TaabContext {
        api,
        data_dir: data_dir.to_path_buf(),
    })
}

pub fn initialize() -> Result<TaabContext> {
    let home = std::env::var(HOME_ENV).ok();
    let dir = data_dir(home.as_deref())?;
    initialize_at(&dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaVariant;
    use crate::store::Restored;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn override_wins_over_platform_dir() {
        assert_eq!(
            data_dir(Some("/tmp/taab-test")).unwrap(),
            PathBuf::from("/tmp/taab-test")
        );
    }

    #[test]
    fn blank_override_is_ignored() {
        // Falls through to the platform dir, which may or may not resolve here
        if let Ok(dir) = data_dir(Some("  ")) {
            assert_ne!(dir, PathBuf::from("  "));
        }
    }

    #[test]
    fn initialize_reads_config_and_slot() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.json"),
            r#"{"schema":"generic","storage_key":"scans"}"#,
        )
        .unwrap();
        fs::write(temp.path().join("scans.json"), r#"[{"cardId":"Z1"}]"#).unwrap();

        let ctx = initialize_at(temp.path()).unwrap();
        assert_eq!(ctx.api.schema(), SchemaVariant::Generic);
        assert_eq!(ctx.api.restored(), &Restored::Entries(1));
    }

    #[test]
    fn fresh_dir_starts_empty() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize_at(&temp.path().join("new")).unwrap();
        assert_eq!(ctx.api.restored(), &Restored::Empty);
        assert_eq!(ctx.api.schema(), SchemaVariant::Institution);
    }
}
