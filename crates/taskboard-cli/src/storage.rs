use std::path::PathBuf;

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use taskboard_storage::file_store::FileStore;
use tracing::debug;

/// Resolve the default data directory for Taskboard.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("taskboard"))
}

/// Build the file store, honoring a `data_dir` override from config.
pub fn store_from_config(config: &Config) -> Result<FileStore> {
    if let Some(root) = &config.data_dir {
        debug!(?root, "initializing file store (config override)");
        return Ok(FileStore::new(root.clone()));
    }

    let root = default_data_dir()?;
    debug!(?root, "initializing file store");
    Ok(FileStore::new(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_override_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let store = store_from_config(&cfg).expect("store");
        assert_eq!(store.root(), dir.path());
    }
}
