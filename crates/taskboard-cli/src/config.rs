use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use taskboard_core::view::{SortBy, SortDirection, StatusFilter, ViewConfig};

/// User-level configuration loaded from `~/.config/taskboard/config.toml` (platform-specific).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Override for the data directory holding the task file.
    pub data_dir: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset (e.g. `info`, `debug`).
    pub log_level: Option<String>,
    /// Initial filter and sort state for the board.
    pub view: Option<ViewSettings>,
}

/// Starting point for the board's filter and sort controls. Changes made in
/// the UI are not written back here.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ViewSettings {
    pub sort_by: Option<SortBy>,
    pub sort_direction: Option<SortDirection>,
    pub show_completed: Option<bool>,
    pub show_incomplete: Option<bool>,
}

impl Config {
    pub fn view_config(&self) -> ViewConfig {
        let settings = self.view.clone().unwrap_or_default();
        let defaults = StatusFilter::default();
        ViewConfig {
            filter: StatusFilter {
                show_completed: settings.show_completed.unwrap_or(defaults.show_completed),
                show_incomplete: settings
                    .show_incomplete
                    .unwrap_or(defaults.show_incomplete),
            },
            sort_by: settings.sort_by.unwrap_or_default(),
            sort_direction: settings.sort_direction.unwrap_or_default(),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("taskboard").join("config.toml"))
}

/// Write the given config to the default path unless a file is already there.
pub fn write_default_if_missing(config: &Config) -> Result<PathBuf> {
    let path = default_path()?;
    write_to_path_if_missing(config, &path)
}

/// Write `config` to `path`, creating parent directories as needed. An
/// existing file is left untouched so user edits are never clobbered.
pub fn write_to_path_if_missing(config: &Config, path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(config)?;
    fs::write(path, body)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_from_path(dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.view_config(), ViewConfig::default());
        assert_eq!(cfg.log_filter(), "info");
    }

    #[test]
    fn parses_custom_config() {
        let contents = r#"
            data_dir = "/tmp/taskboard-data"
            log_level = "debug"
            [view]
            sort_by = "status"
            sort_direction = "desc"
            show_completed = false
        "#;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");

        let cfg = load_from_path(&path).expect("load");
        assert_eq!(
            cfg,
            Config {
                data_dir: Some(PathBuf::from("/tmp/taskboard-data")),
                log_level: Some("debug".into()),
                view: Some(ViewSettings {
                    sort_by: Some(SortBy::Status),
                    sort_direction: Some(SortDirection::Desc),
                    show_completed: Some(false),
                    show_incomplete: None,
                }),
            }
        );
        assert_eq!(
            cfg.view_config(),
            ViewConfig {
                filter: StatusFilter {
                    show_completed: false,
                    show_incomplete: true,
                },
                sort_by: SortBy::Status,
                sort_direction: SortDirection::Desc,
            }
        );
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[view]\nsort_by = \"alphabet\"\n").expect("write temp config");

        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn write_default_creates_file_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            data_dir: Some(PathBuf::from("/tmp/taskboard-data")),
            log_level: None,
            view: None,
        };

        write_to_path_if_missing(&cfg, &path).expect("write should succeed");
        let other = Config {
            log_level: Some("trace".into()),
            ..cfg.clone()
        };
        let second = write_to_path_if_missing(&other, &path).expect("second write ok");
        assert_eq!(second, path);

        let loaded: Config =
            toml::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(loaded, cfg);
    }
}
