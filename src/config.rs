use crate::error::{Result, ScoreError};
use crate::types::config::Settings;
use std::path::{Path, PathBuf};
use toml::Value;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "clientscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".clientscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/clientscore/config.toml";

/// Loads settings for `root`: built-in defaults, then the global file under
/// `$HOME`, then the project file, then the local override.
pub fn load_settings(root: &Path) -> Result<Settings> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_settings_with_global(root, global.as_deref())
}

pub(crate) fn load_settings_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Settings> {
    let mut merged = Value::try_from(Settings::default())
        .map_err(|e| ScoreError::ConfigParse(e.to_string()))?;
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    merged
        .try_into()
        .map_err(|e: toml::de::Error| ScoreError::ConfigParse(e.to_string()))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
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

/// Read/write access to the persisted settings.
pub trait ConfigStore {
    fn get(&self) -> Result<Settings>;

    /// Validates `settings` and persists them. Invalid settings are rejected
    /// and the stored value is left untouched.
    fn set(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings layered from files under a project root; writes go to the
/// project file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    root: PathBuf,
    global: Option<PathBuf>,
}

impl FileConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global: std::env::var_os("HOME")
                .map(PathBuf::from)
                .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE)),
        }
    }

    pub fn without_global(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global: None,
        }
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self) -> Result<Settings> {
        load_settings_with_global(&self.root, self.global.as_deref())
    }

    fn set(&mut self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        let path = self.project_file();
        std::fs::write(&path, toml::to_string_pretty(settings)?)?;
        info!(path = %path.display(), "settings written");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    settings: Settings,
}

impl MemoryConfigStore {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn set(&mut self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.settings = settings.clone();
        Ok(())
    }
}

/// Overwrites the stored settings with the built-in defaults.
pub fn reset_to_default(store: &mut dyn ConfigStore) -> Result<Settings> {
    let settings = Settings::default();
    store.set(&settings)?;
    Ok(settings)
}

/// Flips the `enabled` switch, leaving every other setting as stored.
pub fn set_enabled(store: &mut dyn ConfigStore, enabled: bool) -> Result<Settings> {
    let mut settings = store.get()?;
    settings.enabled = enabled;
    store.set(&settings)?;
    Ok(settings)
}
