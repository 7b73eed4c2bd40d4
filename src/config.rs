use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::ConfError;

pub const MANIFEST_NAME: &str = "appconf.toml";

const DEFAULT_ROOT: &str = "conf";
const DEFAULT_ENTRY: &str = "app.conf";

/// Where configuration lives: the root directory every include resolves
/// under, and the entry file inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub entry: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self { root: PathBuf::from(DEFAULT_ROOT), entry: PathBuf::from(DEFAULT_ENTRY) }
    }
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlManifest {
    #[serde(default)]
    conf: TomlConf,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConf {
    root: Option<String>,
    entry: Option<String>,
}

impl Config {
    /// Load a manifest file. A relative `root` is taken relative to the
    /// manifest's own directory.
    pub fn load(path: &Path) -> Result<Self, ConfError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Load `dir/appconf.toml` if it exists, otherwise the defaults under `dir`.
    pub fn discover(dir: &Path) -> Result<Self, ConfError> {
        let manifest = dir.join(MANIFEST_NAME);
        if manifest.is_file() {
            return Self::load(&manifest);
        }
        let defaults = Self::default();
        Ok(Self { root: dir.join(defaults.root), entry: defaults.entry })
    }

    pub fn from_toml_str(text: &str, manifest_path: &Path) -> Result<Self, ConfError> {
        let manifest: TomlManifest = toml::from_str(text)
            .map_err(|e| ConfError::manifest(format!("invalid manifest: {e}"), manifest_path.to_path_buf()))?;

        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        let root = base.join(manifest.conf.root.as_deref().unwrap_or(DEFAULT_ROOT));
        let entry = PathBuf::from(manifest.conf.entry.as_deref().unwrap_or(DEFAULT_ENTRY));

        if entry.as_os_str().is_empty() {
            return Err(ConfError::manifest("'conf.entry' must not be empty", manifest_path.to_path_buf()));
        }
        if entry.is_absolute() {
            return Err(ConfError::manifest(
                format!("'conf.entry' must be relative to the root, got '{}'", entry.display()),
                manifest_path.to_path_buf(),
            ));
        }

        Ok(Self { root, entry })
    }

    /// Replace root and entry with command-line values where given.
    pub fn with_overrides(mut self, root: Option<PathBuf>, entry: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.root = root;
        }
        if let Some(entry) = entry {
            self.entry = entry;
        }
        self
    }

    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.entry)
    }
}
