use crate::services::{ExportFormat, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bytes read per chunk when importing files
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Directory exports and the example template are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default)]
    pub export_format: ExportFormat,
    /// Editor command; falls back to $VISUAL, $EDITOR, then vim
    #[serde(default)]
    pub editor: Option<String>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_export_dir() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            export_dir: default_export_dir(),
            export_format: ExportFormat::default(),
            editor: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".sqltpl"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the user config, or defaults if it is missing or unreadable
    pub fn load() -> Config {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Config {
        match Self::read_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Config::default()
            }
        }
    }

    /// Strict variant of `load_from`: a missing file gives defaults, an
    /// unreadable or invalid one is an error
    pub fn read_from(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str::<Config>(&contents)?;
        Ok(config.normalized())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(&self.export_dir)
    }

    /// Editor command to launch for in-place editing
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| env::var("VISUAL").ok())
            .or_else(|| env::var("EDITOR").ok())
            .unwrap_or_else(|| "vim".to_string())
    }

    fn normalized(mut self) -> Self {
        if self.chunk_size == 0 {
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        if self.export_dir.trim().is_empty() {
            self.export_dir = default_export_dir();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.chunk_size, 65536);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            chunk_size: 1024,
            export_dir: "/tmp/out".to_string(),
            export_format: ExportFormat::Sql,
            editor: Some("nano".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "export_format": "sql", "chunk_size": 0 }"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.export_format, ExportFormat::Sql);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.export_dir, ".");
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        assert!(Config::read_from(&path).is_err());
    }

    #[test]
    fn test_editor_override() {
        let config = Config {
            editor: Some("hx".to_string()),
            ..Config::default()
        };
        assert_eq!(config.editor_command(), "hx");
    }
}
