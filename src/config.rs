use crate::error::{Error, Result};
use crate::icons::DEFAULT_SEPARATOR;
use crate::richtext::styled_text::{CompileOptions, DEFAULT_BULLET};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "";
const APPLICATION: &str = "unistyle";
const CONFIG_FILE_NAME: &str = "config.toml";

/// User settings, read from `config.toml` in the platform config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glyph in front of list items
    pub bullet: String,
    /// Text inserted by the separator command
    pub separator: String,
    /// Normalize line endings, smart quotes and dashes when pasting
    pub sanitize_paste: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bullet: DEFAULT_BULLET.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            sanitize_paste: true,
        }
    }
}

impl Config {
    /// Where the config file lives on this platform, if there is a home directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file means defaults
    pub fn load(path: &Path) -> Result<Config> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(Error::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            bullet: self.bullet.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("bullet = \"🔹\"").unwrap();
        assert_eq!(config.bullet, "🔹");
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert!(config.sanitize_paste);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("unistyle-no-such-dir/config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("unistyle-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "sanitize_paste = \"maybe\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("invalid config file"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config {
            bullet: "▪️".to_string(),
            separator: "---".to_string(),
            sanitize_paste: false,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
        assert_eq!(config.compile_options().bullet, "▪️");
    }
}
