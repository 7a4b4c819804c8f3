//! Configuration management for blockfund

use crate::crypto::MAX_KEY_VAL;
use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File read by [`load_config`] when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "blockfund.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub course: CourseConfig,
    #[serde(default)]
    pub keys: KeyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_exercises_dir")]
    pub exercises_dir: String,
    #[serde(default = "default_solutions_dir")]
    pub solutions_dir: String,
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exercises_dir: default_exercises_dir(),
            solutions_dir: default_solutions_dir(),
            entry_point: default_entry_point(),
        }
    }
}

impl CourseConfig {
    pub fn exercises_root(&self) -> PathBuf {
        self.root.join(&self.exercises_dir)
    }

    pub fn solutions_root(&self) -> PathBuf {
        self.root.join(&self.solutions_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    /// Exclusive upper bound for generated primes.
    #[serde(default = "default_max_key_value")]
    pub max_key_value: u32,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            max_key_value: default_max_key_value(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exercises_dir() -> String {
    "exercises".to_string()
}

fn default_solutions_dir() -> String {
    "solutions".to_string()
}

fn default_entry_point() -> String {
    "src/main.rs".to_string()
}

fn default_max_key_value() -> u32 {
    MAX_KEY_VAL
}

/// Contents of the default config file, or an empty string when it does not
/// exist. Any other read failure is an error.
fn read_default_config(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ChainError::ConfigError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when `path` is `None`.
///
/// A missing default file yields the built-in defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_str = match path {
        Some(p) => fs::read_to_string(p).map_err(|e| {
            ChainError::ConfigError(format!("Failed to read {}: {}", p.display(), e))
        })?,
        None => read_default_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate critical values
    pub fn validate(&self) -> Result<()> {
        if self.course.exercises_dir.is_empty() {
            return Err(ChainError::ConfigError(
                "course.exercises_dir must not be empty".to_string(),
            ));
        }
        if self.course.solutions_dir.is_empty() {
            return Err(ChainError::ConfigError(
                "course.solutions_dir must not be empty".to_string(),
            ));
        }
        if self.course.exercises_dir == self.course.solutions_dir {
            return Err(ChainError::ConfigError(
                "course.exercises_dir and course.solutions_dir must differ".to_string(),
            ));
        }
        if self.course.entry_point.is_empty() {
            return Err(ChainError::ConfigError(
                "course.entry_point must not be empty".to_string(),
            ));
        }

        // p * q must fit in a u32, and 3..max must contain two distinct primes
        if self.keys.max_key_value < 6 || self.keys.max_key_value > MAX_KEY_VAL {
            return Err(ChainError::ConfigError(format!(
                "keys.max_key_value must be between 6 and {}, got {}",
                MAX_KEY_VAL, self.keys.max_key_value
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.course.exercises_root(), PathBuf::from("./exercises"));
        assert_eq!(config.course.solutions_root(), PathBuf::from("./solutions"));
        assert_eq!(config.keys.max_key_value, 65536);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[course]\nroot = \"/srv/course\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.course.root, PathBuf::from("/srv/course"));
        assert_eq!(config.course.entry_point, "src/main.rs");
        assert_eq!(config.keys.max_key_value, MAX_KEY_VAL);
    }

    #[test]
    fn test_rejects_oversized_key_bound() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[keys]\nmax_key_value = 70000").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("keys.max_key_value"));
    }

    #[test]
    fn test_rejects_same_exercise_and_solution_dirs() {
        let mut config = Config::default();
        config.course.solutions_dir = "exercises".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_file_absent_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let contents = read_default_config(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_unreadable_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let result = read_default_config(&path);
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/blockfund.toml")));
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }
}
