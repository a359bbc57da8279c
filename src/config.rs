//! Project configuration read from `.git-reviewer.toml` at the repository root.
//!
//! Every key is optional. Command-line flags override scalar values and are
//! appended to list values.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".git-reviewer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base: Option<String>,
    pub since: Option<String>,
    pub top: Option<usize>,
    pub jobs: Option<usize>,
    pub ignore_extensions: Vec<String>,
    pub only_extensions: Vec<String>,
    pub ignore_paths: Vec<String>,
    pub only_paths: Vec<String>,
    /// Extra mailmap files, relative to the repository root unless absolute.
    pub mailmap: Vec<PathBuf>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file under `root`, or defaults when there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let mut config = Self::parse(&text, &path)?;
        for file in &mut config.mailmap {
            if file.is_relative() {
                *file = root.join(&*file);
            }
        }
        Ok(config)
    }
}
