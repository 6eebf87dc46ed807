//! Library locations from TOML (`[paths]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePathsConfig {
    /// Directory of constitution YAML files
    pub constitutions: PathBuf,
    /// Directory of council YAML files
    pub councils: PathBuf,
}

impl Default for FilePathsConfig {
    fn default() -> Self {
        Self {
            constitutions: PathBuf::from("constitutions"),
            councils: PathBuf::from("councils"),
        }
    }
}
