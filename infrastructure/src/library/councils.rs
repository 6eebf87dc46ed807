//! Council library
//!
//! Council YAML files are validated on load through [`CouncilConfig`]'s own
//! deserializer. The built-in default council is always available under
//! `default` unless a file replaces it.

use super::error::LibraryError;
use super::yaml_dir::{file_stem, read_yaml, yaml_files};
use council_domain::CouncilConfig;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_COUNCIL_ID: &str = "default";

#[derive(Debug, Clone)]
pub struct CouncilLibrary {
    councils: BTreeMap<String, Arc<CouncilConfig>>,
}

impl Default for CouncilLibrary {
    fn default() -> Self {
        let mut councils = BTreeMap::new();
        councils.insert(
            DEFAULT_COUNCIL_ID.to_string(),
            Arc::new(CouncilConfig::default_council()),
        );
        Self { councils }
    }
}

impl CouncilLibrary {
    /// Load council files from `dir`. A missing directory leaves only the
    /// built-in default council.
    pub fn load_dir(dir: &Path) -> Result<Self, LibraryError> {
        let mut library = Self::default();
        let files = match yaml_files(dir) {
            Ok(files) => files,
            Err(LibraryError::MissingDirectory(path)) => {
                warn!(
                    "Council directory {} not found; using the built-in default council",
                    path.display()
                );
                return Ok(library);
            }
            Err(e) => return Err(e),
        };

        // Files may replace the built-in default once, but not each other
        let mut from_files = std::collections::HashSet::new();
        for path in files {
            let council: CouncilConfig = read_yaml(&path)?;
            let council = if council.id().is_empty() {
                council.with_id(file_stem(&path))
            } else {
                council
            };
            if !from_files.insert(council.id().to_string()) {
                return Err(LibraryError::Duplicate {
                    id: council.id().to_string(),
                    path,
                });
            }
            library
                .councils
                .insert(council.id().to_string(), Arc::new(council));
        }

        info!(
            "Loaded {} council(s) from {}",
            library.councils.len(),
            dir.display()
        );
        Ok(library)
    }

    pub fn get(&self, id: &str) -> Option<Arc<CouncilConfig>> {
        self.councils.get(id).cloned()
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<CouncilConfig>, LibraryError> {
        self.get(id)
            .ok_or_else(|| LibraryError::UnknownCouncil(id.to_string()))
    }

    /// Council ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.councils.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CouncilConfig>> {
        self.councils.values()
    }

    pub fn len(&self) -> usize {
        self.councils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.councils.is_empty()
    }
}
