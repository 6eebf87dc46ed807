//! Constitution library
//!
//! Loaded once per process from a directory of YAML files. Sessions receive
//! shared `Arc<ConstitutionConfig>` handles and never mutate them.

use super::error::LibraryError;
use super::yaml_dir::{read_yaml, yaml_files};
use council_domain::ConstitutionConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ConstitutionLibrary {
    // File order; lookups go through `index`
    constitutions: Vec<Arc<ConstitutionConfig>>,
    index: HashMap<String, usize>,
}

impl ConstitutionLibrary {
    /// Load every `*.yaml` / `*.yml` file under `dir`
    pub fn load_dir(dir: &Path) -> Result<Self, LibraryError> {
        let mut library = Self::default();
        for path in yaml_files(dir)? {
            let constitution: ConstitutionConfig = read_yaml(&path)?;
            library.insert(constitution, &path)?;
        }
        info!(
            "Loaded {} constitution(s) from {}",
            library.len(),
            dir.display()
        );
        Ok(library)
    }

    /// Build a library from in-memory definitions
    pub fn from_constitutions(
        constitutions: impl IntoIterator<Item = ConstitutionConfig>,
    ) -> Result<Self, LibraryError> {
        let mut library = Self::default();
        for constitution in constitutions {
            let origin = PathBuf::from(format!("<{}>", constitution.id));
            library.insert(constitution, &origin)?;
        }
        Ok(library)
    }

    fn insert(
        &mut self,
        constitution: ConstitutionConfig,
        path: &Path,
    ) -> Result<(), LibraryError> {
        constitution
            .validate()
            .map_err(|source| LibraryError::Invalid {
                path: path.to_path_buf(),
                source,
            })?;
        if self.index.contains_key(&constitution.id) {
            return Err(LibraryError::Duplicate {
                id: constitution.id,
                path: path.to_path_buf(),
            });
        }
        self.index
            .insert(constitution.id.clone(), self.constitutions.len());
        self.constitutions.push(Arc::new(constitution));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<ConstitutionConfig>> {
        self.index
            .get(id)
            .map(|&i| Arc::clone(&self.constitutions[i]))
    }

    /// Resolve requested ids in request order; any unknown id fails the lookup
    pub fn resolve<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<Arc<ConstitutionConfig>>, LibraryError> {
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id)
                    .ok_or_else(|| LibraryError::UnknownConstitution(id.to_string()))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ConstitutionConfig>> {
        self.constitutions.iter()
    }

    pub fn len(&self) -> usize {
        self.constitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constitutions.is_empty()
    }
}
