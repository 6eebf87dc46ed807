//! YAML-backed constitution and council libraries

mod constitutions;
mod councils;
mod error;
mod yaml_dir;

pub use constitutions::ConstitutionLibrary;
pub use councils::{CouncilLibrary, DEFAULT_COUNCIL_ID};
pub use error::LibraryError;
