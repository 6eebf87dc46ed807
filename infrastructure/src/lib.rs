//! Infrastructure layer for constitutional-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gate;
pub mod http;
pub mod library;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use gate::{GateConfigError, PatternRuleChecker};
pub use http::{HttpAgentInvoker, HttpExpertEvaluator, JsonEndpointClient};
pub use library::{ConstitutionLibrary, CouncilLibrary, DEFAULT_COUNCIL_ID, LibraryError};
pub use logging::JsonlEventLogger;
