//! Presentation layer for constitutional-council
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP API surface.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputArg, RunArgs, ServeArgs, VoteArgs};
pub use http::{AppState, Catalog, RequestDefaults, create_router};
pub use output::console::ConsoleFormatter;
pub use output::formatter::BriefFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
