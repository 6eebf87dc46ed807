//! Server configuration from TOML (`[server]` section)

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address the HTTP API binds to
    pub listen: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
        }
    }
}

impl FileServerConfig {
    /// Parse the listen address, reporting an issue instead of failing
    pub fn parse_listen(&self) -> (Option<SocketAddr>, Vec<ConfigIssue>) {
        match self.listen.parse() {
            Ok(addr) => (Some(addr), Vec::new()),
            Err(_) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidListenAddress,
                    format!("server.listen: '{}' is not a socket address", self.listen),
                )],
            ),
        }
    }
}
