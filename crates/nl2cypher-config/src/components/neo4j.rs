//! Graph database connection

use serde::{Deserialize, Serialize};

/// Neo4j credentials. Live validation and execution are enabled only when
/// all three are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Borrowed `(uri, user, password)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neo4jCredentials<'a> {
    pub uri: &'a str,
    pub user: &'a str,
    pub password: &'a str,
}

impl Neo4jConfig {
    pub fn credentials(&self) -> Option<Neo4jCredentials<'_>> {
        Some(Neo4jCredentials {
            uri: present(&self.uri)?,
            user: present(&self.user)?,
            password: present(&self.password)?,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
