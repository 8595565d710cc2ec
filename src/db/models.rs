//! Records persisted by the stores

use serde::{Deserialize, Serialize};

/// Persisted username and password hash.
///
/// Not `Serialize`; the hash stays inside the store layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Blog record keyed by its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}
