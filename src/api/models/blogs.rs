use serde::Deserialize;

/// Request body for creating a blog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

/// Request body for updating a blog; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.content.is_none()
    }
}
