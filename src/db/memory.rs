//! In-memory store implementations
//!
//! Used for tests and `store.backend = "memory"`. Check-and-set happens under
//! one write lock, so key uniqueness holds under concurrent inserts.

use crate::db::error::{StoreError, StoreResult};
use crate::db::models::{Blog, Credential};
use crate::db::repository::{BlogStore, UserStore};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, Credential>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<()> {
        match self.users.write().await.entry(credential.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(credential.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(credential.clone());
                Ok(())
            }
        }
    }

    async fn fetch(&self, username: &str) -> StoreResult<Credential> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryBlogStore {
    blogs: RwLock<HashMap<String, Blog>>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn exists(&self, slug: &str) -> StoreResult<bool> {
        Ok(self.blogs.read().await.contains_key(slug))
    }

    async fn insert(&self, blog: &Blog) -> StoreResult<()> {
        match self.blogs.write().await.entry(blog.slug.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(blog.slug.clone())),
            Entry::Vacant(slot) => {
                slot.insert(blog.clone());
                Ok(())
            }
        }
    }

    async fn fetch(&self, slug: &str) -> StoreResult<Blog> {
        self.blogs
            .read()
            .await
            .get(slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<Blog>> {
        let mut blogs: Vec<Blog> = self.blogs.read().await.values().cloned().collect();
        blogs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(blogs)
    }

    async fn update(&self, blog: &Blog) -> StoreResult<()> {
        match self.blogs.write().await.get_mut(&blog.slug) {
            Some(existing) => {
                existing.title = blog.title.clone();
                existing.description = blog.description.clone();
                existing.content = blog.content.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(blog.slug.clone())),
        }
    }

    async fn delete(&self, slug: &str) -> StoreResult<()> {
        self.blogs
            .write()
            .await
            .remove(slug)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }
}
