//! Store abstractions and their SQLite implementations
//!
//! The traits are the seam between the services and persistence. Each
//! operation touches a single key and is atomic with respect to that key;
//! nothing here spans keys or retries.

use crate::db::error::{StoreError, StoreResult};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Blog, Credential};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Username -> credential persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether a credential exists for `username`
    async fn exists(&self, username: &str) -> StoreResult<bool>;

    /// Insert a new credential; `DuplicateKey` if the username is taken
    async fn insert(&self, credential: &Credential) -> StoreResult<()>;

    /// Fetch a credential; `NotFound` if absent
    async fn fetch(&self, username: &str) -> StoreResult<Credential>;
}

/// Slug -> blog persistence
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn exists(&self, slug: &str) -> StoreResult<bool>;

    /// Insert a new blog; `DuplicateKey` if the slug is taken
    async fn insert(&self, blog: &Blog) -> StoreResult<()>;

    /// Fetch a blog; `NotFound` if absent
    async fn fetch(&self, slug: &str) -> StoreResult<Blog>;

    /// All blogs, newest first
    async fn list(&self) -> StoreResult<Vec<Blog>>;

    /// Replace an existing blog; `NotFound` if absent
    async fn update(&self, blog: &Blog) -> StoreResult<()>;

    /// Remove a blog; `NotFound` if absent
    async fn delete(&self, slug: &str) -> StoreResult<()>;
}

/// SQLite-backed credential store
pub struct SqliteUserStore {
    db: Arc<DatabaseManager>,
}

impl SqliteUserStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn exists(&self, username: &str) -> StoreResult<bool> {
        let username = username.to_string();
        self.db
            .execute(move |conn| {
                let found = conn
                    .query_row(
                        "SELECT 1 FROM users WHERE username = ?",
                        [&username],
                        |_| Ok(()),
                    )
                    .optional()?;
                Ok(found.is_some())
            })
            .await
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<()> {
        let credential = credential.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (username, password_hash) VALUES (?, ?)",
                    rusqlite::params![&credential.username, &credential.password_hash],
                )
                .map_err(|e| StoreError::from_insert(e, &credential.username))?;
                Ok(())
            })
            .await
    }

    async fn fetch(&self, username: &str) -> StoreResult<Credential> {
        let username = username.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT username, password_hash FROM users WHERE username = ?",
                    [&username],
                    |row| {
                        Ok(Credential {
                            username: row.get(0)?,
                            password_hash: row.get(1)?,
                        })
                    },
                )
                .optional()?
                .ok_or(StoreError::NotFound(username))
            })
            .await
    }
}

/// SQLite-backed blog store
pub struct SqliteBlogStore {
    db: Arc<DatabaseManager>,
}

impl SqliteBlogStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

const BLOG_COLUMNS: &str = "slug, title, description, content, author, created_at";

fn blog_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Blog> {
    Ok(Blog {
        slug: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        content: row.get(3)?,
        author: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[async_trait]
impl BlogStore for SqliteBlogStore {
    async fn exists(&self, slug: &str) -> StoreResult<bool> {
        let slug = slug.to_string();
        self.db
            .execute(move |conn| {
                let found = conn
                    .query_row("SELECT 1 FROM blogs WHERE slug = ?", [&slug], |_| Ok(()))
                    .optional()?;
                Ok(found.is_some())
            })
            .await
    }

    async fn insert(&self, blog: &Blog) -> StoreResult<()> {
        let blog = blog.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO blogs (slug, title, description, content, author, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &blog.slug,
                        &blog.title,
                        &blog.description,
                        &blog.content,
                        &blog.author,
                        &blog.created_at,
                    ],
                )
                .map_err(|e| StoreError::from_insert(e, &blog.slug))?;
                Ok(())
            })
            .await
    }

    async fn fetch(&self, slug: &str) -> StoreResult<Blog> {
        let slug = slug.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM blogs WHERE slug = ?", BLOG_COLUMNS),
                    [&slug],
                    blog_from_row,
                )
                .optional()?
                .ok_or(StoreError::NotFound(slug))
            })
            .await
    }

    async fn list(&self) -> StoreResult<Vec<Blog>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM blogs ORDER BY created_at DESC, slug ASC",
                    BLOG_COLUMNS
                ))?;
                let blogs = stmt
                    .query_map([], blog_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(blogs)
            })
            .await
    }

    async fn update(&self, blog: &Blog) -> StoreResult<()> {
        let blog = blog.clone();
        self.db
            .execute(move |conn| {
                let changed = conn.execute(
                    "UPDATE blogs SET title = ?, description = ?, content = ? WHERE slug = ?",
                    rusqlite::params![&blog.title, &blog.description, &blog.content, &blog.slug],
                )?;
                if changed == 0 {
                    return Err(StoreError::NotFound(blog.slug));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, slug: &str) -> StoreResult<()> {
        let slug = slug.to_string();
        self.db
            .execute(move |conn| {
                let changed = conn.execute("DELETE FROM blogs WHERE slug = ?", [&slug])?;
                if changed == 0 {
                    return Err(StoreError::NotFound(slug));
                }
                Ok(())
            })
            .await
    }
}
