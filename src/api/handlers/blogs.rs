use super::{parse_json, AppState};
use crate::api::models::{BlogDraft, BlogPatch};
use crate::auth::models::AuthenticatedIdentity;
use crate::core::error::{InkwellError, Result};
use crate::core::slug::slugify;
use crate::db::error::StoreError;
use crate::db::models::Blog;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};

pub const BLOG_EXISTS_MESSAGE: &str = "Blog already exists";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

fn not_found_or(err: StoreError) -> InkwellError {
    match err {
        StoreError::NotFound(_) => InkwellError::NotFound(NOT_FOUND_MESSAGE.to_string()),
        other => other.into(),
    }
}

fn rfc3339_at(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

/// Handler for POST /blog - Create a blog owned by the caller
pub async fn create_blog(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    body: Bytes,
) -> Result<Json<Blog>> {
    let draft: BlogDraft = parse_json(&body)?;

    if draft.title.trim().is_empty() {
        return Err(InkwellError::ValidationError(
            "Invalid Request - fields empty".to_string(),
        ));
    }

    let slug = slugify(&draft.title);
    if slug.is_empty() {
        return Err(InkwellError::ValidationError(
            "Invalid Request - title has no usable characters".to_string(),
        ));
    }

    if state.blogs.exists(&slug).await? {
        return Err(InkwellError::Conflict(BLOG_EXISTS_MESSAGE.to_string()));
    }

    let blog = Blog {
        slug,
        title: draft.title,
        description: draft.description,
        content: draft.content,
        author: identity.username,
        created_at: rfc3339_at(state.clock.now()),
    };

    state.blogs.insert(&blog).await.map_err(|e| match e {
        StoreError::DuplicateKey(_) => InkwellError::Conflict(BLOG_EXISTS_MESSAGE.to_string()),
        other => other.into(),
    })?;

    tracing::info!(slug = %blog.slug, author = %blog.author, "Blog created");
    Ok(Json(blog))
}

/// Handler for GET /blog/:slug - Fetch a single blog
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Blog>> {
    let blog = state.blogs.fetch(&slug).await.map_err(not_found_or)?;
    Ok(Json(blog))
}

/// Handler for PUT /blog/:slug - Update title, description or content
///
/// The slug is the blog's key and stays fixed even when the title changes.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    identity: AuthenticatedIdentity,
    body: Bytes,
) -> Result<Json<Blog>> {
    let patch: BlogPatch = parse_json(&body)?;

    if matches!(patch.title.as_deref(), Some(title) if title.trim().is_empty()) {
        return Err(InkwellError::ValidationError(
            "Invalid Request - fields empty".to_string(),
        ));
    }

    let mut blog = state.blogs.fetch(&slug).await.map_err(not_found_or)?;
    if patch.is_empty() {
        return Ok(Json(blog));
    }

    if let Some(title) = patch.title {
        blog.title = title;
    }
    if let Some(description) = patch.description {
        blog.description = description;
    }
    if let Some(content) = patch.content {
        blog.content = content;
    }

    state.blogs.update(&blog).await.map_err(not_found_or)?;

    tracing::info!(slug = %blog.slug, editor = %identity.username, "Blog updated");
    Ok(Json(blog))
}

/// Handler for DELETE /blog/:slug - Remove a blog
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    identity: AuthenticatedIdentity,
) -> Result<&'static str> {
    state.blogs.delete(&slug).await.map_err(not_found_or)?;

    tracing::info!(slug = %slug, editor = %identity.username, "Blog deleted");
    Ok("Blog deleted")
}

/// Handler for GET /blogs - List all blogs, newest first
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>> {
    let blogs = state.blogs.list().await?;
    Ok(Json(blogs))
}
