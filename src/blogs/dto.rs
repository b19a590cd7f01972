use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::blogs::repo::Blog;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Partial update: only fields present in the body change. Absent and null
/// are both "leave untouched" here, matching the source API.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateBlogRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if !(3..=100).contains(&len) {
        return Err(ApiError::Validation(
            "Title must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.chars().count() < 10 {
        return Err(ApiError::Validation(
            "Content must be at least 10 characters".into(),
        ));
    }
    Ok(())
}

/// Tags behave as a set: duplicates collapse to their first occurrence so
/// display keeps the order the author wrote them in.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl BlogResponse {
    pub fn new(blog: Blog, author_username: String) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            content: blog.content,
            tags: blog.tags,
            author_id: blog.author_id,
            author_username,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBlogsParams {
    pub tag: Option<String>,
    pub author_id: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl ListBlogsParams {
    pub fn page(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, 100))
    }
}
