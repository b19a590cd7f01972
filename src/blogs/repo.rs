use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Blog record in the database. `author_id` is a plain reference, not a
/// foreign key; readers tolerate authors that no longer exist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn create(
    db: &PgPool,
    author_id: Uuid,
    title: &str,
    content: &str,
    tags: &[String],
) -> Result<Blog, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, content, tags, author_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, content, tags, author_id, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(tags)
    .bind(author_id)
    .fetch_one(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        SELECT id, title, content, tags, author_id, created_at, updated_at
        FROM blogs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list(
    db: &PgPool,
    tag: Option<&str>,
    author_id: Option<Uuid>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        SELECT id, title, content, tags, author_id, created_at, updated_at
        FROM blogs
        WHERE ($1::text IS NULL OR $1 = ANY(tags))
          AND ($2::uuid IS NULL OR author_id = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(tag)
    .bind(author_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(db)
    .await
}

/// Applies a partial update in a single statement conditioned on both id and
/// author, so the ownership check cannot race the mutation. Absent fields
/// keep their stored value. Returns None when no row matched; the caller
/// decides between NotFound and Forbidden.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    author_id: Uuid,
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs SET
            title = COALESCE($3::text, title),
            content = COALESCE($4::text, content),
            tags = COALESCE($5::text[], tags),
            updated_at = now()
        WHERE id = $1 AND author_id = $2
        RETURNING id, title, content, tags, author_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(title)
    .bind(content)
    .bind(tags)
    .fetch_optional(db)
    .await
}

/// Deletes only when the requester is the author; one conditional statement,
/// same as update. Returns the number of rows removed.
pub async fn delete(db: &PgPool, id: Uuid, author_id: Uuid) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        r#"
        DELETE FROM blogs
        WHERE id = $1 AND author_id = $2
        "#,
    )
    .bind(id)
    .bind(author_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected())
}
