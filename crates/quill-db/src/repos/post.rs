use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quill_common::models::post::Post;
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str =
    "post_id, title, description, category, author_id, author_name, image, created_at, updated_at";

/// Post row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub post_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            post_id: row.post_id,
            title: row.title,
            description: row.description,
            category: row.category,
            author_id: row.author_id,
            author_name: row.author_name,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for post operations.
///
/// The store trusts its caller: authorization is decided before any of
/// these methods run.
pub struct PostRepo;

impl PostRepo {
    /// Create a new post owned by `author_id`. `author_name` is the
    /// username snapshot taken at creation time.
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        author_name: &str,
        title: &str,
        description: &str,
        category: &str,
        image: Option<&str>,
    ) -> Result<PostRow> {
        let post_id = Uuid::new_v4();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO post (post_id, title, description, category, author_id, author_name, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(author_id)
        .bind(author_name)
        .bind(image)
        .fetch_one(pool)
        .await
        .context("Failed to create post")?;
        Ok(row)
    }

    /// Get post by ID
    pub async fn get(pool: &PgPool, post_id: Uuid) -> Result<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM post WHERE post_id = $1",
            POST_COLUMNS
        ))
        .bind(post_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;
        Ok(row)
    }

    /// Rewrite the mutable columns and refresh updated_at. Identity and
    /// authorship columns are never in the SET list.
    pub async fn update(
        pool: &PgPool,
        post_id: Uuid,
        title: &str,
        description: &str,
        category: &str,
        image: Option<&str>,
    ) -> Result<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE post
            SET title = $2, description = $3, category = $4, image = $5, updated_at = NOW()
            WHERE post_id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(image)
        .fetch_optional(pool)
        .await
        .context("Failed to update post")?;
        Ok(row)
    }

    /// Physical removal. Returns false when no row had this id, so a second
    /// delete of the same post reports NotFound rather than success.
    pub async fn delete(pool: &PgPool, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await
            .context("Failed to delete post")?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts, newest first. `search` is a case-insensitive substring
    /// match over title OR description OR category; `category` is an exact
    /// equality filter; the two combine with AND.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<PostRow>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {} FROM post
            WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1 OR category ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY created_at DESC
            "#,
            POST_COLUMNS
        ))
        .bind(pattern)
        .bind(category)
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;
        Ok(rows)
    }

    /// All posts by one author, newest first.
    pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM post WHERE author_id = $1 ORDER BY created_at DESC",
            POST_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(pool)
        .await
        .context("Failed to list posts by author")?;
        Ok(rows)
    }

    /// Every category present on at least one post, ascending.
    pub async fn distinct_categories(pool: &PgPool) -> Result<Vec<String>> {
        let categories =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM post ORDER BY category")
                .fetch_all(pool)
                .await
                .context("Failed to list distinct categories")?;
        Ok(categories)
    }
}
