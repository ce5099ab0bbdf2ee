//! Data store adapter: all queries against the `authors` and `blog_posts`
//! collections. Posts are always read with their author reference resolved
//! through an explicit join; absence is reported as `Option`/`bool`, never
//! as an error.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::db::models::{Author, AuthorUpdate, PostUpdate, ResolvedPost};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, user_name";

const RESOLVED_POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.title, p.content, p.created, p.comments,
           a.first_name AS author_first_name,
           a.last_name AS author_last_name
    FROM blog_posts p
    LEFT JOIN authors a ON a.id = p.author_id
"#;

pub async fn list_authors(pool: &PgPool) -> Result<Vec<Author>, sqlx::Error> {
    sqlx::query_as::<_, Author>(&format!(
        "SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY user_name"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_author(pool: &PgPool, id: Uuid) -> Result<Option<Author>, sqlx::Error> {
    sqlx::query_as::<_, Author>(&format!(
        "SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Look up an author by user name, optionally excluding one id. The
/// exclusion is what makes the uniqueness check on update ignore the
/// author being updated.
pub async fn find_author_by_user_name(
    pool: &PgPool,
    user_name: &str,
    exclude: Option<Uuid>,
) -> Result<Option<Author>, sqlx::Error> {
    match exclude {
        Some(id) => {
            sqlx::query_as::<_, Author>(&format!(
                "SELECT {AUTHOR_COLUMNS} FROM authors WHERE user_name = $1 AND id <> $2"
            ))
            .bind(user_name)
            .bind(id)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Author>(&format!(
                "SELECT {AUTHOR_COLUMNS} FROM authors WHERE user_name = $1"
            ))
            .bind(user_name)
            .fetch_optional(pool)
            .await
        }
    }
}

pub async fn create_author(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    user_name: &str,
) -> Result<Author, sqlx::Error> {
    sqlx::query_as::<_, Author>(&format!(
        r#"
        INSERT INTO authors (first_name, last_name, user_name)
        VALUES ($1, $2, $3)
        RETURNING {AUTHOR_COLUMNS}
        "#
    ))
    .bind(first_name)
    .bind(last_name)
    .bind(user_name)
    .fetch_one(pool)
    .await
}

/// Apply only the provided fields; `None` leaves a column untouched.
/// Returns `None` when no author has the given id.
pub async fn update_author(
    pool: &PgPool,
    id: Uuid,
    update: AuthorUpdate,
) -> Result<Option<Author>, sqlx::Error> {
    sqlx::query_as::<_, Author>(&format!(
        r#"
        UPDATE authors
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            user_name = COALESCE($4, user_name)
        WHERE id = $1
        RETURNING {AUTHOR_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.first_name)
    .bind(update.last_name)
    .bind(update.user_name)
    .fetch_optional(pool)
    .await
}

pub async fn delete_author<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_posts_by_author<'e>(
    executor: impl PgExecutor<'e>,
    author_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE author_id = $1")
        .bind(author_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Cascade delete: the author's posts and the author itself go in one
/// transaction, so a partial failure leaves nothing half-deleted.
pub async fn delete_author_cascade(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let posts_removed = delete_posts_by_author(&mut *tx, id).await?;
    let authors_removed = delete_author(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(
        author_id = %id,
        posts_removed,
        "deleted author profile and their blog posts"
    );

    Ok(authors_removed)
}

pub async fn list_posts(pool: &PgPool) -> Result<Vec<ResolvedPost>, sqlx::Error> {
    sqlx::query_as::<_, ResolvedPost>(&format!(
        "{RESOLVED_POST_SELECT} ORDER BY p.created, p.id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_post(pool: &PgPool, id: Uuid) -> Result<Option<ResolvedPost>, sqlx::Error> {
    sqlx::query_as::<_, ResolvedPost>(&format!("{RESOLVED_POST_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a post and hand it back already resolved. The CTE lets the
/// insert and the author join run as one statement.
pub async fn create_post(
    pool: &PgPool,
    title: &str,
    content: Option<&str>,
    author_id: Uuid,
) -> Result<ResolvedPost, sqlx::Error> {
    sqlx::query_as::<_, ResolvedPost>(
        r#"
        WITH inserted AS (
            INSERT INTO blog_posts (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, title, content, created, comments
        )
        SELECT i.id, i.author_id, i.title, i.content, i.created, i.comments,
               a.first_name AS author_first_name,
               a.last_name AS author_last_name
        FROM inserted i
        LEFT JOIN authors a ON a.id = i.author_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(pool)
    .await
}

/// Apply only the provided fields among title/content/author. Returns
/// whether a post with the given id existed.
pub async fn update_post(pool: &PgPool, id: Uuid, update: PostUpdate) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = COALESCE($2, title),
            content = COALESCE($3, content),
            author_id = COALESCE($4, author_id)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(update.title)
    .bind(update.content)
    .bind(update.author_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
