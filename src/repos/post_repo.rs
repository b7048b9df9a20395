/*
 * Responsibility
 * - posts CRUD + like/unlike + feed
 * - author_id の FK (CASCADE) 前提で削除挙動を意識
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult, api_id, db_id};
use crate::repos::store::{Post, PostContent, PostStore};

#[derive(Debug, Clone, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    author_nick: String,
    likes: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = RepoError;

    fn try_from(row: PostRow) -> RepoResult<Self> {
        Ok(Post {
            id: api_id(row.id)?,
            title: row.title,
            content: row.content,
            author_id: api_id(row.author_id)?,
            author_nick: row.author_nick,
            likes: api_id(row.likes)?,
            created_at: row.created_at,
        })
    }
}

fn into_posts(rows: Vec<PostRow>) -> RepoResult<Vec<Post>> {
    rows.into_iter().map(Post::try_from).collect()
}

#[derive(Clone, Debug)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepo {
    async fn create(&self, author_id: u64, content: PostContent) -> RepoResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, content, author_id, likes, created_at
            )
            SELECT p.id, p.title, p.content, p.author_id, u.nick AS author_nick, p.likes, p.created_at
            FROM inserted p
            INNER JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(&content.title)
        .bind(&content.content)
        .bind(db_id(author_id)?)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, post_id: u64) -> RepoResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.title, p.content, p.author_id, u.nick AS author_nick, p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Post::try_from).transpose()
    }

    async fn fetch_owner(&self, post_id: u64) -> RepoResult<Option<u64>> {
        let owner = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT author_id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .fetch_optional(&self.pool)
        .await?;

        owner.map(api_id).transpose()
    }

    async fn feed(&self, user_id: u64) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT DISTINCT p.id, p.title, p.content, p.author_id, u.nick AS author_nick, p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            LEFT JOIN followers f ON p.author_id = f.user_id
            WHERE u.id = $1 OR f.follower_id = $1
            ORDER BY p.id DESC
            "#,
        )
        .bind(db_id(user_id)?)
        .fetch_all(&self.pool)
        .await?;

        into_posts(rows)
    }

    async fn list_by_author(&self, author_id: u64) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.title, p.content, p.author_id, u.nick AS author_nick, p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.id DESC
            "#,
        )
        .bind(db_id(author_id)?)
        .fetch_all(&self.pool)
        .await?;

        into_posts(rows)
    }

    async fn update(&self, post_id: u64, content: PostContent) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, content = $3
            WHERE id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .bind(&content.title)
        .bind(&content.content)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, post_id: u64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn like(&self, post_id: u64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET likes = likes + 1
            WHERE id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unlike(&self, post_id: u64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET likes = CASE WHEN likes > 0 THEN likes - 1 ELSE likes END
            WHERE id = $1
            "#,
        )
        .bind(db_id(post_id)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
