/*
 * Responsibility
 * - users / followers テーブル向け SQLx 操作
 * - PgPool を受け取り UserStore を実装
 * - DB エラーは RepoError に変換して返す (unique 違反は Conflict)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult, api_id, db_id};
use crate::repos::store::{LoginRecord, NewUser, User, UserProfile, UserStore};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    nick: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> RepoResult<Self> {
        Ok(User {
            id: api_id(row.id)?,
            name: row.name,
            nick: row.nick,
            email: row.email,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct LoginRow {
    id: i64,
    password_hash: String,
}

fn into_users(rows: Vec<UserRow>) -> RepoResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, nick, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, nick, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.nick)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.try_into()
    }

    async fn search(&self, name_or_nick: &str) -> RepoResult<Vec<User>> {
        let pattern = format!("%{}%", escape_like(name_or_nick));
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, nick, email, created_at
            FROM users
            WHERE name ILIKE $1 ESCAPE '\' OR nick ILIKE $1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }

    async fn get(&self, user_id: u64) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, nick, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(db_id(user_id)?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_profile(&self, user_id: u64, profile: UserProfile) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, nick = $3, email = $4
            WHERE id = $1
            "#,
        )
        .bind(db_id(user_id)?)
        .bind(&profile.name)
        .bind(&profile.nick)
        .bind(&profile.email)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: u64) -> RepoResult<bool> {
        // followers / posts rows go with ON DELETE CASCADE
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(db_id(user_id)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_login_by_email(&self, email: &str) -> RepoResult<Option<LoginRecord>> {
        let row = sqlx::query_as::<_, LoginRow>(
            r#"
            SELECT id, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(LoginRecord {
                user_id: api_id(r.id)?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    async fn fetch_password_hash(&self, user_id: u64) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"
            SELECT password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(db_id(user_id)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn update_password_hash(&self, user_id: u64, password_hash: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            "#,
        )
        .bind(db_id(user_id)?)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn follow(&self, user_id: u64, follower_id: u64) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO followers (user_id, follower_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(db_id(user_id)?)
        .bind(db_id(follower_id)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unfollow(&self, user_id: u64, follower_id: u64) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM followers
            WHERE user_id = $1 AND follower_id = $2
            "#,
        )
        .bind(db_id(user_id)?)
        .bind(db_id(follower_id)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn followers(&self, user_id: u64) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.nick, u.email, u.created_at
            FROM users u
            INNER JOIN followers f ON u.id = f.follower_id
            WHERE f.user_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(db_id(user_id)?)
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }

    async fn following(&self, user_id: u64) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.nick, u.email, u.created_at
            FROM users u
            INNER JOIN followers f ON u.id = f.user_id
            WHERE f.follower_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(db_id(user_id)?)
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }
}

// `%` / `_` in the search term match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
