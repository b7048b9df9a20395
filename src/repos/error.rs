/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("id out of range: {0}")]
    IdOutOfRange(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}

// ids are u64 in the API and BIGINT in postgres
pub fn db_id(id: u64) -> RepoResult<i64> {
    i64::try_from(id).map_err(|_| RepoError::IdOutOfRange(id.to_string()))
}

pub fn api_id(id: i64) -> RepoResult<u64> {
    u64::try_from(id).map_err(|_| RepoError::IdOutOfRange(id.to_string()))
}
