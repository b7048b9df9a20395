pub mod error;
#[cfg(test)]
pub mod memory;
pub mod post_repo;
pub mod store;
pub mod user_repo;

use sqlx::migrate::Migrator;

pub use post_repo::PgPostRepo;
pub use store::{PostStore, UserStore};
pub use user_repo::PgUserRepo;

/// Schema under `migrations/`, embedded at compile time and applied by `app::build_state`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_schema_is_embedded() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1]);

        let init = MIGRATOR.iter().next().unwrap();
        assert_eq!(init.description, "init");
        for table in ["users", "followers", "posts"] {
            assert!(
                init.sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "{table}"
            );
        }
    }
}
