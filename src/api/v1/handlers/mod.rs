pub mod health;
pub mod login;
pub mod posts;
pub mod users;
