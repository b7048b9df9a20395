pub mod bearer;
pub mod credential;
pub mod factory;
pub mod ownership;
pub mod password;

pub use credential::CredentialCodec;
pub use factory::{build_credential_codec, build_password_service};
pub use password::PasswordService;
