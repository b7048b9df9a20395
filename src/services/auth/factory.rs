/// Factory: build auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{CredentialCodec, PasswordService, password::PasswordError};

pub fn build_credential_codec(config: &Config) -> Arc<CredentialCodec> {
    Arc::new(CredentialCodec::new(&config.secret_key))
}

pub fn build_password_service(config: &Config) -> Result<PasswordService, PasswordError> {
    PasswordService::new(config.password_cost).inspect_err(|e| {
        tracing::error!(error = %e, "invalid PASSWORD_HASH_* configuration");
    })
}
