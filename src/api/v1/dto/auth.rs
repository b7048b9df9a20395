use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The id is rendered as a string so JavaScript clients keep the full u64.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub token: String,
}
