/*
 * Responsibility
 * - Users の request DTO
 * - validation (形式チェック) と trim 済みの値への変換
 * - response は repos::store::User をそのまま返す (password_hash を持たない)
 */
use serde::Deserialize;
use validator::ValidateEmail;

use crate::repos::store::UserProfile;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub nick: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_profile(&self.name, &self.nick, &self.email)?;
        if self.password.trim().is_empty() {
            return Err("password is required");
        }
        Ok(())
    }

    pub fn profile(&self) -> UserProfile {
        trimmed_profile(&self.name, &self.nick, &self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub nick: String,
    pub email: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_profile(&self.name, &self.nick, &self.email)
    }

    pub fn profile(&self) -> UserProfile {
        trimmed_profile(&self.name, &self.nick, &self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current: String,
    pub new: String,
}

impl UpdatePasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.current.is_empty() {
            return Err("current password is required");
        }
        if self.new.trim().is_empty() {
            return Err("new password cannot be empty");
        }
        Ok(())
    }
}

/// `GET /users?user=<term>`
#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    #[serde(default)]
    pub user: String,
}

fn validate_profile(name: &str, nick: &str, email: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    if nick.trim().is_empty() {
        return Err("nick is required");
    }
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    if !email.validate_email() {
        return Err("email is invalid");
    }
    Ok(())
}

fn trimmed_profile(name: &str, nick: &str, email: &str) -> UserProfile {
    UserProfile {
        name: name.trim().to_owned(),
        nick: nick.trim().to_owned(),
        email: email.trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, nick: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.into(),
            nick: nick.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn create_requires_every_field() {
        assert!(create("Ann", "ann", "ann@example.com", "pw").validate().is_ok());
        assert_eq!(
            create("  ", "ann", "ann@example.com", "pw").validate(),
            Err("name is required")
        );
        assert_eq!(
            create("Ann", "", "ann@example.com", "pw").validate(),
            Err("nick is required")
        );
        assert_eq!(
            create("Ann", "ann", "", "pw").validate(),
            Err("email is required")
        );
        assert_eq!(
            create("Ann", "ann", "ann@example.com", " ").validate(),
            Err("password is required")
        );
    }

    #[test]
    fn rejects_malformed_email() {
        assert_eq!(
            create("Ann", "ann", "not-an-email", "pw").validate(),
            Err("email is invalid")
        );
    }

    #[test]
    fn profile_is_trimmed() {
        let req = create("  Ann ", " ann", " ann@example.com  ", "pw");
        assert!(req.validate().is_ok());

        let profile = req.profile();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.nick, "ann");
        assert_eq!(profile.email, "ann@example.com");
    }

    #[test]
    fn update_password_needs_both_fields() {
        let ok = UpdatePasswordRequest {
            current: "old".into(),
            new: "new".into(),
        };
        assert!(ok.validate().is_ok());

        let blank_new = UpdatePasswordRequest {
            current: "old".into(),
            new: "   ".into(),
        };
        assert!(blank_new.validate().is_err());
    }
}
