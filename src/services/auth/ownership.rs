//! Ownership guard shared by every mutating handler.
//!
//! Call order in handlers:
//! 1. identity (AuthCtx) is already verified by the gate
//! 2. resource is fetched (resource-owner operations only)
//! 3. guard
//! 4. write

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("cannot act on behalf of another user")]
    NotSelf,
    #[error("cannot target yourself")]
    SelfTarget,
    #[error("resource belongs to another user")]
    NotOwner,
}

/// Self-only operations: the path-addressed user must be the caller.
pub fn ensure_self(subject: u64, target_user_id: u64) -> Result<(), OwnershipError> {
    if subject != target_user_id {
        return Err(OwnershipError::NotSelf);
    }
    Ok(())
}

/// Follow / unfollow: the caller is the follower, so only the target needs checking.
pub fn ensure_not_self(subject: u64, target_user_id: u64) -> Result<(), OwnershipError> {
    if subject == target_user_id {
        return Err(OwnershipError::SelfTarget);
    }
    Ok(())
}

/// Resource-owner operations: `owner` is the owner recorded on the fetched resource.
pub fn ensure_owner(subject: u64, owner: u64) -> Result<(), OwnershipError> {
    if subject != owner {
        return Err(OwnershipError::NotOwner);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_only() {
        assert_eq!(ensure_self(7, 7), Ok(()));
        assert_eq!(ensure_self(7, 9), Err(OwnershipError::NotSelf));
    }

    #[test]
    fn self_target_is_rejected() {
        assert_eq!(ensure_not_self(7, 7), Err(OwnershipError::SelfTarget));
        assert_eq!(ensure_not_self(7, 9), Ok(()));
    }

    #[test]
    fn owner_only() {
        assert_eq!(ensure_owner(9, 9), Ok(()));
        assert_eq!(ensure_owner(7, 9), Err(OwnershipError::NotOwner));
    }
}
