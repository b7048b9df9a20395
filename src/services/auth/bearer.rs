//! Identity extraction: `Authorization` header → credential → user id.
//!
//! Every failure (no header, wrong shape, bad token) is the same failure for callers.

use super::credential::{CredentialCodec, CredentialError};

/// Pull the credential out of a `"<scheme> <credential>"` header value.
///
/// The value must split on `' '` into exactly two parts. Any other shape yields `""`,
/// which `CredentialCodec::verify` rejects as malformed.
pub fn extract_credential(header: Option<&str>) -> &str {
    let Some(value) = header else {
        return "";
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(credential), None) => credential,
        _ => "",
    }
}

/// Extract and verify the caller's user id from an `Authorization` header value.
pub fn extract_subject(codec: &CredentialCodec, header: Option<&str>) -> Result<u64, CredentialError> {
    codec.verify(extract_credential(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretKey;

    #[test]
    fn two_part_header_yields_credential() {
        assert_eq!(extract_credential(Some("Bearer abc.def.ghi")), "abc.def.ghi");
        // scheme is not inspected
        assert_eq!(extract_credential(Some("Token xyz")), "xyz");
    }

    #[test]
    fn other_shapes_yield_empty_credential() {
        for header in [
            None,
            Some(""),
            Some("Bearer"),
            Some("abc.def.ghi"),
            Some("Bearer  abc.def.ghi"),
            Some("Bearer abc.def.ghi extra"),
            Some(" abc.def.ghi x"),
        ] {
            assert_eq!(extract_credential(header), "", "header: {header:?}");
        }
    }

    #[test]
    fn extract_subject_verifies_credential() {
        let codec = CredentialCodec::new(&SecretKey::new("k").unwrap());
        let token = codec.issue(42).unwrap();
        let header = format!("Bearer {token}");
        assert_eq!(extract_subject(&codec, Some(&header)), Ok(42));
    }

    #[test]
    fn missing_header_is_malformed_credential() {
        let codec = CredentialCodec::new(&SecretKey::new("k").unwrap());
        assert_eq!(extract_subject(&codec, None), Err(CredentialError::Malformed));
    }

    #[test]
    fn unsigned_looking_token_is_rejected() {
        let codec = CredentialCodec::new(&SecretKey::new("k").unwrap());
        assert!(extract_subject(&codec, Some("Bearer abc.def.ghi")).is_err());
    }
}
