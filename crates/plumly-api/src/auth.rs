use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Header carrying the hashed house token on every lightpad request.
pub const HOUSE_TOKEN_HEADER: &str = "X-Plum-House-Access-Token";

/// Static credentials for the Plum cloud account.
#[derive(Debug, Clone)]
pub struct CloudCredentials {
    pub username: String,
    pub password: SecretString,
}

impl CloudCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Derive the value of [`HOUSE_TOKEN_HEADER`] from a house access token.
///
/// Lowercase hex SHA-256 of the token string. Callers recompute it per
/// request; the digest is never stored.
pub fn house_token_digest(access_token: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(access_token.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_sha256_hex() {
        let token = SecretString::from("abc".to_string());
        assert_eq!(
            house_token_digest(&token),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_of_empty_token() {
        let token = SecretString::from(String::new());
        assert_eq!(
            house_token_digest(&token),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
