//! Legacy password digests
//!
//! Stored hashes are `hex(D(hex(D(password + salt))))` for a digest `D`.
//! This is the scheme existing admin rows were written with; it is not a
//! password-hashing construction anyone should pick for new data.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::common::auth::constant_time_eq;

/// Salt length used for newly seeded accounts
const SALT_LEN: usize = 6;

/// Digest used by the double-hash scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordDigest {
    #[default]
    Md5,
    Sha256,
}

impl PasswordDigest {
    /// Hash a password with its salt
    pub fn hash(self, password: &str, salt: &str) -> String {
        let salted = format!("{password}{salt}");
        match self {
            PasswordDigest::Md5 => double_hex::<Md5>(salted.as_bytes()),
            PasswordDigest::Sha256 => double_hex::<Sha256>(salted.as_bytes()),
        }
    }

    /// Check a password against a stored hash
    pub fn verify(self, password: &str, salt: &str, stored_hash: &str) -> bool {
        let computed = self.hash(password, salt);
        constant_time_eq(&computed, &stored_hash.to_ascii_lowercase())
    }
}

fn hex_digest<D: Digest>(input: &[u8]) -> String {
    hex::encode(D::digest(input))
}

fn double_hex<D: Digest>(input: &[u8]) -> String {
    hex_digest::<D>(hex_digest::<D>(input).as_bytes())
}

/// Random alphanumeric salt for new accounts
pub fn generate_salt() -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(SALT_LEN)
        .collect()
}
