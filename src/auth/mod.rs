//! Credential checking and token issuance

pub mod password;
pub mod token;

pub use password::PasswordDigest;
pub use token::{AdminClaims, TokenError, TokenIssuer};
