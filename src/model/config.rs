use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::auth::password::PasswordDigest;

/// Admin API application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite URL of the credential store (created if missing)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// HS256 signing secret for admin tokens (required at startup)
    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,

    /// Token lifetime in seconds
    #[serde(default = "default_jwt_ttl_secs")]
    pub jwt_ttl_secs: u64,

    /// Digest used by the double-hash password check ("md5" or "sha256")
    #[serde(default)]
    pub password_digest: PasswordDigest,

    /// Include exception detail in error envelopes
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_per_page")]
    pub default_per_page: u64,

    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,

    /// Admin account seeded at startup when its login name is not taken
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_admin: Option<BootstrapAdmin>,

    #[serde(default)]
    pub response: ResponseConfig,
}

/// Initial admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapAdmin {
    pub account: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Envelope behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseConfig {
    /// When false, every response goes out with HTTP 200
    #[serde(default)]
    pub is_restful: bool,

    /// Route unhandled failures through the envelope
    #[serde(default = "default_true")]
    pub is_unified_return_json: bool,

    /// Default message per status, optionally followed by `|<business code>`
    #[serde(default)]
    pub code: StatusMessages,
}

/// `"Message|code"` strings keyed by envelope status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessages {
    #[serde(default = "default_success_message")]
    pub success: String,
    #[serde(default = "default_fail_message")]
    pub fail: String,
    #[serde(default = "default_error_message")]
    pub error: String,
    #[serde(default = "default_unauthorized_message")]
    pub unauthorized: String,
    #[serde(default = "default_validation_message")]
    pub validation: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://admin.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_jwt_issuer() -> String {
    "admin-api".to_string()
}

fn default_jwt_ttl_secs() -> u64 {
    3600
}

fn default_per_page() -> u64 {
    15
}

fn default_max_per_page() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_success_message() -> String {
    "Success|200000".to_string()
}

pub(crate) fn default_fail_message() -> String {
    "Fail|400000".to_string()
}

pub(crate) fn default_error_message() -> String {
    "Error|500000".to_string()
}

pub(crate) fn default_unauthorized_message() -> String {
    "Unauthenticated|200001".to_string()
}

pub(crate) fn default_validation_message() -> String {
    "Unprocessable Entity|422001".to_string()
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            success: default_success_message(),
            fail: default_fail_message(),
            error: default_error_message(),
            unauthorized: default_unauthorized_message(),
            validation: default_validation_message(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            is_restful: false,
            is_unified_return_json: true,
            code: StatusMessages::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            jwt_secret: None,
            jwt_issuer: default_jwt_issuer(),
            jwt_ttl_secs: default_jwt_ttl_secs(),
            password_digest: PasswordDigest::default(),
            debug: false,
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            bootstrap_admin: None,
            response: ResponseConfig::default(),
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// Signing secret, with blank values treated as unset
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // Config file doesn't exist, return default config
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_per_page, 15);
        assert!(!config.response.is_restful);
        assert!(config.response.is_unified_return_json);
        assert_eq!(config.response.code.unauthorized, "Unauthenticated|200001");
        assert_eq!(config.password_digest, PasswordDigest::Md5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "port": 9000,
            "jwtSecret": "s3cret",
            "passwordDigest": "sha256",
            "response": {
                "isRestful": true,
                "code": { "fail": "Bad|499" }
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.jwt_secret(), Some("s3cret"));
        assert_eq!(config.password_digest, PasswordDigest::Sha256);
        assert!(config.response.is_restful);
        assert!(config.response.is_unified_return_json);
        assert_eq!(config.response.code.fail, "Bad|499");
        assert_eq!(config.response.code.success, "Success|200000");
    }

    #[test]
    fn test_blank_jwt_secret_is_unset() {
        let config: Config = serde_json::from_str(r#"{"jwtSecret": "   "}"#).unwrap();
        assert_eq!(config.jwt_secret(), None);
    }

    #[test]
    fn test_bootstrap_admin_parsing() {
        let json = r#"{"bootstrapAdmin": {"account": "admin", "password": "secret"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.account, "admin");
        assert_eq!(admin.name, "");
        assert!(admin.phone.is_none());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let config = Config::load("definitely/not/here/config.json").unwrap();
        assert_eq!(config.database_url, "sqlite://admin.db");
    }
}
