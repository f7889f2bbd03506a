//! Admin API type definitions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::token::ADMIN_ROLE;
use crate::response::{JsonResource, ResourceContext, Validate, ValidationErrors};
use crate::store::AdminAccount;

// ============ Login ============

/// Login request body
///
/// Fields are optional so a missing field surfaces as a validation message
/// rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub account: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("account", self.account.as_deref());
        errors.require("password", self.password.as_deref());
        errors.into_result()
    }
}

/// Login response data
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ============ Listing ============

/// Page size limits
#[derive(Debug, Clone, Copy)]
pub struct PaginationSettings {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_per_page: 15,
            max_per_page: 100,
        }
    }
}

/// Listing query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub per_page: u64,
}

impl PageQuery {
    /// Lenient parse: unusable values fall back to the defaults
    pub fn from_params(params: &HashMap<String, String>, limits: PaginationSettings) -> Self {
        let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<u64>().ok());

        let page = number("page").filter(|p| *p >= 1).unwrap_or(1);
        let per_page = number("per_page")
            .unwrap_or(limits.default_per_page)
            .clamp(1, limits.max_per_page.max(1));

        Self { page, per_page }
    }
}

// ============ Resources ============

/// Admin account as returned to clients
pub struct AdminResource(pub AdminAccount);

impl JsonResource for AdminResource {
    fn to_json(&self, _ctx: &ResourceContext) -> Value {
        serde_json::to_value(&self.0).unwrap_or_else(|e| {
            tracing::error!(error = %e, id = self.0.id, "Failed to serialize admin account");
            Value::Null
        })
    }

    fn additional(&self) -> Value {
        json!({ "role": ADMIN_ROLE })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::from_params(&HashMap::new(), PaginationSettings::default());
        assert_eq!(query, PageQuery { page: 1, per_page: 15 });
    }

    #[test]
    fn test_page_query_lenient() {
        let limits = PaginationSettings::default();

        let query = PageQuery::from_params(&params(&[("page", "abc"), ("per_page", "-3")]), limits);
        assert_eq!(query, PageQuery { page: 1, per_page: 15 });

        let query = PageQuery::from_params(&params(&[("page", "0"), ("per_page", "0")]), limits);
        assert_eq!(query, PageQuery { page: 1, per_page: 1 });

        let query = PageQuery::from_params(&params(&[("page", " 4 "), ("per_page", "500")]), limits);
        assert_eq!(query, PageQuery { page: 4, per_page: 100 });
    }

    #[test]
    fn test_login_request_validation() {
        let request: LoginRequest = serde_json::from_value(json!({"account": "root"})).unwrap();
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("The password field is required."));
        assert!(errors.get("account").is_none());

        let request: LoginRequest =
            serde_json::from_value(json!({"account": "root", "password": "secret"})).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_admin_resource_adds_role() {
        let account = AdminAccount {
            id: 3,
            account: "root".to_string(),
            password: "hash".to_string(),
            salt: "salt".to_string(),
            name: "Root".to_string(),
            phone: Some("13800000000".to_string()),
            created_at: None,
            updated_at: None,
        };
        let resource = AdminResource(account);
        let ctx = ResourceContext::default();

        let value = resource.to_json(&ctx);
        assert_eq!(value["id"], 3);
        assert_eq!(value["phone"], "13800000000");
        assert!(value.get("password").is_none());
        assert_eq!(resource.additional(), json!({"role": "admin"}));
    }
}
