//! Envelope type definitions

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::config::{
    Config, StatusMessages, default_error_message, default_fail_message,
    default_success_message, default_unauthorized_message, default_validation_message,
};

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
    Unauthorized,
    Validation,
}

impl Status {
    /// Classify an HTTP status code
    ///
    /// 401 and 422 take precedence over the generic 4xx range.
    pub fn classify(code: StatusCode) -> Self {
        match code.as_u16() {
            401 => Status::Unauthorized,
            422 => Status::Validation,
            400..=499 => Status::Fail,
            500..=599 => Status::Error,
            _ => Status::Success,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Fail => "fail",
            Status::Error => "error",
            Status::Unauthorized => "unauthorized",
            Status::Validation => "validation",
        }
    }
}

/// Uniform response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    pub code: String,
    pub message: String,
    /// Payload, `{}` when empty
    pub data: Value,
    /// Error detail, `{}` when empty
    pub errors: Value,
}

/// Settings consumed by the formatter and the error renderer
#[derive(Debug, Clone)]
pub struct ResponseSettings {
    /// When false, the transport status is always 200
    pub is_restful: bool,
    /// Route HTTP and internal failures through the envelope
    pub is_unified_return_json: bool,
    /// Include exception detail in error envelopes
    pub debug: bool,
    pub messages: StatusMessages,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            is_restful: false,
            is_unified_return_json: true,
            debug: false,
            messages: StatusMessages::default(),
        }
    }
}

impl ResponseSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            is_restful: config.response.is_restful,
            is_unified_return_json: config.response.is_unified_return_json,
            debug: config.debug,
            messages: config.response.code.clone(),
        }
    }

    /// Default message and business code for a status
    ///
    /// The configured string is `"Message"` or `"Message|code"`. A blank
    /// message part falls back to the built-in message, and a blank code
    /// part counts as no code.
    pub fn default_message(&self, status: Status) -> (String, Option<String>) {
        let (configured, builtin) = match status {
            Status::Success => (&self.messages.success, default_success_message()),
            Status::Fail => (&self.messages.fail, default_fail_message()),
            Status::Error => (&self.messages.error, default_error_message()),
            Status::Unauthorized => (&self.messages.unauthorized, default_unauthorized_message()),
            Status::Validation => (&self.messages.validation, default_validation_message()),
        };

        let (message, code) = split_message(configured);
        if !message.is_empty() {
            return (message, code);
        }

        let (builtin_message, builtin_code) = split_message(&builtin);
        if configured.trim().is_empty() {
            (builtin_message, builtin_code)
        } else {
            (builtin_message, code)
        }
    }
}

fn split_message(raw: &str) -> (String, Option<String>) {
    let (message, code) = match raw.split_once('|') {
        Some((message, code)) => (message, Some(code.trim())),
        None => (raw, None),
    };
    (
        message.trim().to_string(),
        code.filter(|c| !c.is_empty()).map(str::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Status::classify(StatusCode::OK), Status::Success);
        assert_eq!(Status::classify(StatusCode::CREATED), Status::Success);
        assert_eq!(Status::classify(StatusCode::FOUND), Status::Success);
        assert_eq!(Status::classify(StatusCode::BAD_REQUEST), Status::Fail);
        assert_eq!(Status::classify(StatusCode::UNAUTHORIZED), Status::Unauthorized);
        assert_eq!(Status::classify(StatusCode::FORBIDDEN), Status::Fail);
        assert_eq!(Status::classify(StatusCode::NOT_FOUND), Status::Fail);
        assert_eq!(Status::classify(StatusCode::UNPROCESSABLE_ENTITY), Status::Validation);
        assert_eq!(Status::classify(StatusCode::INTERNAL_SERVER_ERROR), Status::Error);
        assert_eq!(Status::classify(StatusCode::BAD_GATEWAY), Status::Error);
        assert_eq!(Status::classify(StatusCode::CONTINUE), Status::Success);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Status::Unauthorized).unwrap(), "unauthorized");
        assert_eq!(Status::Validation.as_str(), "validation");
    }

    #[test]
    fn test_default_message_splits_business_code() {
        let settings = ResponseSettings::default();
        assert_eq!(
            settings.default_message(Status::Unauthorized),
            ("Unauthenticated".to_string(), Some("200001".to_string()))
        );
        assert_eq!(
            settings.default_message(Status::Validation),
            ("Unprocessable Entity".to_string(), Some("422001".to_string()))
        );
    }

    #[test]
    fn test_default_message_without_code() {
        let mut settings = ResponseSettings::default();
        settings.messages.fail = "Something went wrong".to_string();
        assert_eq!(
            settings.default_message(Status::Fail),
            ("Something went wrong".to_string(), None)
        );
    }

    #[test]
    fn test_blank_message_part_falls_back() {
        let mut settings = ResponseSettings::default();
        settings.messages.success = "|210000".to_string();
        assert_eq!(
            settings.default_message(Status::Success),
            ("Success".to_string(), Some("210000".to_string()))
        );

        settings.messages.fail = " | ".to_string();
        assert_eq!(settings.default_message(Status::Fail), ("Fail".to_string(), None));

        settings.messages.error = "Oops|".to_string();
        assert_eq!(settings.default_message(Status::Error), ("Oops".to_string(), None));
    }

    #[test]
    fn test_blank_message_falls_back() {
        let mut settings = ResponseSettings::default();
        settings.messages.error = "  ".to_string();
        assert_eq!(
            settings.default_message(Status::Error),
            ("Error".to_string(), Some("500000".to_string()))
        );
    }
}
