//! Provider error type.
//!
//! The VPC API reports failures as a machine-readable code (e.g. `VPC.0202`)
//! plus a message. Some gateways only hand back plain text, in which case the
//! code can only be recovered by scanning the text.

use crate::config::VPC_NOT_FOUND_CODE;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Matches provider error codes such as `VPC.0202` or `APIGW.0301`.
static ERROR_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_error_code_regex() -> &'static Regex {
    ERROR_CODE_REGEX.get_or_init(|| Regex::new(r"\b[A-Z][A-Za-z]*\.\d{4}\b").expect("Invalid Regex"))
}

/// A failed call against the provider API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (status={}, code={})", display_status(.status), .code.as_deref().unwrap_or("none"))]
pub struct ProviderError {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    /// Structured error code from the response body.
    pub code: Option<String>,
    pub message: String,
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl ProviderError {
    pub fn new(status: Option<u16>, code: Option<&str>, message: impl Into<String>) -> Self {
        ProviderError {
            status,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Error with no response (connect failure, timeout, decode failure).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, None, message)
    }

    /// Build from a non-success HTTP response body.
    ///
    /// Accepts both `{"code","message"}` and `{"error_code","error_msg"}` bodies.
    /// Anything else is kept verbatim as the message with no code.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            code: Option<String>,
            message: Option<String>,
            error_code: Option<String>,
            error_msg: Option<String>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let code = parsed.code.or(parsed.error_code);
                let message = parsed
                    .message
                    .or(parsed.error_msg)
                    .unwrap_or_else(|| body.trim().to_string());
                ProviderError {
                    status: Some(status),
                    code,
                    message,
                }
            }
            Err(_) => Self::new(Some(status), None, body.trim()),
        }
    }

    /// The error code, taken from the structured field or, failing that, from the text.
    pub fn error_code(&self) -> Option<&str> {
        match &self.code {
            Some(code) => Some(code.as_str()),
            None => get_error_code_regex()
                .find(&self.message)
                .map(|m| m.as_str()),
        }
    }

    /// True when the provider says the owning VPC does not exist.
    ///
    /// Without a structured code every code-shaped token in the text counts,
    /// since gateways may prefix their own code.
    pub fn is_network_not_found(&self) -> bool {
        match &self.code {
            Some(code) => code == VPC_NOT_FOUND_CODE,
            None => get_error_code_regex()
                .find_iter(&self.message)
                .any(|m| m.as_str() == VPC_NOT_FOUND_CODE),
        }
    }
}
