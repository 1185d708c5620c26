//! Boundary result convention
//!
//! Results cross the C ABI as a single string:
//! - success without payload: `""`
//! - success with payload: the payload itself (e.g. a JSON array)
//! - failure: `ERROR:` followed by the error description
//!
//! The marker is only meaningful at position 0 and is stripped exactly once,
//! so error text that itself contains `ERROR:` survives decoding unchanged.

use serde::Serialize;

/// Marker that opens every failure string
pub const ERROR_PREFIX: &str = "ERROR:";

const FALLBACK_MESSAGE: &str = "unknown error";

/// Structured result of a boundary operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success; the payload may be empty
    Success(String),

    /// Failure with a non-empty description
    Failure(String),
}

impl Outcome {
    /// Success without payload
    pub fn ok() -> Self {
        Self::Success(String::new())
    }

    /// Success carrying a payload
    pub fn payload(payload: impl Into<String>) -> Self {
        Self::Success(payload.into())
    }

    /// Failure from any displayable error
    pub fn failure(error: impl std::fmt::Display) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::Failure(FALLBACK_MESSAGE.to_string())
        } else {
            Self::Failure(message)
        }
    }

    /// Success carrying `value` serialized as JSON, or the serialization error
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => Self::Success(json),
            Err(e) => Self::failure(format!("failed to serialize payload: {}", e)),
        }
    }

    /// Collapse a unit result into an outcome
    pub fn from_unit<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failure(e),
        }
    }

    /// Check if this is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Render into the single-string wire form
    pub fn into_wire(self) -> String {
        match self {
            Self::Success(payload) => payload,
            Self::Failure(message) => format!("{}{}", ERROR_PREFIX, message),
        }
    }

    /// Parse the single-string wire form
    pub fn from_wire(wire: &str) -> Self {
        match to_helm_error(wire) {
            Some(message) => Self::Failure(message),
            None => Self::Success(wire.to_string()),
        }
    }

    /// Convert into a `Result`, keeping the payload or the message
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Failure(message) => Err(message),
        }
    }
}

/// Checks if the result string is an error, and if so, returns the error message.
pub fn to_helm_error(result: &str) -> Option<String> {
    result
        .strip_prefix(ERROR_PREFIX)
        .map(|message| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReleaseSummary;

    #[test]
    fn test_success_wire_forms() {
        assert_eq!(Outcome::ok().into_wire(), "");
        assert_eq!(Outcome::payload("[]").into_wire(), "[]");
        assert_eq!(Outcome::from_unit::<String>(Ok(())).into_wire(), "");
    }

    #[test]
    fn test_failure_wire_form() {
        let wire = Outcome::failure("chart \"nope\" not found").into_wire();
        insta::assert_snapshot!(wire, @r#"ERROR:chart "nope" not found"#);
        assert_eq!(to_helm_error(&wire).as_deref(), Some("chart \"nope\" not found"));
    }

    #[test]
    fn test_failure_is_never_empty() {
        let wire = Outcome::failure("").into_wire();
        let message = to_helm_error(&wire).unwrap();
        assert!(!message.is_empty());
    }

    #[test]
    fn test_embedded_marker_survives() {
        let wire = Outcome::failure("upstream said ERROR: twice ERROR:").into_wire();
        assert_eq!(
            Outcome::from_wire(&wire),
            Outcome::Failure("upstream said ERROR: twice ERROR:".to_string())
        );
    }

    #[test]
    fn test_marker_only_at_start() {
        assert_eq!(to_helm_error("[] ERROR:"), None);
        assert_eq!(to_helm_error(""), None);
        assert_eq!(Outcome::from_wire(""), Outcome::ok());
    }

    #[test]
    fn test_json_payload() {
        let releases = vec![ReleaseSummary {
            name: "demo".to_string(),
            version: "1.2.3".to_string(),
            namespace: "default".to_string(),
            status: "deployed".to_string(),
            last_updated: "2024-05-01 10:00:00 +0000 UTC".to_string(),
        }];

        let wire = Outcome::json(&releases).into_wire();
        insta::assert_snapshot!(wire, @r#"[{"name":"demo","version":"1.2.3","namespace":"default","status":"deployed","lastUpdated":"2024-05-01 10:00:00 +0000 UTC"}]"#);

        let empty: Vec<ReleaseSummary> = Vec::new();
        assert_eq!(Outcome::json(&empty).into_wire(), "[]");
    }
}
