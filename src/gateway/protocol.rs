//! Gateway protocol types
//!
//! Gateways communicate via JSON messages over stdin/stdout, one line each way.
//! Each gateway must support the `--manifest` flag to declare its operations.

use serde::{Deserialize, Serialize};

use crate::domain::IssueRef;

/// Operations every gateway has to implement
pub const REQUIRED_OPERATIONS: &[&str] = &["get", "update"];

/// Gateway manifest declaring capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayManifest {
    /// Gateway name (e.g., "issue-gateway-github")
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub description: String,

    /// Supported operations
    pub operations: Vec<String>,
}

impl GatewayManifest {
    /// Required operations the gateway does not declare
    pub fn missing_operations(&self) -> Vec<&'static str> {
        REQUIRED_OPERATIONS
            .iter()
            .copied()
            .filter(|op| !self.operations.iter().any(|o| o == op))
            .collect()
    }
}

/// A message sent to a gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// The operation to perform
    pub operation: String,

    /// Operation-specific parameters
    pub params: serde_json::Value,
}

impl GatewayRequest {
    pub fn new(operation: impl Into<String>, params: impl Into<serde_json::Value>) -> Self {
        Self {
            operation: operation.into(),
            params: params.into(),
        }
    }

    /// Request for the current body of `issue`
    pub fn get(issue: &IssueRef) -> Self {
        Self::new("get", issue_params(issue))
    }

    /// Request to replace the body of `issue`
    pub fn update(issue: &IssueRef, body: &str) -> Self {
        let mut params = issue_params(issue);
        params["body"] = serde_json::Value::String(body.to_string());
        Self::new("update", params)
    }
}

fn issue_params(issue: &IssueRef) -> serde_json::Value {
    serde_json::json!({
        "owner": issue.owner(),
        "repo": issue.repo(),
        "number": issue.number(),
    })
}

/// A response from a gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Result data (if success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message (if failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayResponse {
    pub fn success(data: impl Into<serde_json::Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Issue body carried by a `get` response; a missing or null body is empty
    pub fn body(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        match data.get("body") {
            None | Some(serde_json::Value::Null) => Some(String::new()),
            Some(value) => value.as_str().map(str::to_string),
        }
    }
}
