//! Tools exposed to the external tool-calling layer.
//!
//! Every tool answers with the same `{status, output?, summary}` shape so
//! the dispatcher can treat symbol lookup like any sibling lookup tool.

pub mod registry;

use async_trait::async_trait;
use serde::Serialize;

pub use registry::{ToolContext, ToolRegistry, ToolSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Result of a tool call: a status, an optional detailed listing and a
/// one-line summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub summary: String,
}

impl ToolResponse {
    pub fn success(output: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            output: Some(output.into()),
            summary: summary.into(),
        }
    }

    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            output: None,
            summary: summary.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}

/// A callable tool. The name it is exposed under comes from configuration.
#[async_trait]
pub trait Tool: Send + Sync {
    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> serde_json::Value;

    async fn call(&self, args: serde_json::Value) -> ToolResponse;
}
