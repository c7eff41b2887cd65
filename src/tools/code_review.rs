//! Handler for the `code-review` tool.
//!
//! Diffs the working tree of a repository and frames the output with a fixed
//! review instruction. A failed diff is embedded in the output text rather
//! than raised; the consumer treats the whole diff as opaque review material.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::json;

use crate::tools::{ToolError, ToolHandler};
use crate::vcs::DiffSource;

/// Fixed instruction appended after the diff text.
const REVIEW_INSTRUCTIONS: &str =
    "Review this diff for any obvious issues. Fix them if found, then finalize the changes.";

/// Handler for the `code-review` tool.
pub struct CodeReviewHandler {
    diff_source: Arc<dyn DiffSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeReviewArgs {
    folder_path: String,
}

impl CodeReviewHandler {
    /// Create a new code review handler.
    pub fn new(diff_source: Arc<dyn DiffSource>) -> Self {
        Self { diff_source }
    }

    /// Build the input schema for this tool.
    fn input_schema(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "folderPath".to_string(),
            json!({
                "type": "string",
                "description": "Path to the full root directory of the repository to diff against main",
            }),
        );

        schema.insert("properties".to_string(), json!(properties));
        schema.insert("required".to_string(), json!(["folderPath"]));
        schema
    }
}

impl ToolHandler for CodeReviewHandler {
    fn name(&self) -> &str {
        "code-review"
    }

    fn description(&self) -> &str {
        "Run a git diff against main on a specified file and provide instructions to review/fix issues."
    }

    fn input_schema(&self) -> JsonObject {
        self.input_schema()
    }

    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
        let diff_source = self.diff_source.clone();

        Box::pin(async move {
            let args: CodeReviewArgs = serde_json::from_value(serde_json::Value::Object(args))
                .map_err(|e| ToolError::InvalidArguments {
                    tool: "code-review".to_string(),
                    reason: e.to_string(),
                })?;

            if args.folder_path.is_empty() {
                return Err(ToolError::InvalidArguments {
                    tool: "code-review".to_string(),
                    reason: "A folder path is required.".to_string(),
                });
            }

            let diff_output = match diff_source.diff(&args.folder_path).await {
                Ok(diff) => diff,
                Err(e) => {
                    tracing::warn!("diff failed for {}: {}", args.folder_path, e);
                    format!("Error running git diff: {}", e)
                }
            };

            let message = format!(
                "Git Diff Output:\n{}\n\nInstructions:\n{}",
                diff_output, REVIEW_INSTRUCTIONS
            );

            Ok(CallToolResult {
                content: vec![Content::text(message)],
                structured_content: None,
                is_error: None,
                meta: None,
            })
        })
    }
}
