//! Handler for the `architect` tool.
//!
//! Sends a task description and code to a chat model and returns the model's
//! step-by-step plan. Upstream failures come back as text in the result, not
//! as faults, so an agent caller always has something to read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::json;

use crate::openai::CompletionClient;
use crate::tools::{ToolError, ToolHandler};

/// System instruction sent with every plan request.
const SYSTEM_PROMPT: &str = "You are an expert software architect. Given a task and some code, outline the steps that an AI coding agent should take to complete or improve the code.";

/// Handler for the `architect` tool.
pub struct ArchitectHandler {
    client: Arc<dyn CompletionClient>,
}

#[derive(Debug, Deserialize)]
struct ArchitectArgs {
    task: String,
    code: String,
}

impl ArchitectHandler {
    /// Create a new architect handler.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Build the input schema for this tool.
    fn input_schema(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "task".to_string(),
            json!({
                "type": "string",
                "description": "Description of the task",
            }),
        );
        properties.insert(
            "code".to_string(),
            json!({
                "type": "string",
                "description": "Concatenated code from one or more files",
            }),
        );

        schema.insert("properties".to_string(), json!(properties));
        schema.insert("required".to_string(), json!(["task", "code"]));
        schema
    }
}

impl ToolHandler for ArchitectHandler {
    fn name(&self) -> &str {
        "architect"
    }

    fn description(&self) -> &str {
        "Analyzes a task description plus some code, then outlines steps for an AI coding agent."
    }

    fn input_schema(&self) -> JsonObject {
        self.input_schema()
    }

    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
        let client = self.client.clone();

        Box::pin(async move {
            let args: ArchitectArgs = serde_json::from_value(serde_json::Value::Object(args))
                .map_err(|e| ToolError::InvalidArguments {
                    tool: "architect".to_string(),
                    reason: e.to_string(),
                })?;

            if args.task.is_empty() {
                return Err(ToolError::InvalidArguments {
                    tool: "architect".to_string(),
                    reason: "Task description is required.".to_string(),
                });
            }
            if args.code.is_empty() {
                return Err(ToolError::InvalidArguments {
                    tool: "architect".to_string(),
                    reason: "Code string is required (one or more files concatenated)."
                        .to_string(),
                });
            }

            let user_prompt = format!(
                "Task: {}\n\nCode:\n{}\n\nPlease provide a step-by-step plan.",
                args.task, args.code
            );

            let text = match client.complete(SYSTEM_PROMPT, &user_prompt).await {
                Ok(Some(reply)) => reply,
                Ok(None) => "No response from model.".to_string(),
                Err(e) => {
                    tracing::warn!("completion request failed: {}", e);
                    format!("OpenAI Error: {}", e)
                }
            };

            Ok(CallToolResult {
                content: vec![Content::text(text)],
                structured_content: None,
                is_error: None,
                meta: None,
            })
        })
    }
}
