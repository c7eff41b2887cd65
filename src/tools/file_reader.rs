//! Handlers for the `read_file` and `read_multiple_files` tools.
//!
//! File access problems are reported in-band: the result carries the error
//! description as text with the `is_error` flag set, and the call itself
//! never faults. Multi-file reads produce one content item per requested
//! path, in request order, mixing successes and failures freely.

use std::future::Future;
use std::pin::Pin;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::json;

use crate::tools::{ToolError, ToolHandler};

fn error_envelope(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}

/// Handler for the `read_file` tool.
#[derive(Debug, Default)]
pub struct ReadFileHandler;

#[derive(Debug, Deserialize)]
struct ReadFileArgs {
    path: String,
}

impl ReadFileHandler {
    /// Create a new single-file read handler.
    pub fn new() -> Self {
        Self
    }

    /// Build the input schema for this tool.
    fn input_schema(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "path".to_string(),
            json!({
                "type": "string",
                "description": "Full path to the file to read",
            }),
        );

        schema.insert("properties".to_string(), json!(properties));
        schema.insert("required".to_string(), json!(["path"]));
        schema
    }
}

impl ToolHandler for ReadFileHandler {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a single file"
    }

    fn input_schema(&self) -> JsonObject {
        self.input_schema()
    }

    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let args: ReadFileArgs = match serde_json::from_value(serde_json::Value::Object(args))
            {
                Ok(args) => args,
                Err(e) => {
                    return Ok(error_envelope(format!(
                        "Invalid arguments for read_file: {}",
                        e
                    )));
                }
            };

            match tokio::fs::read_to_string(&args.path).await {
                Ok(content) => Ok(CallToolResult {
                    content: vec![Content::text(content)],
                    structured_content: None,
                    is_error: None,
                    meta: None,
                }),
                Err(e) => Ok(error_envelope(format!(
                    "Error reading file {}: {}",
                    args.path, e
                ))),
            }
        })
    }
}

/// Handler for the `read_multiple_files` tool.
#[derive(Debug, Default)]
pub struct ReadMultipleFilesHandler;

#[derive(Debug, Deserialize)]
struct ReadMultipleFilesArgs {
    paths: Vec<String>,
}

impl ReadMultipleFilesHandler {
    /// Create a new multi-file read handler.
    pub fn new() -> Self {
        Self
    }

    /// Build the input schema for this tool.
    fn input_schema(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "paths".to_string(),
            json!({
                "type": "array",
                "items": {
                    "type": "string",
                },
                "description": "Array of full paths to files to read",
            }),
        );

        schema.insert("properties".to_string(), json!(properties));
        schema.insert("required".to_string(), json!(["paths"]));
        schema
    }
}

impl ToolHandler for ReadMultipleFilesHandler {
    fn name(&self) -> &str {
        "read_multiple_files"
    }

    fn description(&self) -> &str {
        "Read the contents of multiple files"
    }

    fn input_schema(&self) -> JsonObject {
        self.input_schema()
    }

    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let args: ReadMultipleFilesArgs =
                match serde_json::from_value(serde_json::Value::Object(args)) {
                    Ok(args) => args,
                    Err(e) => {
                        return Ok(error_envelope(format!(
                            "Invalid arguments for read_multiple_files: {}",
                            e
                        )));
                    }
                };

            let reads = args.paths.into_iter().map(|path| async move {
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => Content::text(format!("{}:\n{}\n---\n", path, content)),
                    Err(e) => Content::text(format!("Error reading {}: {}", path, e)),
                }
            });
            let content = futures::future::join_all(reads).await;

            Ok(CallToolResult {
                content,
                structured_content: None,
                is_error: None,
                meta: None,
            })
        })
    }
}
