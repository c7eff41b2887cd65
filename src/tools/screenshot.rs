//! Handler for the `screenshot` tool.
//!
//! Captures a full-page PNG of a URL (or a path on the local dev server) and
//! writes it to a caller-chosen location.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::json;

use crate::browser::PageCapturer;
use crate::config::LOCAL_BASE_URL;
use crate::tools::{ToolError, ToolHandler};

/// Handler for the `screenshot` tool.
pub struct ScreenshotHandler {
    capturer: Arc<dyn PageCapturer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotArgs {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    relative_path: Option<String>,
    full_path_to_screenshot: String,
}

impl ScreenshotHandler {
    /// Create a new screenshot handler.
    pub fn new(capturer: Arc<dyn PageCapturer>) -> Self {
        Self { capturer }
    }

    /// Build the input schema for this tool.
    fn input_schema(&self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "url".to_string(),
            json!({
                "type": "string",
                "description": "Full URL to screenshot",
            }),
        );
        properties.insert(
            "relativePath".to_string(),
            json!({
                "type": "string",
                "description": "Relative path appended to http://localhost:3000",
            }),
        );
        properties.insert(
            "fullPathToScreenshot".to_string(),
            json!({
                "type": "string",
                "description": "Path to where the screenshot file should be saved. This should be a cwd-style full path to the file (not relative to the current working directory) including the file name and extension.",
            }),
        );

        schema.insert("properties".to_string(), json!(properties));
        schema.insert("required".to_string(), json!([]));
        schema
    }
}

/// Pick the capture target: an explicit URL wins, otherwise a relative path
/// is joined onto the local dev server base with exactly one slash between.
/// Empty strings count as absent.
fn resolve_target(url: Option<&str>, relative_path: Option<&str>) -> Option<String> {
    match url {
        Some(u) if !u.is_empty() => Some(u.to_string()),
        _ => relative_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}", LOCAL_BASE_URL, p.strip_prefix('/').unwrap_or(p))),
    }
}

impl ToolHandler for ScreenshotHandler {
    fn name(&self) -> &str {
        "screenshot"
    }

    fn description(&self) -> &str {
        "Take a screenshot of a URL or a local path (relative URL appended to http://localhost:3000)."
    }

    fn input_schema(&self) -> JsonObject {
        self.input_schema()
    }

    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
        let capturer = self.capturer.clone();

        Box::pin(async move {
            let args: ScreenshotArgs = serde_json::from_value(serde_json::Value::Object(args))
                .map_err(|e| ToolError::InvalidArguments {
                    tool: "screenshot".to_string(),
                    reason: e.to_string(),
                })?;

            // Target resolution happens before any browser or filesystem work.
            let target = resolve_target(args.url.as_deref(), args.relative_path.as_deref())
                .ok_or_else(|| ToolError::InvalidArguments {
                    tool: "screenshot".to_string(),
                    reason: "Must provide either 'url' or 'relativePath'".to_string(),
                })?;

            let save_path = std::path::absolute(&args.full_path_to_screenshot).map_err(|e| {
                ToolError::InvalidArguments {
                    tool: "screenshot".to_string(),
                    reason: format!(
                        "cannot resolve '{}': {}",
                        args.full_path_to_screenshot, e
                    ),
                }
            })?;

            let image = capturer
                .capture(&target)
                .await
                .map_err(|e| ToolError::Execution {
                    tool: "screenshot".to_string(),
                    source: e,
                })?;

            tokio::fs::write(&save_path, &image)
                .await
                .map_err(|e| ToolError::Execution {
                    tool: "screenshot".to_string(),
                    source: anyhow::anyhow!("failed to write {}: {}", save_path.display(), e),
                })?;

            let text = format!(
                "Screenshot saved to {p}. Before continuing, you MUST ask the user to drag and drop the screenshot into the chat window. The path to the screenshot is {p}.",
                p = save_path.display()
            );

            Ok(CallToolResult {
                content: vec![Content::text(text)],
                structured_content: None,
                is_error: None,
                meta: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubCapturer {
        urls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StubCapturer {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn captured_urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl PageCapturer for StubCapturer {
        fn capture(
            &self,
            url: &str,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send + '_>> {
            self.urls.lock().unwrap().push(url.to_string());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    anyhow::bail!("browser exploded");
                }
                Ok(vec![0x89, b'P', b'N', b'G'])
            })
        }
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().expect("object args")
    }

    fn content_text(result: &CallToolResult, idx: usize) -> String {
        let value = serde_json::to_value(&result.content[idx]).expect("content serializes");
        value["text"].as_str().expect("text content").to_string()
    }

    #[test]
    fn explicit_url_wins_over_relative_path() {
        let target = resolve_target(Some("https://example.com/a"), Some("ignored"));
        assert_eq!(target.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn relative_path_joins_local_base_with_one_slash() {
        assert_eq!(
            resolve_target(None, Some("foo")).as_deref(),
            Some("http://localhost:3000/foo")
        );
        assert_eq!(
            resolve_target(None, Some("/foo")).as_deref(),
            Some("http://localhost:3000/foo")
        );
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(resolve_target(Some(""), Some("foo")).as_deref(), Some("http://localhost:3000/foo"));
        assert_eq!(resolve_target(None, Some("")), None);
        assert_eq!(resolve_target(None, None), None);
    }

    #[tokio::test]
    async fn missing_target_fails_before_any_capture() {
        let capturer = StubCapturer::ok();
        let handler = ScreenshotHandler::new(capturer.clone());

        let err = handler
            .execute(args(serde_json::json!({ "fullPathToScreenshot": "/tmp/shot.png" })))
            .await
            .unwrap_err();

        match err {
            ToolError::InvalidArguments { reason, .. } => {
                assert_eq!(reason, "Must provide either 'url' or 'relativePath'");
            }
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
        assert!(capturer.captured_urls().is_empty());
    }

    #[tokio::test]
    async fn missing_save_path_is_rejected() {
        let handler = ScreenshotHandler::new(StubCapturer::ok());
        let err = handler
            .execute(args(serde_json::json!({ "url": "https://example.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn capture_writes_png_and_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let save_path = dir.path().join("shot.png");
        let capturer = StubCapturer::ok();
        let handler = ScreenshotHandler::new(capturer.clone());

        let result = handler
            .execute(args(serde_json::json!({
                "relativePath": "dashboard",
                "fullPathToScreenshot": save_path.to_str().unwrap(),
            })))
            .await
            .unwrap();

        assert_eq!(
            capturer.captured_urls(),
            vec!["http://localhost:3000/dashboard".to_string()]
        );
        assert_eq!(
            std::fs::read(&save_path).expect("file written"),
            vec![0x89, b'P', b'N', b'G']
        );
        assert_eq!(result.is_error, None);
        assert_eq!(result.content.len(), 1);
        let text = content_text(&result, 0);
        let shown = save_path.display().to_string();
        assert!(text.starts_with(&format!("Screenshot saved to {shown}.")));
        assert!(text.contains("drag and drop"));
        assert!(text.ends_with(&format!("The path to the screenshot is {shown}.")));
    }

    #[tokio::test]
    async fn capture_failure_aborts_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let save_path = dir.path().join("shot.png");
        let handler = ScreenshotHandler::new(StubCapturer::failing());

        let err = handler
            .execute(args(serde_json::json!({
                "url": "https://example.com",
                "fullPathToScreenshot": save_path.to_str().unwrap(),
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Execution { .. }));
        assert!(!save_path.exists());
    }
}
