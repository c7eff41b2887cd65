//! Tool handler registry for managing MCP tool implementations.
//!
//! This module provides a simple way to register and invoke tool handlers,
//! making it easy to add new tools without modifying the core `ServerHandler`
//! implementation.

mod registry;

pub use registry::{ToolError, ToolHandler, ToolRegistry};

// Tool handler implementations
mod screenshot;
mod architect;
mod code_review;
mod file_reader;

pub use screenshot::ScreenshotHandler;
pub use architect::ArchitectHandler;
pub use code_review::CodeReviewHandler;
pub use file_reader::{ReadFileHandler, ReadMultipleFilesHandler};
