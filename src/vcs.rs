//! Working-tree diff production for the `code-review` tool.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use tokio::process::Command;

/// Produces a diff of the working tree for a repository path.
pub trait DiffSource: Send + Sync {
    fn diff(&self, folder: &str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// `DiffSource` that shells out to the `git` binary.
pub struct GitDiff;

impl GitDiff {
    pub fn new() -> Self {
        GitDiff
    }
}

impl Default for GitDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffSource for GitDiff {
    fn diff(&self, folder: &str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let folder = folder.to_string();
        Box::pin(async move {
            let output = Command::new("git")
                .arg("-C")
                .arg(&folder)
                .arg("diff")
                .output()
                .await
                .map_err(|e| anyhow::anyhow!("git failed: {e}"))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("git -C {} diff failed: {}", folder, stderr.trim());
            }

            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn diff_outside_a_repository_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = GitDiff::new();
        let result = source.diff(dir.path().to_str().expect("utf-8 path")).await;
        assert!(result.is_err());
    }
}
