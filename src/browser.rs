//! Headless-browser page capture.
//!
//! Backs the `screenshot` tool. The production implementation launches a
//! transient headless Chrome per capture; the browser process is killed when
//! the handle drops, so it never outlives the call, failures included.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};

/// Navigates to a URL and captures a full-page PNG.
pub trait PageCapturer: Send + Sync {
    fn capture(&self, url: &str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + '_>>;
}

/// `PageCapturer` backed by headless Chrome, one browser per capture.
pub struct ChromeCapturer;

impl ChromeCapturer {
    pub fn new() -> Self {
        ChromeCapturer
    }
}

impl Default for ChromeCapturer {
    fn default() -> Self {
        Self::new()
    }
}

fn capture_page(url: &str) -> Result<Vec<u8>> {
    let launch_options = LaunchOptions {
        headless: true,
        ..Default::default()
    };

    let browser = Browser::new(launch_options)
        .map_err(|e| anyhow::anyhow!("failed to launch browser: {}", e))?;

    let tab = browser
        .new_tab()
        .map_err(|e| anyhow::anyhow!("failed to create tab: {}", e))?;

    tab.navigate_to(url)
        .map_err(|e| anyhow::anyhow!("failed to navigate: {}", e))?
        .wait_until_navigated()
        .map_err(|e| anyhow::anyhow!("failed to wait for navigation: {}", e))?;

    let data = tab
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| anyhow::anyhow!("failed to capture screenshot: {}", e))?;

    Ok(data)
}

impl PageCapturer for ChromeCapturer {
    fn capture(&self, url: &str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            // The CDP client is synchronous; keep it off the async workers.
            tokio::task::spawn_blocking(move || capture_page(&url))
                .await
                .map_err(|e| anyhow::anyhow!("capture task failed: {}", e))?
        })
    }
}
