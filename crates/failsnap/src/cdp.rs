//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Only compiled with the `browser` feature. The driver owns a private
//! single-worker tokio runtime, which keeps the CDP event handler running
//! between calls, and blocks on every CDP call, so it satisfies the synchronous
//! [`BrowserDriver`] trait. Console messages are gathered by a hook script
//! injected after each navigation; messages logged before it runs are lost.

use crate::driver::{BrowserDriver, ConsoleEntry, ConsoleLevel};
use crate::launch::BrowserOptions;
use crate::result::{FailsnapError, FailsnapResult};
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use tokio::runtime::Runtime;

const CONSOLE_HOOK: &str = r#"
(function() {
    if (window.__failsnap_console) { return true; }
    window.__failsnap_console = [];
    ['log', 'info', 'warn', 'error', 'debug'].forEach(function(method) {
        const original = console[method].bind(console);
        console[method] = function(...args) {
            window.__failsnap_console.push({
                level: method,
                message: args.map(String).join(' '),
                source: 'console-api',
                timestamp: Date.now(),
            });
            original(...args);
        };
    });
    window.addEventListener('error', function(e) {
        window.__failsnap_console.push({
            level: 'error',
            message: e.message,
            source: e.filename || null,
            timestamp: Date.now(),
        });
    });
    return true;
})()
"#;

const CONSOLE_QUERY: &str = "JSON.stringify(window.__failsnap_console || [])";

#[derive(Debug, Deserialize)]
struct RawConsoleEntry {
    level: String,
    message: String,
    source: Option<String>,
    timestamp: f64,
}

impl From<RawConsoleEntry> for ConsoleEntry {
    fn from(raw: RawConsoleEntry) -> Self {
        let entry = Self::new(ConsoleLevel::from_method(&raw.level), raw.message)
            .with_timestamp(raw.timestamp as u64);
        match raw.source {
            Some(source) => entry.with_source(source),
            None => entry,
        }
    }
}

fn driver_runtime() -> FailsnapResult<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?)
}

/// Chromium session driven over CDP
#[derive(Debug)]
pub struct CdpDriver {
    runtime: Runtime,
    browser: Browser,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
}

impl CdpDriver {
    /// Launch Chromium with `options` and open a blank page
    pub fn launch(options: &BrowserOptions) -> FailsnapResult<Self> {
        let runtime = driver_runtime()?;

        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .args(options.args.iter().cloned());
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|message| FailsnapError::BrowserLaunch { message })?;

        let (browser, page, handler) = runtime.block_on(async {
            let (browser, mut handler) =
                Browser::launch(config)
                    .await
                    .map_err(|e| FailsnapError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| FailsnapError::driver("new_page", e))?;
            Ok::<_, FailsnapError>((browser, page, handle))
        })?;

        tracing::info!(args = ?options.args, headless = options.headless, "launched chromium");
        Ok(Self {
            runtime,
            browser,
            page,
            handler,
        })
    }

    /// Navigate to `url` and install the console hook
    pub fn navigate(&mut self, url: &str) -> FailsnapResult<()> {
        let page = &self.page;
        self.runtime.block_on(async {
            page.goto(url)
                .await
                .map_err(|e| FailsnapError::driver("navigate", e))?;
            page.evaluate(CONSOLE_HOOK)
                .await
                .map_err(|e| FailsnapError::driver("install_console_hook", e))?;
            Ok(())
        })
    }

    /// Close the browser
    pub fn close(mut self) -> FailsnapResult<()> {
        let browser = &mut self.browser;
        let closed = self.runtime.block_on(async { browser.close().await });
        self.handler.abort();
        closed
            .map(|_| ())
            .map_err(|e| FailsnapError::driver("close", e))
    }

    fn evaluate_string(&self, command: &str, script: &str) -> FailsnapResult<String> {
        let page = &self.page;
        self.runtime.block_on(async {
            page.evaluate(script)
                .await
                .map_err(|e| FailsnapError::driver(command, e))?
                .into_value::<String>()
                .map_err(|e| FailsnapError::driver(command, e))
        })
    }
}

impl BrowserDriver for CdpDriver {
    fn set_window_size(&mut self, width: u32, height: u32) -> FailsnapResult<()> {
        let page = &self.page;
        let params =
            SetDeviceMetricsOverrideParams::new(i64::from(width), i64::from(height), 1.0, false);
        self.runtime.block_on(async {
            page.execute(params)
                .await
                .map_err(|e| FailsnapError::driver("set_window_size", e))
        })?;
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> FailsnapResult<serde_json::Value> {
        let page = &self.page;
        let result = self.runtime.block_on(async {
            page.evaluate(script)
                .await
                .map_err(|e| FailsnapError::Script {
                    message: e.to_string(),
                })
        })?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    fn screenshot_png(&mut self) -> FailsnapResult<Vec<u8>> {
        let page = &self.page;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = self.runtime.block_on(async {
            page.execute(params)
                .await
                .map_err(FailsnapError::screenshot)
        })?;

        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(FailsnapError::screenshot)
    }

    fn current_url(&mut self) -> FailsnapResult<String> {
        self.evaluate_string("current_url", "window.location.href")
    }

    fn console_log(&mut self) -> FailsnapResult<Vec<ConsoleEntry>> {
        let json = self.evaluate_string("console_log", CONSOLE_QUERY)?;
        let raw: Vec<RawConsoleEntry> = serde_json::from_str(&json)?;
        Ok(raw.into_iter().map(ConsoleEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_conversion() {
        let raw: Vec<RawConsoleEntry> = serde_json::from_str(
            r#"[{"level":"warn","message":"slow","source":"console-api","timestamp":1700000000000.0},
                {"level":"error","message":"boom","source":null,"timestamp":1.5}]"#,
        )
        .unwrap();
        let entries: Vec<ConsoleEntry> = raw.into_iter().map(ConsoleEntry::from).collect();

        assert_eq!(entries[0].level, ConsoleLevel::Warning);
        assert_eq!(entries[0].source.as_deref(), Some("console-api"));
        assert_eq!(entries[0].timestamp, 1_700_000_000_000);
        assert_eq!(entries[1].to_string(), "[SEVERE] boom");
    }

    #[test]
    fn test_runtime_polls_tasks_outside_block_on() {
        let runtime = driver_runtime().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let _handle = runtime.spawn(async move {
            tx.send(()).unwrap();
        });
        assert!(rx.recv_timeout(std::time::Duration::from_secs(5)).is_ok());
    }
}
