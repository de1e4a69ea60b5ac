//! Browser executable discovery and managed download
//!
//! Discovery order: the `CHROMIUM_PATH` environment variable, well-known
//! installation paths for the requested [`BrowserKind`], then `which` on
//! Unix systems. When nothing is installed, a managed Chromium build can
//! be downloaded into the cache directory via the chromiumoxide fetcher.

use anyhow::{Context, Result};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

use super::BrowserKind;

/// Well-known installation paths for the given kind on this platform
fn candidate_paths(kind: BrowserKind) -> Vec<&'static str> {
    if cfg!(target_os = "windows") {
        match kind {
            BrowserKind::Chromium => vec![
                r"C:\Program Files\Chromium\Application\chrome.exe",
                r"C:\Program Files (x86)\Chromium\Application\chrome.exe",
            ],
            BrowserKind::Chrome => vec![
                r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            ],
            BrowserKind::Edge => vec![
                r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
                r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
            ],
        }
    } else if cfg!(target_os = "macos") {
        match kind {
            BrowserKind::Chromium => vec![
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/opt/homebrew/bin/chromium",
            ],
            BrowserKind::Chrome => vec![
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/Applications/Google Chrome Beta.app/Contents/MacOS/Google Chrome Beta",
                "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
            ],
            BrowserKind::Edge => vec![
                "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            ],
        }
    } else {
        match kind {
            BrowserKind::Chromium => vec![
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/snap/bin/chromium",
                "/usr/local/bin/chromium",
            ],
            BrowserKind::Chrome => vec![
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/opt/google/chrome/chrome",
            ],
            BrowserKind::Edge => vec![
                "/usr/bin/microsoft-edge",
                "/usr/bin/microsoft-edge-stable",
                "/opt/microsoft/msedge/msedge",
            ],
        }
    }
}

/// Command names to try via `which` on Unix systems
fn which_commands(kind: BrowserKind) -> &'static [&'static str] {
    match kind {
        BrowserKind::Chromium => &["chromium", "chromium-browser"],
        BrowserKind::Chrome => &["google-chrome", "google-chrome-stable", "chrome"],
        BrowserKind::Edge => &["microsoft-edge", "microsoft-edge-stable"],
    }
}

/// Find an executable for the requested browser kind.
///
/// The `CHROMIUM_PATH` environment variable overrides all other methods
/// regardless of kind.
pub fn find_executable(kind: BrowserKind) -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(
                "using browser from CHROMIUM_PATH environment variable: {}",
                path.display()
            );
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH points to non-existent file: {}",
            path.display()
        );
    }

    for path_str in candidate_paths(kind) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("found {} at: {}", kind, path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in which_commands(kind) {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!("found {} via 'which': {}", kind, path.display());
                    return Ok(path);
                }
            }
        }
    }

    Err(anyhow::anyhow!("no {kind} executable found"))
}

/// Download a managed Chromium build and return its executable path.
///
/// Used as the fallback when discovery fails. The fetcher only ships
/// Chromium builds, so non-Chromium kinds fall back to Chromium with a
/// warning rather than failing outright.
pub async fn download_managed_browser(kind: BrowserKind) -> Result<PathBuf> {
    if kind != BrowserKind::Chromium {
        warn!("no {kind} installed; downloading a managed Chromium build instead");
    } else {
        info!("downloading managed Chromium build");
    }

    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pagepool")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("failed to build fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("failed to fetch browser")?;

    info!(
        "downloaded Chromium to: {}",
        revision_info.folder_path.display()
    );

    Ok(revision_info.executable_path)
}
