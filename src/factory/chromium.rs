//! Production page factory backed by a Chrome/Chromium process over CDP

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::{Page, cdp};
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use super::{ContextOptions, LaunchOptions, PageFactory, executable, profile};

/// Arguments applied to every launch, before [`LaunchOptions::args`]
const DEFAULT_ARGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-popup-blocking",
    "--disable-hang-monitor",
    "--disable-prompt-on-repost",
    "--metrics-recording-only",
    "--password-store=basic",
    "--use-mock-keychain",
    "--mute-audio",
];

/// A launched browser process together with its CDP event handler task
/// and its isolated user data directory.
///
/// The handler task MUST be aborted when the session ends, otherwise it
/// runs indefinitely after the browser is gone; `Drop` guarantees this
/// for the unclean paths.
#[derive(Debug)]
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Remove the user data directory (blocking operation)
    ///
    /// Must run after the browser process has exited; Chrome keeps file
    /// handles open in the profile until then.
    fn cleanup_user_data_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("removing user data directory {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "failed to remove user data directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop kills the Chrome process if close() was never called
        if self.user_data_dir.is_some() {
            self.cleanup_user_data_dir();
        }
    }
}

/// [`PageFactory`] implementation that launches real Chrome/Chromium and
/// opens tabs via `Target.createTarget`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumFactory;

impl ChromiumFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageFactory for ChromiumFactory {
    type Session = BrowserSession;
    type Page = Page;

    async fn open_session(&self, launch: &LaunchOptions) -> Result<BrowserSession> {
        let executable = match &launch.executable {
            Some(path) => path.clone(),
            None => match executable::find_executable(launch.kind) {
                Ok(path) => path,
                Err(_) => executable::download_managed_browser(launch.kind).await?,
            },
        };

        let profile = profile::create_unique_profile(launch.user_data_root.as_deref())?;
        let user_data_dir = profile.into_path();

        let mut config_builder = BrowserConfigBuilder::default()
            .request_timeout(launch.request_timeout)
            .window_size(launch.window_width, launch.window_height)
            .user_data_dir(user_data_dir.clone())
            .chrome_executable(executable);

        if launch.headless {
            config_builder = config_builder.headless_mode(HeadlessMode::default());
        } else {
            config_builder = config_builder.with_head();
        }

        for arg in DEFAULT_ARGS {
            config_builder = config_builder.arg(*arg);
        }
        for arg in &launch.args {
            config_builder = config_builder.arg(arg);
        }

        let browser_config = config_builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        info!("launching {} browser", launch.kind);
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch browser")?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    error!("browser handler error: {:?}", e);
                }
            }
            debug!("browser event handler task completed");
        });

        Ok(BrowserSession::new(browser, handler_task, user_data_dir))
    }

    async fn close_session(&self, mut session: BrowserSession) -> Result<()> {
        session
            .browser
            .close()
            .await
            .context("failed to close browser")?;
        let _ = session.browser.wait().await;
        session.handler.abort();
        session.cleanup_user_data_dir();
        Ok(())
    }

    async fn create(&self, session: &BrowserSession, context: &ContextOptions) -> Result<Page> {
        let page = session
            .browser()
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        // The tab already exists in the browser; if an override fails the
        // caller never sees the handle, so close the tab before bailing.
        if let Err(e) = apply_overrides(&page, context).await {
            if let Err(close_err) = page.close().await {
                warn!("failed to close page after override failure: {close_err}");
            }
            return Err(e);
        }

        Ok(page)
    }

    async fn destroy(&self, _session: &BrowserSession, page: Page) -> Result<()> {
        page.close().await.context("failed to close page")?;
        Ok(())
    }
}

/// Apply per-page context overrides via CDP
async fn apply_overrides(page: &Page, context: &ContextOptions) -> Result<()> {
    if let Some(user_agent) = &context.user_agent {
        page.execute(cdp::browser_protocol::network::SetUserAgentOverrideParams {
            user_agent: user_agent.clone(),
            accept_language: None,
            platform: None,
            user_agent_metadata: None,
        })
        .await
        .context("failed to apply user agent override")?;
    }

    if let Some(viewport) = context.viewport {
        page.execute(
            cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(viewport.width))
                .height(i64::from(viewport.height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(anyhow::Error::msg)?,
        )
        .await
        .context("failed to apply viewport override")?;
    }

    Ok(())
}
