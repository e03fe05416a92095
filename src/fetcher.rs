use std::ffi::OsStr;
use std::thread;
use std::time::Instant;

use headless_chrome::{Browser, LaunchOptions};
use reqwest::blocking::Client;
use reqwest::redirect;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;

/// Anything that can turn a URL into its script-rendered HTML.
pub trait PageRenderer {
    fn render(&self, url: &str) -> Result<String, ScrapeError>;
}

pub fn build_client(config: &ScraperConfig) -> Result<Client, ScrapeError> {
    let redirect_policy = redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > 100 {
            attempt.error("Too many redirects (>100)")
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .redirect(redirect_policy)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| ScrapeError::fetch(&config.api_root, e))
}

/// GETs `url` and decodes the body as `T`.
pub fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, ScrapeError> {
    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(|e| ScrapeError::fetch(url, e))?;
    debug!("{} bytes from {}", body.len(), url);

    serde_json::from_str(&body).map_err(|source| ScrapeError::UnexpectedResponse {
        url: url.to_string(),
        source,
    })
}

/// Renders pages in one shared headless Chrome, a fresh tab per page.
pub struct HeadlessRenderer {
    browser: Browser,
    config: ScraperConfig,
}

impl HeadlessRenderer {
    pub fn launch(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let launch_failed = |e: &dyn std::fmt::Display| ScrapeError::RenderFailed {
            url: config.site_origin.clone(),
            reason: e.to_string(),
        };
        let user_agent = format!("--user-agent={}", config.user_agent);
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .idle_browser_timeout(config.render_timeout + config.settle_delay)
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--window-size=1920,1080"),
                OsStr::new(user_agent.as_str()),
            ])
            .build()
            .map_err(|e| launch_failed(&e))?;
        let browser = Browser::new(options).map_err(|e| launch_failed(&e))?;

        Ok(Self {
            browser,
            config: config.clone(),
        })
    }
}

impl PageRenderer for HeadlessRenderer {
    fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let timeout = self.config.render_timeout;
        let started = Instant::now();
        let failed = |e: anyhow::Error| {
            if started.elapsed() >= timeout {
                ScrapeError::RenderTimeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                ScrapeError::RenderFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let tab = self.browser.new_tab().map_err(failed)?;
        tab.set_default_timeout(timeout);
        let html = close_after(
            || {
                tab.navigate_to(url)?.wait_until_navigated()?;
                thread::sleep(self.config.settle_delay);
                tab.get_content()
            },
            || tab.close(true),
        )
        .map_err(failed)?;
        debug!("rendered {} ({} bytes) in {:?}", url, html.len(), started.elapsed());
        Ok(html)
    }
}

/// Runs `work`, then `close` whether `work` succeeded or not. A failing
/// close is logged and does not mask the result of `work`.
fn close_after<T>(
    work: impl FnOnce() -> anyhow::Result<T>,
    close: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<T> {
    let result = work();
    if let Err(e) = close() {
        debug!("closing tab: {e}");
    }
    result
}
