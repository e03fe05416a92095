use std::path::PathBuf;
use std::time::Duration;

pub const SITE_ORIGIN: &str = "https://www.digikala.com";
pub const API_ROOT: &str = "https://api.digikala.com";
pub const DEFAULT_PAGES: u32 = 3;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Runtime knobs for both entry points. Defaults mirror the live site.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub site_origin: String,
    pub api_root: String,
    /// Ceiling on navigation plus script execution for one page.
    pub render_timeout: Duration,
    /// Wait after load so lazily populated tiles show up.
    pub settle_delay: Duration,
    pub default_pages: u32,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub headless: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_origin: SITE_ORIGIN.to_string(),
            api_root: API_ROOT.to_string(),
            render_timeout: Duration::from_secs(50),
            settle_delay: Duration::from_secs(2),
            default_pages: DEFAULT_PAGES,
            output_dir: PathBuf::from("raw_Data"),
            user_agent: USER_AGENT.to_string(),
            headless: true,
        }
    }
}
