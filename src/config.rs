//! Runtime settings.
//!
//! There are no command-line flags besides the URL list; the few tunables
//! are read from the environment and fall back to sensible defaults.
use anyhow::{Context, Result, anyhow};
use std::time::Duration;

pub const TICK_ENV: &str = "MULTIGET_TICK_MS";
pub const USER_AGENT_ENV: &str = "MULTIGET_USER_AGENT";
pub const CONNECT_TIMEOUT_ENV: &str = "MULTIGET_CONNECT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// How often the status line is redrawn.
    pub tick_interval: Duration,
    pub user_agent: String,
    /// Upper bound on establishing a connection. The transfer itself is
    /// never timed out.
    pub connect_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(500),
            user_agent: concat!("multiget/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(TICK_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", TICK_ENV))?;
            if ms == 0 {
                return Err(anyhow!("{} must be greater than zero", TICK_ENV));
            }
            settings.tick_interval = Duration::from_millis(ms);
        }

        if let Some(agent) = lookup(USER_AGENT_ENV)
            && !agent.trim().is_empty()
        {
            settings.user_agent = agent.trim().to_string();
        }

        if let Some(raw) = lookup(CONNECT_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", CONNECT_TIMEOUT_ENV))?;
            settings.connect_timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }

    /// Builds the HTTP client shared by every transfer of a run.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .connect_timeout(self.connect_timeout)
            .build()
            .context("failed to build HTTP client")
    }
}
