use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail, ensure};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::formatters::RenderOptions;
use crate::search::RetryPolicy;
use crate::window::WindowTracker;

/// Everything the tail loop needs, after files, environment and CLI flags
/// have been merged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    pub elasticsearch_url: String,
    pub elasticsearch_port: u16,
    /// Minutes before now the search window ends.
    pub start_time: i64,
    /// Minutes the first search looks back.
    pub sync_depth: i64,
    /// Seconds between searches.
    pub sync_interval: u64,
    pub count: usize,
    pub search_host: bool,
    pub highlight: bool,
    pub log_verbose: bool,
    pub transport_retries: u32,
    pub retry_backoff: u64,
    pub request_timeout: u64,
    pub max_polls: Option<u64>,
    /// Named queries selectable with `--define`.
    pub define: BTreeMap<String, String>,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            elasticsearch_url: "localhost".to_string(),
            elasticsearch_port: 9200,
            start_time: 0,
            sync_depth: 10,
            sync_interval: 5,
            count: 500,
            search_host: false,
            highlight: false,
            log_verbose: false,
            transport_retries: 0,
            retry_backoff: 1,
            request_timeout: 30,
            max_polls: None,
            define: BTreeMap::new(),
        }
    }
}

/// Where configuration files are read from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Files that must exist, applied after the default locations.
    pub files: Vec<PathBuf>,
    /// Skip the default locations.
    pub no_config: bool,
    /// Variables to read instead of the process environment.
    pub environment: Option<Map<String, String>>,
}

/// Values given on the command line. `None` leaves the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub elasticsearch_url: Option<String>,
    pub elasticsearch_port: Option<u16>,
    pub start_time: Option<i64>,
    pub sync_depth: Option<i64>,
    pub sync_interval: Option<u64>,
    pub count: Option<usize>,
    pub search_host: Option<bool>,
    pub highlight: Option<bool>,
    pub log_verbose: Option<bool>,
    pub transport_retries: Option<u32>,
    pub retry_backoff: Option<u64>,
    pub request_timeout: Option<u64>,
    pub max_polls: Option<u64>,
}

impl TailConfig {
    /// Load files and `LOGASAURUS__*` environment variables, then apply CLI
    /// overrides and validate.
    pub fn load(sources: &ConfigSources, overrides: &SettingsOverrides) -> Result<Self> {
        let builder = build_config(sources)?;
        let mut settings: TailConfig = builder
            .try_deserialize()
            .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
        settings.apply_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(url) = overrides.elasticsearch_url.clone() {
            self.elasticsearch_url = url;
        }
        if let Some(port) = overrides.elasticsearch_port {
            self.elasticsearch_port = port;
        }
        if let Some(value) = overrides.start_time {
            self.start_time = value;
        }
        if let Some(value) = overrides.sync_depth {
            self.sync_depth = value;
        }
        if let Some(value) = overrides.sync_interval {
            self.sync_interval = value;
        }
        if let Some(value) = overrides.count {
            self.count = value;
        }
        if let Some(value) = overrides.search_host {
            self.search_host = value;
        }
        if let Some(value) = overrides.highlight {
            self.highlight = value;
        }
        if let Some(value) = overrides.log_verbose {
            self.log_verbose = value;
        }
        if let Some(value) = overrides.transport_retries {
            self.transport_retries = value;
        }
        if let Some(value) = overrides.retry_backoff {
            self.retry_backoff = value;
        }
        if let Some(value) = overrides.request_timeout {
            self.request_timeout = value;
        }
        if overrides.max_polls.is_some() {
            self.max_polls = overrides.max_polls;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.elasticsearch_url.trim().is_empty(),
            "elasticsearch_url must not be empty"
        );
        ensure!(self.sync_interval >= 1, "sync_interval must be at least 1 second");
        ensure!(self.sync_depth >= 0, "sync_depth must not be negative");
        ensure!(
            self.request_timeout >= 1,
            "request_timeout must be at least 1 second"
        );
        WindowTracker::new(
            chrono::Utc::now(),
            self.start_time,
            self.sync_depth,
            self.sync_interval,
        )?;
        Ok(())
    }

    /// Pick the query from the command line or from the `define` table.
    pub fn resolve_query(&self, query: Option<&str>, define: Option<&str>) -> Result<String> {
        match (query, define) {
            (Some(_), Some(_)) => bail!("give either a query or --define, not both"),
            (Some(query), None) => Ok(query.to_string()),
            (None, Some(name)) => self.define.get(name).cloned().with_context(|| {
                let known: Vec<&str> = self.define.keys().map(String::as_str).collect();
                format!(
                    "no defined query named {name:?} (known: {})",
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                )
            }),
            (None, None) => bail!("a query or --define NAME is required"),
        }
    }

    pub fn search_url(&self) -> String {
        format!(
            "http://{}:{}/_search?pretty",
            self.elasticsearch_url, self.elasticsearch_port
        )
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            search_host: self.search_host,
            highlight: self.highlight,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.transport_retries,
            backoff: std::time::Duration::from_secs(self.retry_backoff),
        }
    }
}

/// Combine default locations, explicit files and the environment.
fn build_config(sources: &ConfigSources) -> Result<Config> {
    let mut builder = Config::builder();

    if !sources.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &sources.files {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("logasaurus")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(sources.environment.clone()),
    );

    builder.build().context("failed to read configuration sources")
}

/// Default configuration file locations, lowest precedence first.
pub fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("logasaurus").join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".logasaurus.toml"));
    }

    files
}
