use crate::error::{Error, Result};
use indexmap::IndexSet;
use reqwest::Url;
use serde_json::{from_str, Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_KEY_PHRASE_COUNT: usize = 50;
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 20.0;
pub const MIN_REQUESTS_PER_SECOND: f64 = 0.001;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;
pub const DEFAULT_PLOT_FILENAME: &str = "sentiment_plot.png";

const KNOWN_KEYS: &[&str] = &[
    "analytics_endpoint",
    "analytics_key",
    "cognitive_services",
    "excluded_key_phrases",
    "key_phrase_count",
    "print_summary",
    "show_sentiment_plot",
    "output_filename",
    "count_issue_body",
    "exclude_self_mentions",
    "exclude_user_names",
    "use_emojis",
    "language",
    "requests_per_second",
    "request_timeout_secs",
    "max_concurrent_requests",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub analytics_endpoint: Option<String>,
    pub analytics_key: Option<String>,
    pub excluded_key_phrases: IndexSet<String>,
    pub key_phrase_count: usize,
    pub print_summary: bool,
    pub show_sentiment_plot: bool,
    pub output_filename: Option<PathBuf>,
    /// Count the issue body toward `total_comments` and its author's `comment_count`.
    pub count_issue_body: bool,
    pub exclude_self_mentions: bool,
    /// Drop participant usernames from the key phrase table.
    pub exclude_user_names: bool,
    pub use_emojis: bool,
    pub language: String,
    pub requests_per_second: f64,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analytics_endpoint: None,
            analytics_key: None,
            excluded_key_phrases: IndexSet::new(),
            key_phrase_count: DEFAULT_KEY_PHRASE_COUNT,
            print_summary: true,
            show_sentiment_plot: true,
            output_filename: None,
            count_issue_body: false,
            exclude_self_mentions: false,
            exclude_user_names: true,
            use_emojis: false,
            language: "en".to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

// Create
impl Config {
    pub fn from_config(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path)
            .map_err(|e| Error::ConfigInvalid(format!("cannot read `{path}`: {e}")))?;
        Self::parse(&json_str)
    }
}

// Parser
impl Config {
    pub fn parse(json_str: &str) -> Result<Self> {
        let value: Value =
            from_str(json_str).map_err(|e| Error::ConfigInvalid(format!("not valid JSON: {e}")))?;
        let Some(details) = value.as_object() else {
            return Err(Error::ConfigInvalid("top level must be an object".into()));
        };
        for key in details.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring unknown configuration key");
            }
        }

        let mut config = Self::default();

        // Legacy block: {"cognitive_services": {"endpoint": .., "key": ..}}
        if let Some(legacy) = details.get("cognitive_services") {
            let Some(legacy) = legacy.as_object() else {
                return Err(Error::ConfigInvalid("`cognitive_services` must be an object".into()));
            };
            config.analytics_endpoint = string_field(legacy, "endpoint")?;
            config.analytics_key = string_field(legacy, "key")?;
        }
        if let Some(endpoint) = string_field(details, "analytics_endpoint")? {
            config.analytics_endpoint = Some(endpoint);
        }
        if let Some(key) = string_field(details, "analytics_key")? {
            config.analytics_key = Some(key);
        }
        if let Some(phrases) = details.get("excluded_key_phrases") {
            let Some(phrases) = phrases.as_array() else {
                return Err(Error::ConfigInvalid("`excluded_key_phrases` must be an array".into()));
            };
            config.excluded_key_phrases = phrases
                .iter()
                .map(|p| {
                    p.as_str().map(String::from).ok_or_else(|| {
                        Error::ConfigInvalid("`excluded_key_phrases` must contain strings".into())
                    })
                })
                .collect::<Result<_>>()?;
        }
        if let Some(count) = positive_int_field(details, "key_phrase_count")? {
            config.key_phrase_count = count as usize;
        }
        if let Some(flag) = bool_field(details, "print_summary")? {
            config.print_summary = flag;
        }
        if let Some(flag) = bool_field(details, "show_sentiment_plot")? {
            config.show_sentiment_plot = flag;
        }
        if let Some(name) = string_field(details, "output_filename")? {
            config.output_filename = Some(PathBuf::from(name));
        }
        if let Some(flag) = bool_field(details, "count_issue_body")? {
            config.count_issue_body = flag;
        }
        if let Some(flag) = bool_field(details, "exclude_self_mentions")? {
            config.exclude_self_mentions = flag;
        }
        if let Some(flag) = bool_field(details, "exclude_user_names")? {
            config.exclude_user_names = flag;
        }
        if let Some(flag) = bool_field(details, "use_emojis")? {
            config.use_emojis = flag;
        }
        if let Some(language) = string_field(details, "language")? {
            config.language = language;
        }
        if let Some(rps) = details.get("requests_per_second").filter(|v| !v.is_null()) {
            config.requests_per_second = rps.as_f64().ok_or_else(|| {
                Error::ConfigInvalid("`requests_per_second` must be a number".into())
            })?;
        }
        if let Some(secs) = positive_int_field(details, "request_timeout_secs")? {
            config.request_timeout_secs = secs;
        }
        if let Some(max) = positive_int_field(details, "max_concurrent_requests")? {
            config.max_concurrent_requests = max as usize;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match (&self.analytics_endpoint, &self.analytics_key) {
            (Some(endpoint), Some(_)) => {
                let url = Url::parse(endpoint).map_err(|e| {
                    Error::ConfigInvalid(format!("`analytics_endpoint` is not a URL: {e}"))
                })?;
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(Error::ConfigInvalid(format!(
                        "`analytics_endpoint` must be http(s), got `{}`",
                        url.scheme()
                    )));
                }
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(Error::ConfigInvalid("`analytics_key` is required with an endpoint".into()))
            }
            (None, Some(_)) => {
                return Err(Error::ConfigInvalid("`analytics_endpoint` is required with a key".into()))
            }
        }
        if self.key_phrase_count == 0 {
            return Err(Error::ConfigInvalid("`key_phrase_count` must be positive".into()));
        }
        if !self.requests_per_second.is_finite()
            || self.requests_per_second < MIN_REQUESTS_PER_SECOND
        {
            return Err(Error::ConfigInvalid(format!(
                "`requests_per_second` must be at least {MIN_REQUESTS_PER_SECOND}, got {}",
                self.requests_per_second
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::ConfigInvalid("`request_timeout_secs` must be positive".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(Error::ConfigInvalid("`max_concurrent_requests` must be positive".into()));
        }
        if self.language.trim().is_empty() {
            return Err(Error::ConfigInvalid("`language` must not be empty".into()));
        }
        Ok(())
    }
}

// Outputs
impl Config {
    pub fn analytics_enabled(&self) -> bool {
        self.analytics_endpoint.is_some() && self.analytics_key.is_some()
    }

    pub fn json_output_path(&self) -> Option<PathBuf> {
        self.output_filename
            .as_ref()
            .map(|name| PathBuf::from(format!("{}-raw_output.json", name.display())))
    }

    pub fn plot_output_path(&self) -> PathBuf {
        match &self.output_filename {
            Some(name) => PathBuf::from(format!("{}-sentiment_plot.png", name.display())),
            None => PathBuf::from(DEFAULT_PLOT_FILENAME),
        }
    }
}

fn string_field(details: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match details.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::ConfigInvalid(format!("`{key}` must be a string"))),
    }
}

fn bool_field(details: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match details.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::ConfigInvalid(format!("`{key}` must be a boolean"))),
    }
}

fn positive_int_field(details: &Map<String, Value>, key: &str) -> Result<Option<u64>> {
    let Some(value) = details.get(key).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    match value.as_i64() {
        Some(n) if n > 0 => Ok(Some(n as u64)),
        _ => Err(Error::ConfigInvalid(format!(
            "`{key}` must be a positive integer, got {value}"
        ))),
    }
}
