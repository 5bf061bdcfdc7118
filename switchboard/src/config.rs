//! Workspace configuration: the provider set plus engine limits.
//!
//! Configuration comes either from JSON or from process environment variables,
//! the latter producing the stock calculator, GitHub, and Atlassian providers.
//!
//! ```rust
//! use switchboard::SwitchboardConfig;
//!
//! let config = SwitchboardConfig::from_json_str(r#"{
//!     "providers": [
//!         {"name": "calculator",
//!          "transport": {"type": "stdio", "command": "python3", "args": ["calc.py"]},
//!          "topics": ["arithmetic"]}
//!     ],
//!     "invocation_timeout_ms": 15000
//! }"#).expect("valid config");
//!
//! assert_eq!(config.providers[0].name, "calculator");
//! assert_eq!(config.invocation_timeout.as_secs(), 15);
//! assert_eq!(config.max_message_chars, 2000);
//! ```

use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use swcommon::Topic;
use swengine::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_INVOCATION_TIMEOUT, DEFAULT_MAX_MESSAGE_CHARS};
use swprovider::ProviderConfig;

pub const CALCULATOR_SERVER_PATH: &str = "./mcp-servers/calculator-server.py";
pub const GITHUB_SERVER_IMAGE: &str = "ghcr.io/github/github-mcp-server";
pub const ATLASSIAN_SERVER_IMAGE: &str = "ghcr.io/sooperset/mcp-atlassian:latest";

const GITHUB_VARIABLES: &[(&str, &str)] = &[
    ("GITHUB_PERSONAL_ACCESS_TOKEN", ""),
    ("GITHUB_HOST", "https://github.com"),
];
const ATLASSIAN_VARIABLES: &[(&str, &str)] = &[
    ("CONFLUENCE_URL", ""),
    ("CONFLUENCE_USERNAME", ""),
    ("CONFLUENCE_API_TOKEN", ""),
    ("JIRA_URL", ""),
    ("JIRA_USERNAME", ""),
    ("JIRA_API_TOKEN", ""),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Parse,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    pub providers: Vec<ProviderConfig>,
    #[serde(
        rename = "invocation_timeout_ms",
        with = "millis",
        default = "default_invocation_timeout"
    )]
    pub invocation_timeout: Duration,
    #[serde(
        rename = "connect_timeout_ms",
        with = "millis",
        default = "default_connect_timeout"
    )]
    pub connect_timeout: Duration,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_invocation_timeout() -> Duration {
    DEFAULT_INVOCATION_TIMEOUT
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_max_message_chars() -> usize {
    DEFAULT_MAX_MESSAGE_CHARS
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SwitchboardConfig {
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        Self {
            providers,
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| ConfigError::parse(format!("invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the stock provider set, resolving variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(default_providers(&lookup));

        if let Some(timeout) = millis_override(&lookup, "SWITCHBOARD_INVOCATION_TIMEOUT_MS")? {
            config.invocation_timeout = timeout;
        }
        if let Some(timeout) = millis_override(&lookup, "SWITCHBOARD_CONNECT_TIMEOUT_MS")? {
            config.connect_timeout = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err(ConfigError::invalid("provider name must not be empty"));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "provider '{}' is configured more than once",
                    provider.name
                )));
            }
        }

        if self.invocation_timeout.is_zero() {
            return Err(ConfigError::invalid("invocation timeout must be positive"));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::invalid("connect timeout must be positive"));
        }
        if self.max_message_chars == 0 {
            return Err(ConfigError::invalid("max_message_chars must be positive"));
        }

        Ok(())
    }
}

fn millis_override<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u64>()
        .map(|millis| Some(Duration::from_millis(millis)))
        .map_err(|err| ConfigError::parse(format!("{key} must be milliseconds: {err}")))
}

fn default_providers<F>(lookup: &F) -> Vec<ProviderConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let calculator_path =
        lookup("CALCULATOR_SERVER_PATH").unwrap_or_else(|| CALCULATOR_SERVER_PATH.to_string());

    let calculator = ProviderConfig::stdio("calculator", "python3", [calculator_path])
        .with_topic(Topic::Arithmetic);
    let github = docker_provider("github", GITHUB_SERVER_IMAGE, GITHUB_VARIABLES, lookup)
        .with_topic(Topic::Repository);
    let atlassian = docker_provider("atlassian", ATLASSIAN_SERVER_IMAGE, ATLASSIAN_VARIABLES, lookup)
        .with_topic(Topic::IssueTracking)
        .with_topic(Topic::Documentation);

    vec![calculator, github, atlassian]
}

/// `docker run -i --rm -e VAR… image`, with each variable forwarded from the
/// child environment.
fn docker_provider<F>(
    name: &str,
    image: &str,
    variables: &[(&str, &str)],
    lookup: &F,
) -> ProviderConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut args = vec!["run".to_string(), "-i".to_string(), "--rm".to_string()];
    for (variable, _) in variables {
        args.push("-e".to_string());
        args.push((*variable).to_string());
    }
    args.push(image.to_string());

    variables.iter().fold(
        ProviderConfig::stdio(name, "docker", args),
        |config, (variable, fallback)| {
            let value = lookup(variable).unwrap_or_else(|| (*fallback).to_string());
            config.with_env(*variable, value)
        },
    )
}
