//! Provider configuration and transport descriptors.
//!
//! ```rust
//! use swcommon::Topic;
//! use swprovider::{ProviderConfig, TransportKind};
//!
//! let config = ProviderConfig::stdio("calculator", "python3", ["calculator-server.py"])
//!     .with_topic(Topic::Arithmetic);
//!
//! assert_eq!(config.transport.kind(), TransportKind::Stdio);
//! assert!(config.read_only);
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use swcommon::{EnvMap, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Stdio,
    Http,
}

impl Display for TransportKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportDescriptor {
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Http {
        url: String,
    },
}

impl TransportDescriptor {
    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Stdio { .. } => TransportKind::Stdio,
            Self::Http { .. } => TransportKind::Http,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub transport: TransportDescriptor,
    #[serde(default)]
    pub env: EnvMap,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

fn default_read_only() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, transport: TransportDescriptor) -> Self {
        Self {
            name: name.into(),
            transport,
            env: EnvMap::new(),
            read_only: default_read_only(),
            topics: Vec::new(),
        }
    }

    pub fn stdio<I, S>(name: impl Into<String>, command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            TransportDescriptor::Stdio {
                command: command.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, TransportDescriptor::Http { url: url.into() })
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        if !self.topics.contains(&topic) {
            self.topics.push(topic);
        }
        self
    }
}

// Environment values routinely carry access tokens, so only keys are printed.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("transport", &self.transport)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("read_only", &self.read_only)
            .field("topics", &self.topics)
            .finish()
    }
}
