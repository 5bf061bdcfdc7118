//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use swcommon::{EnvMap, RequestId, Topic};
//!
//! let request = RequestId::from("req-1");
//! let mut env = EnvMap::new();
//! env.insert("GITHUB_HOST".to_string(), "https://github.com".to_string());
//!
//! assert_eq!(request.as_str(), "req-1");
//! assert_eq!(Topic::Arithmetic.to_string(), "arithmetic");
//! assert_eq!(env.len(), 1);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use swcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod deadline {
    //! Runtime-agnostic deadline for a single future.

    use std::future::Future;
    use std::pin::pin;
    use std::time::Duration;

    use futures_util::future::{Either, select};
    use futures_timer::Delay;

    /// Resolves to `None` when `limit` elapses before `future` completes.
    pub async fn with_deadline<F>(future: F, limit: Duration) -> Option<F::Output>
    where
        F: Future,
    {
        let future = pin!(future);
        match select(future, Delay::new(limit)).await {
            Either::Left((output, _)) => Some(output),
            Either::Right(_) => None,
        }
    }
}

pub mod context {
    //! Request correlation identifiers and environment maps.
    //!
    //! ```rust
    //! use swcommon::RequestId;
    //!
    //! let generated = RequestId::generate();
    //! assert_eq!(generated.as_str().len(), 36);
    //!
    //! let fixed = RequestId::new("req-42");
    //! assert_eq!(fixed.to_string(), "req-42");
    //! ```

    use std::collections::BTreeMap;
    use std::fmt::{Display, Formatter};

    /// Variables merged into a provider's invocation environment.
    pub type EnvMap = BTreeMap<String, String>;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct RequestId(String);

    impl RequestId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn generate() -> Self {
            Self(uuid::Uuid::new_v4().to_string())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for RequestId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for RequestId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for RequestId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod topic {
    //! Topical keyword groups used as provider-domain hints.
    //!
    //! ```rust
    //! use swcommon::Topic;
    //!
    //! assert_eq!(Topic::parse("Docs"), Some(Topic::Documentation));
    //! assert_eq!(Topic::parse("weather"), None);
    //! ```

    use std::fmt::{Display, Formatter};

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Topic {
        Arithmetic,
        Repository,
        IssueTracking,
        Documentation,
    }

    impl Topic {
        pub const ALL: [Topic; 4] = [
            Topic::Arithmetic,
            Topic::Repository,
            Topic::IssueTracking,
            Topic::Documentation,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Arithmetic => "arithmetic",
                Self::Repository => "repository",
                Self::IssueTracking => "issue_tracking",
                Self::Documentation => "documentation",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value.trim().to_ascii_lowercase().as_str() {
                "arithmetic" | "math" | "calculator" => Some(Self::Arithmetic),
                "repository" | "repo" | "code" => Some(Self::Repository),
                "issue_tracking" | "issue-tracking" | "issues" => Some(Self::IssueTracking),
                "documentation" | "docs" | "wiki" => Some(Self::Documentation),
                _ => None,
            }
        }
    }

    impl Display for Topic {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry used for provider tables.
    //!
    //! Enumeration order is observable (it breaks selection ties), so entries are
    //! kept in the order they were first inserted.
    //!
    //! ```rust
    //! use swcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! let keys: Vec<_> = registry.keys().cloned().collect();
    //! assert_eq!(keys, vec!["beta".to_string(), "alpha".to_string()]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        index: HashMap<K, usize>,
        items: Vec<(K, V)>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                index: HashMap::new(),
                items: Vec::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        pub fn new() -> Self {
            Self::default()
        }

        /// Replaces the value in place when the key exists, keeping its position.
        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            if let Some(&position) = self.index.get(&key) {
                return Some(std::mem::replace(&mut self.items[position].1, value));
            }

            self.index.insert(key.clone(), self.items.len());
            self.items.push((key, value));
            None
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index
                .get(key)
                .map(|&position| &self.items[position].1)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.iter().map(|(key, _)| key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.iter().map(|(_, value)| value)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
            self.items.iter().map(|(key, value)| (key, value))
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }

    impl<K, V> FromIterator<(K, V)> for Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
            let mut registry = Self::new();
            for (key, value) in iter {
                registry.insert(key, value);
            }
            registry
        }
    }
}

pub use context::{EnvMap, RequestId};
pub use deadline::with_deadline;
pub use future::BoxFuture;
pub use registry::Registry;
pub use topic::Topic;
