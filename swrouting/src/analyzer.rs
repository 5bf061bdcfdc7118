//! Query analysis: numeric literals and topical keywords from free text.
//!
//! ```rust
//! use swcommon::Topic;
//! use swrouting::{AnalyzedQuery, extract_numbers};
//!
//! assert_eq!(extract_numbers("add 5 and -3.5"), vec![5.0, -3.5]);
//!
//! let query = AnalyzedQuery::analyze("What is the SQUARE ROOT of 144?");
//! assert_eq!(query.numbers, vec![144.0]);
//! assert!(query.mentions(Topic::Arithmetic));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use swcommon::Topic;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("number pattern is valid"));

/// Every word appears in exactly one group.
const VOCABULARY: &[(Topic, &[&str])] = &[
    (
        Topic::Arithmetic,
        &[
            "add",
            "plus",
            "sum",
            "subtract",
            "minus",
            "difference",
            "multiply",
            "times",
            "product",
            "divide",
            "quotient",
            "power",
            "exponent",
            "square root",
            "sqrt",
            "modulo",
            "remainder",
            "absolute",
            "calculate",
        ],
    ),
    (
        Topic::Repository,
        &[
            "github",
            "repository",
            "repo",
            "pull request",
            "commit",
            "branch",
            "fork",
            "release",
        ],
    ),
    (
        Topic::IssueTracking,
        &["issue", "ticket", "jira", "sprint", "epic", "bug", "backlog"],
    ),
    (
        Topic::Documentation,
        &[
            "confluence",
            "page",
            "wiki",
            "documentation",
            "docs",
            "space",
            "article",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keyword {
    pub word: &'static str,
    pub topic: Topic,
}

pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|found| found.as_str().trim_end_matches('.').parse::<f64>().ok())
        .collect()
}

/// Vocabulary order, each word at most once.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let lowered = text.to_lowercase();
    VOCABULARY
        .iter()
        .flat_map(|(topic, words)| {
            words.iter().map(move |word| Keyword {
                word: *word,
                topic: *topic,
            })
        })
        .filter(|keyword| lowered.contains(keyword.word))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedQuery {
    pub text: String,
    pub lowered: String,
    pub numbers: Vec<f64>,
    pub keywords: Vec<Keyword>,
}

impl AnalyzedQuery {
    pub fn analyze(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            lowered: text.to_lowercase(),
            numbers: extract_numbers(&text),
            keywords: extract_keywords(&text),
            text,
        }
    }

    pub fn mentions(&self, topic: Topic) -> bool {
        self.keywords.iter().any(|keyword| keyword.topic == topic)
    }
}
