//! Builds an argument object for an operation from free text.
//!
//! Parameters are filled in schema order. Numbers consume the extracted
//! literals left to right, strings take the raw text or a recognized reference
//! token, and booleans look for an affirmative word. Nothing is validated; an
//! unfillable parameter is simply left out.
//!
//! ```rust
//! use serde_json::json;
//! use swprovider::{InputSchema, OperationDescriptor, ParamType};
//! use swrouting::{AnalyzedQuery, synthesize};
//!
//! let add = OperationDescriptor::new(
//!     "calculator",
//!     "add",
//!     "Add two numbers",
//!     InputSchema::from_properties([("a", ParamType::Number), ("b", ParamType::Number)]),
//! );
//!
//! let arguments = synthesize(&AnalyzedQuery::analyze("add 5 and 3"), &add);
//! assert_eq!(serde_json::Value::Object(arguments), json!({"a": 5, "b": 3}));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use swprovider::{OperationDescriptor, ParamType, SchemaProperty};

use crate::AnalyzedQuery;

/// Argument name used when an operation declares no parameters.
pub const FALLBACK_PARAMETER: &str = "query";

const FULL_TEXT_PARAMETERS: &[&str] = &[
    "query", "message", "text", "question", "prompt", "input", "content", "search", "q", "body",
];
const QUERY_LANGUAGE_PARAMETERS: &[&str] = &["cql", "jql"];
const AFFIRMATIVE_TOKENS: &[&str] = &["true", "yes", "enable"];

static REPOSITORY_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z0-9][A-Za-z0-9_.-]*)/([A-Za-z0-9][A-Za-z0-9_.-]*)\b")
        .expect("repository slug pattern is valid")
});
static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.~-]*(?:/[A-Za-z0-9_.~-]+)+/?").expect("path pattern is valid")
});
static HASH_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)\b").expect("identifier pattern is valid"));
static ISSUE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Z0-9]+-\d+)\b").expect("issue key pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Owner,
    Repository,
    Path,
    Identifier,
    IssueKey,
}

impl Reference {
    fn for_parameter(name: &str) -> Option<Self> {
        match name {
            "owner" | "org" | "organization" => Some(Self::Owner),
            "repo" | "repository" | "repo_name" => Some(Self::Repository),
            "path" | "file_path" | "filepath" | "file" | "filename" => Some(Self::Path),
            "issue_key" | "key" => Some(Self::IssueKey),
            "id" | "number" => Some(Self::Identifier),
            _ if name.ends_with("_key") => Some(Self::IssueKey),
            _ if name.ends_with("_id") || name.ends_with("_number") => Some(Self::Identifier),
            _ => None,
        }
    }

    fn extract(self, text: &str) -> Option<String> {
        let found = match self {
            Self::Owner => REPOSITORY_SLUG.captures(text)?.get(1),
            Self::Repository => REPOSITORY_SLUG.captures(text)?.get(2),
            Self::Path => PATH_TOKEN.find(text),
            Self::Identifier => HASH_IDENTIFIER.captures(text)?.get(1),
            Self::IssueKey => ISSUE_KEY.captures(text)?.get(1),
        };
        found.map(|found| found.as_str().to_string())
    }
}

pub fn synthesize(query: &AnalyzedQuery, operation: &OperationDescriptor) -> Map<String, Value> {
    let mut arguments = Map::new();

    if !operation.input_schema.has_properties() {
        arguments.insert(
            FALLBACK_PARAMETER.to_string(),
            Value::String(query.text.clone()),
        );
        return arguments;
    }

    let mut numbers = query.numbers.iter().copied();

    for property in operation.input_schema.properties() {
        let value = match property.param_type {
            ParamType::Number => numbers.next().and_then(number_value),
            ParamType::String => Some(Value::String(string_value(query, property))),
            ParamType::Boolean => Some(Value::Bool(
                AFFIRMATIVE_TOKENS
                    .iter()
                    .any(|token| query.lowered.contains(token)),
            )),
            ParamType::Unsupported => None,
        };

        if let Some(value) = value {
            arguments.insert(property.name.clone(), value);
        }
    }

    arguments
}

/// Integral values are emitted as JSON integers.
fn number_value(value: f64) -> Option<Value> {
    const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        return Some(Value::from(value as i64));
    }
    Number::from_f64(value).map(Value::Number)
}

fn string_value(query: &AnalyzedQuery, property: &SchemaProperty) -> String {
    let name = property.name.to_ascii_lowercase();

    if FULL_TEXT_PARAMETERS.contains(&name.as_str()) {
        return query.text.clone();
    }

    if QUERY_LANGUAGE_PARAMETERS.contains(&name.as_str()) {
        return format!("text ~ \"{}\"", query.text.replace('"', "\\\""));
    }

    Reference::for_parameter(&name)
        .and_then(|reference| reference.extract(&query.text))
        .unwrap_or_else(|| query.text.clone())
}
