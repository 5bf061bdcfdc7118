//! Additive scoring of candidate operations against an analyzed query.
//!
//! Each rule in [`SCORING_RULES`] is applied to an accumulator in order. Ranking
//! is a stable descending sort, so equal scores keep catalog order and the
//! earliest-listed candidate wins a tie.
//!
//! ```rust
//! use swprovider::{InputSchema, OperationDescriptor, ParamType};
//! use swrouting::{AnalyzedQuery, Candidate, select_best};
//!
//! let schema = InputSchema::from_properties([("a", ParamType::Number), ("b", ParamType::Number)]);
//! let add = OperationDescriptor::new("calculator", "add", "Add two numbers", schema.clone());
//! let subtract = OperationDescriptor::new("calculator", "subtract", "Subtract b from a", schema);
//! let candidates = vec![
//!     Candidate { operation: &subtract, topics: &[] },
//!     Candidate { operation: &add, topics: &[] },
//! ];
//!
//! let best = select_best(&AnalyzedQuery::analyze("add 5 and 3"), candidates).expect("non-empty");
//! assert_eq!(best.operation.name, "add");
//! ```

use swcommon::Topic;
use swprovider::OperationDescriptor;

use crate::{AnalyzedQuery, Candidate};

pub const NAME_MENTION_SCORE: u32 = 50;
pub const KEYWORD_IN_NAME_SCORE: u32 = 30;
pub const KEYWORD_IN_DESCRIPTION_SCORE: u32 = 10;
pub const ARITY_MATCH_SCORE: u32 = 20;
pub const TOPIC_AFFINITY_SCORE: u32 = 15;

pub const BINARY_ARITHMETIC_OPERATIONS: &[&str] =
    &["add", "subtract", "multiply", "divide", "power", "modulo"];
pub const UNARY_ARITHMETIC_OPERATIONS: &[&str] = &["sqrt", "abs"];

pub type ScoringRule = fn(&AnalyzedQuery, &Candidate<'_>) -> u32;

pub const SCORING_RULES: [(&str, ScoringRule); 5] = [
    ("name_mention", name_mention),
    ("keyword_overlap", keyword_overlap),
    ("binary_arity", binary_arity),
    ("unary_arity", unary_arity),
    ("topic_affinity", topic_affinity),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub operation: &'a OperationDescriptor,
    pub score: u32,
}

pub fn name_mention(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    let name = candidate.operation.name.as_str();
    if !name.is_empty() && query.lowered.contains(name) {
        NAME_MENTION_SCORE
    } else {
        0
    }
}

pub fn keyword_overlap(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    let name = candidate.operation.name.to_lowercase();
    let description = candidate.operation.description.to_lowercase();

    query
        .keywords
        .iter()
        .map(|keyword| {
            let mut score = 0;
            if name.contains(keyword.word) {
                score += KEYWORD_IN_NAME_SCORE;
            }
            if description.contains(keyword.word) {
                score += KEYWORD_IN_DESCRIPTION_SCORE;
            }
            score
        })
        .sum()
}

pub fn binary_arity(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    let binary = BINARY_ARITHMETIC_OPERATIONS.contains(&candidate.operation.name.as_str());
    if binary && query.numbers.len() >= 2 {
        ARITY_MATCH_SCORE
    } else {
        0
    }
}

pub fn unary_arity(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    let unary = UNARY_ARITHMETIC_OPERATIONS.contains(&candidate.operation.name.as_str());
    if unary && query.numbers.len() == 1 {
        ARITY_MATCH_SCORE
    } else {
        0
    }
}

/// Awarded at most once, however many of the provider's topics match.
pub fn topic_affinity(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    let affine = candidate.topics.iter().any(|topic| match topic {
        Topic::Arithmetic => !query.numbers.is_empty(),
        other => query.mentions(*other),
    });

    if affine { TOPIC_AFFINITY_SCORE } else { 0 }
}

pub fn score(query: &AnalyzedQuery, candidate: &Candidate<'_>) -> u32 {
    SCORING_RULES
        .iter()
        .fold(0, |total, (_, rule)| total + rule(query, candidate))
}

pub fn rank<'a>(query: &AnalyzedQuery, candidates: Vec<Candidate<'a>>) -> Vec<ScoredCandidate<'a>> {
    let mut scored: Vec<ScoredCandidate<'a>> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            operation: candidate.operation,
            score: score(query, &candidate),
        })
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|left, right| right.score.cmp(&left.score));
    scored
}

/// `None` only when there are no candidates; a zero score still wins.
pub fn select_best<'a>(
    query: &AnalyzedQuery,
    candidates: Vec<Candidate<'a>>,
) -> Option<ScoredCandidate<'a>> {
    rank(query, candidates).into_iter().next()
}
