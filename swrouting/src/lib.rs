//! Heuristic routing from free text to one provider operation.
//!
//! The pieces are independent and pure apart from [`OperationCatalog::build_from`]:
//! analyze the text, score the catalog's candidates, then synthesize arguments
//! for the winner.
//!
//! ```rust
//! use swcommon::Topic;
//! use swprovider::{InputSchema, OperationDescriptor, ParamType};
//! use swrouting::{AnalyzedQuery, OperationCatalog, select_best, synthesize};
//!
//! let mut catalog = OperationCatalog::new();
//! catalog.insert(
//!     "calculator",
//!     vec![Topic::Arithmetic],
//!     vec![OperationDescriptor::new(
//!         "calculator",
//!         "sqrt",
//!         "Square root",
//!         InputSchema::from_properties([("value", ParamType::Number)]),
//!     )],
//! );
//!
//! let query = AnalyzedQuery::analyze("what is the square root of 144");
//! let best = select_best(&query, catalog.candidates()).expect("one candidate");
//! let arguments = synthesize(&query, best.operation);
//! assert_eq!(arguments["value"], 144);
//! ```

mod analyzer;
mod catalog;
mod selector;
mod synthesizer;

pub use analyzer::{AnalyzedQuery, Keyword, extract_keywords, extract_numbers};
pub use catalog::{Candidate, CatalogBuild, ListingReport, OperationCatalog, ProviderEntry};
pub use selector::{
    BINARY_ARITHMETIC_OPERATIONS, SCORING_RULES, ScoredCandidate, ScoringRule,
    UNARY_ARITHMETIC_OPERATIONS, rank, score, select_best,
};
pub use synthesizer::{FALLBACK_PARAMETER, synthesize};

pub mod prelude {
    pub use crate::{
        AnalyzedQuery, Candidate, OperationCatalog, ScoredCandidate, select_best, synthesize,
    };
}
