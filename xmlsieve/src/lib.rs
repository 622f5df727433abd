//! XML tree comparison based on facet, roxmltree, and xylem.
//!
//! xmlsieve provides:
//! - **Arena DOM**: a namespace-aware XML tree with attributes, doctype and
//!   XML declaration ([`Document`])
//! - **Typed comparisons**: every compared property becomes a [`Comparison`]
//!   with control and test values and XPath-like locations
//! - **Pluggable policy**: element selectors decide which elements
//!   correspond, evaluators decide how much a difference matters, listeners
//!   observe every outcome
//! - **One-call API**: [`DiffBuilder`] collects the differences into a
//!   [`Diff`]
//!
//! # Example
//!
//! ```rust
//! use xmlsieve::{ComparisonType, DiffBuilder, Document, ElementSelectors};
//!
//! let control = Document::parse(r#"<list><item id="1">a</item><item id="2">b</item></list>"#).unwrap();
//! let test = Document::parse(r#"<list><item id="2">b</item><item id="1">a</item></list>"#).unwrap();
//!
//! // Elements paired by name only: the values differ position by position.
//! let diff = DiffBuilder::new(&control, &test).build();
//! assert!(!diff.similar());
//!
//! // Paired by id: only the order differs, which counts as similar.
//! let diff = DiffBuilder::new(&control, &test)
//!     .with_element_selector(ElementSelectors::by_name_and_attributes(["id"]))
//!     .build();
//! assert!(diff.similar());
//! assert!(diff
//!     .differences()
//!     .iter()
//!     .all(|d| d.comparison.kind == ComparisonType::ChildNodelistSequence));
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

pub mod attributes;
pub mod comparison;
#[cfg(feature = "roxmltree")]
mod convert;
pub mod diff;
pub mod dom;
pub mod engine;
pub mod evaluators;
pub mod listeners;
pub mod matcher;
pub mod report;
pub mod selectors;
pub mod strategies;

// Re-export the comparison model at crate root for convenience
pub use comparison::{
    Comparison, ComparisonResult, ComparisonType, ComparisonValue, Comparisons, Detail,
};

// Re-export the tree
pub use dom::{Document, Node, NodeKind, NodeRef, NodeType, QualName, TreeError};

// Re-export the engine and its policies
pub use diff::{CheckFor, Diff, DiffBuilder, Difference};
pub use engine::{DiffConfig, DifferenceEngine, Executor, Interrupted};
pub use evaluators::{DifferenceEvaluator, DifferenceEvaluators};
pub use listeners::{ComparisonListener, ComparisonListeners, NoopListener};
pub use matcher::{
    CompareUnmatchedNodeMatcher, DefaultNodeMatcher, DefaultNodeTypeMatcher, NodeMatcher,
    NodeTypeMatcher,
};
pub use report::{DifferenceEntry, DifferenceReport};
pub use selectors::{ElementSelector, ElementSelectors};
