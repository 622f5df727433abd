//! # Xylem
//!
//! Building blocks for comparing ordered trees, independent of any concrete
//! tree representation.
//!
//! Named after the plant tissue that carries water up through every level
//! of a tree.
//!
//! ## Components
//!
//! - **Matching**: greedy, order-preserving first-fit pairing of two sibling
//!   lists ([`greedy_match`]). For every control node, in order, the first
//!   still unmatched test node accepted by the predicate becomes its partner.
//!   The result is deterministic but not globally optimal: there is no
//!   backtracking.
//! - **Paths**: [`XPathContext`] tracks the positional address of the node
//!   currently visited, rendering it as an XPath-like string such as
//!   `/root[1]/item[2]/text()[1]`.
//!
//! ## Usage
//!
//! ```
//! use xylem::{greedy_match, QName, Segment, XPathContext};
//!
//! let control = ["a", "b", "c"];
//! let test = ["c", "a"];
//! let matching = greedy_match(&control, &test, |c, t| c == t);
//! assert_eq!(matching.pairs().collect::<Vec<_>>(), vec![(0, 1), (2, 0)]);
//! assert_eq!(matching.unmatched_control().collect::<Vec<_>>(), vec![1]);
//!
//! let mut ctx = XPathContext::new();
//! ctx.set_children([Segment::element(QName::local("root"))]);
//! ctx.navigate_to_child(0);
//! assert_eq!(ctx.xpath(), "/root[1]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

/// Greedy first-fit sibling matching
pub mod matching;
/// Positional path tracking
pub mod path;

pub use matching::{Matching, greedy_match};
pub use path::{NodeInfo, QName, Segment, SiblingCounter, XPathContext};
