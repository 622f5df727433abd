//! Serializable summary of a [`crate::Diff`].

use facet::Facet;

use crate::comparison::{ComparisonResult, ComparisonType};
use crate::diff::Difference;

/// Outcome of a whole comparison.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct DifferenceReport {
    /// No differences were found
    pub identical: bool,
    /// All differences were similar
    pub similar: bool,
    /// A critical difference stopped the comparison
    pub interrupted: bool,
    /// The differences, in the order they were found
    pub differences: Vec<DifferenceEntry>,
}

/// One difference, with values rendered as text.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct DifferenceEntry {
    /// What was compared
    pub kind: ComparisonType,
    /// Final outcome after evaluation
    pub outcome: ComparisonResult,
    /// Human readable summary of the comparison
    pub description: String,
    /// Where the control value was found
    pub control_xpath: Option<String>,
    /// The control value
    pub control_value: String,
    /// Where the test value was found
    pub test_xpath: Option<String>,
    /// The test value
    pub test_value: String,
}

impl From<&Difference> for DifferenceEntry {
    fn from(difference: &Difference) -> Self {
        let comparison = &difference.comparison;
        DifferenceEntry {
            kind: comparison.kind,
            outcome: difference.result,
            description: comparison.to_string(),
            control_xpath: comparison.control.xpath.clone(),
            control_value: comparison.control.value.to_string(),
            test_xpath: comparison.test.xpath.clone(),
            test_value: comparison.test.value.to_string(),
        }
    }
}
