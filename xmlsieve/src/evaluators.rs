//! Difference evaluators: the policy turning a comparison's raw outcome into
//! its final one.
//!
//! The engine computes a default outcome for every comparison
//! ([`ComparisonResult::Equal`] when both values agree,
//! [`ComparisonResult::Different`] otherwise) and hands it to the configured
//! evaluator. Returning [`ComparisonResult::Critical`] stops the whole
//! traversal.

use crate::comparison::{Comparison, ComparisonResult, ComparisonType, ComparisonValue};
use crate::dom::NodeType;

/// Decides the final outcome of a comparison.
pub trait DifferenceEvaluator {
    /// Map `outcome`, the outcome so far, to the final one.
    fn evaluate(&self, comparison: &Comparison, outcome: ComparisonResult) -> ComparisonResult;
}

impl<F> DifferenceEvaluator for F
where
    F: Fn(&Comparison, ComparisonResult) -> ComparisonResult,
{
    fn evaluate(&self, comparison: &Comparison, outcome: ComparisonResult) -> ComparisonResult {
        self(comparison, outcome)
    }
}

/// Built-in evaluators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DifferenceEvaluators {
    /// Keeps the outcome as is
    Accept,
    /// Differences of recoverable types and text against CDATA node types
    /// become similar
    #[default]
    Default,
    /// Every difference becomes critical, stopping at the first one
    DefaultStopper,
    /// The first evaluator that changes the outcome wins
    First(Vec<DifferenceEvaluators>),
    /// Each evaluator sees the previous one's result
    Chain(Vec<DifferenceEvaluators>),
    /// Differences of these types become similar
    Downgrade(Vec<ComparisonType>),
    /// Differences of these types become critical
    UpgradeToCritical(Vec<ComparisonType>),
}

impl DifferenceEvaluators {
    /// The first of `evaluators` that changes the outcome wins.
    pub fn first(evaluators: impl IntoIterator<Item = DifferenceEvaluators>) -> Self {
        DifferenceEvaluators::First(evaluators.into_iter().collect())
    }

    /// Run `evaluators` one after the other.
    pub fn chain(evaluators: impl IntoIterator<Item = DifferenceEvaluators>) -> Self {
        DifferenceEvaluators::Chain(evaluators.into_iter().collect())
    }

    /// Differences of `types` become similar.
    pub fn downgrade(types: impl IntoIterator<Item = ComparisonType>) -> Self {
        DifferenceEvaluators::Downgrade(types.into_iter().collect())
    }

    /// Differences of `types` become critical.
    pub fn upgrade_to_critical(types: impl IntoIterator<Item = ComparisonType>) -> Self {
        DifferenceEvaluators::UpgradeToCritical(types.into_iter().collect())
    }
}

impl DifferenceEvaluator for DifferenceEvaluators {
    fn evaluate(&self, comparison: &Comparison, outcome: ComparisonResult) -> ComparisonResult {
        match self {
            DifferenceEvaluators::Accept => outcome,
            DifferenceEvaluators::Default => default_evaluation(comparison, outcome),
            DifferenceEvaluators::DefaultStopper => match outcome {
                ComparisonResult::Different => ComparisonResult::Critical,
                other => other,
            },
            DifferenceEvaluators::First(evaluators) => evaluators
                .iter()
                .map(|evaluator| evaluator.evaluate(comparison, outcome))
                .find(|&evaluated| evaluated != outcome)
                .unwrap_or(outcome),
            DifferenceEvaluators::Chain(evaluators) => evaluators
                .iter()
                .fold(outcome, |outcome, evaluator| {
                    evaluator.evaluate(comparison, outcome)
                }),
            DifferenceEvaluators::Downgrade(types) => {
                if outcome == ComparisonResult::Different && types.contains(&comparison.kind) {
                    ComparisonResult::Similar
                } else {
                    outcome
                }
            }
            DifferenceEvaluators::UpgradeToCritical(types) => {
                if outcome == ComparisonResult::Different && types.contains(&comparison.kind) {
                    ComparisonResult::Critical
                } else {
                    outcome
                }
            }
        }
    }
}

fn default_evaluation(comparison: &Comparison, outcome: ComparisonResult) -> ComparisonResult {
    if outcome != ComparisonResult::Different {
        return outcome;
    }
    if comparison.kind.is_recoverable() || is_text_against_cdata(comparison) {
        ComparisonResult::Similar
    } else {
        outcome
    }
}

fn is_text_against_cdata(comparison: &Comparison) -> bool {
    if comparison.kind != ComparisonType::NodeType {
        return false;
    }
    matches!(
        (&comparison.control.value, &comparison.test.value),
        (
            ComparisonValue::NodeType(NodeType::Text),
            ComparisonValue::NodeType(NodeType::CData)
        ) | (
            ComparisonValue::NodeType(NodeType::CData),
            ComparisonValue::NodeType(NodeType::Text)
        )
    )
}
