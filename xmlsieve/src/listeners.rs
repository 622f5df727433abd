//! Observers notified of every evaluated comparison.

use crate::comparison::{Comparison, ComparisonResult};

/// Receives each comparison together with its final outcome.
pub trait ComparisonListener {
    /// Called once per comparison, in evaluation order.
    fn comparison_performed(&mut self, comparison: &Comparison, outcome: ComparisonResult);
}

impl<F> ComparisonListener for F
where
    F: FnMut(&Comparison, ComparisonResult),
{
    fn comparison_performed(&mut self, comparison: &Comparison, outcome: ComparisonResult) {
        self(comparison, outcome)
    }
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ComparisonListener for NoopListener {
    fn comparison_performed(&mut self, _comparison: &Comparison, _outcome: ComparisonResult) {}
}

/// Fans comparisons out to three sets of listeners: all comparisons, the
/// equal ones, and the differences.
#[derive(Default)]
pub struct ComparisonListeners<'l> {
    comparison: Vec<Box<dyn ComparisonListener + 'l>>,
    matches: Vec<Box<dyn ComparisonListener + 'l>>,
    differences: Vec<Box<dyn ComparisonListener + 'l>>,
}

impl<'l> ComparisonListeners<'l> {
    /// No listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notified of every comparison.
    pub fn on_comparison(mut self, listener: impl ComparisonListener + 'l) -> Self {
        self.comparison.push(Box::new(listener));
        self
    }

    /// Notified of comparisons whose outcome is equal.
    pub fn on_match(mut self, listener: impl ComparisonListener + 'l) -> Self {
        self.matches.push(Box::new(listener));
        self
    }

    /// Notified of comparisons whose outcome is not equal.
    pub fn on_difference(mut self, listener: impl ComparisonListener + 'l) -> Self {
        self.differences.push(Box::new(listener));
        self
    }
}

impl ComparisonListener for ComparisonListeners<'_> {
    fn comparison_performed(&mut self, comparison: &Comparison, outcome: ComparisonResult) {
        for listener in &mut self.comparison {
            listener.comparison_performed(comparison, outcome);
        }
        let targeted = if outcome == ComparisonResult::Equal {
            &mut self.matches
        } else {
            &mut self.differences
        };
        for listener in targeted {
            listener.comparison_performed(comparison, outcome);
        }
    }
}
