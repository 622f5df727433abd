//! The comparison engine: runs comparisons through an evaluator and walks
//! both trees in lockstep.
//!
//! For every pair of nodes the walker:
//! 1. runs the strategy comparisons for the pair (see [`crate::strategies`]),
//! 2. matches the filtered children of both nodes,
//! 3. for every matched pair, in match order, compares the children's
//!    positions and recurses,
//! 4. reports every unmatched control child, then every unmatched test
//!    child, as a child lookup difference.
//!
//! A [`ComparisonResult::Critical`] outcome unwinds the whole traversal as
//! `Err(Interrupted)`; no comparison is evaluated after it.

use std::fmt;

use xylem::XPathContext;

use crate::comparison::{
    Comparison, ComparisonResult, ComparisonType, ComparisonValue, Comparisons, Detail,
};
use crate::dom::{Document, Node, NodeType};
use crate::evaluators::{DifferenceEvaluator, DifferenceEvaluators};
use crate::listeners::ComparisonListener;
use crate::matcher::{DefaultNodeMatcher, NodeMatcher};
use crate::selectors::{ElementSelector, ElementSelectors};
use crate::strategies::{self, NodeAndXPath, StrategyOptions};
use crate::{debug, trace};

/// Knobs of the engine itself.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Skip attribute sequence comparisons. Default: true
    pub ignore_attribute_order: bool,

    /// Prefixes used when rendering paths, keyed by namespace URI. Names in
    /// unmapped namespaces render without a prefix.
    pub namespace_context: Vec<(String, String)>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            ignore_attribute_order: true,
            namespace_context: Vec::new(),
        }
    }
}

impl DiffConfig {
    fn strategy_options(&self) -> StrategyOptions {
        StrategyOptions {
            ignore_attribute_order: self.ignore_attribute_order,
        }
    }

    fn context_for(&self, node: Node<'_>) -> XPathContext {
        let mut context = XPathContext::with_namespace_context(
            self.namespace_context
                .iter()
                .map(|(uri, prefix)| (uri.as_str(), prefix.as_str())),
        );
        match node.node_type() {
            NodeType::Document => {}
            NodeType::Attribute => {
                if let Some(name) = node.qual_name() {
                    context.navigate_to_attribute(&name.to_qname());
                }
            }
            _ => {
                context.set_children([node]);
                context.navigate_to_child(0);
            }
        }
        context
    }
}

/// The traversal was stopped by a critical comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("comparison interrupted by a critical difference")
    }
}

impl std::error::Error for Interrupted {}

/// Evaluates comparisons one at a time and tells the listener about each.
pub struct Executor<'e, 'l> {
    evaluator: &'e dyn DifferenceEvaluator,
    listener: &'l mut dyn ComparisonListener,
}

impl<'e, 'l> Executor<'e, 'l> {
    /// Executor reporting to `listener`.
    pub fn new(
        evaluator: &'e dyn DifferenceEvaluator,
        listener: &'l mut dyn ComparisonListener,
    ) -> Self {
        Self {
            evaluator,
            listener,
        }
    }

    /// Evaluate one comparison. The listener is notified before a critical
    /// outcome is turned into `Err(Interrupted)`.
    pub fn execute(&mut self, comparison: Comparison) -> Result<ComparisonResult, Interrupted> {
        let outcome = self
            .evaluator
            .evaluate(&comparison, comparison.default_outcome());
        if outcome != ComparisonResult::Equal {
            trace!(%comparison, %outcome, "difference");
        }
        self.listener.comparison_performed(&comparison, outcome);
        if outcome.is_recoverable() {
            Ok(outcome)
        } else {
            Err(Interrupted)
        }
    }

    /// Evaluate comparisons in order, stopping at the first critical one.
    pub fn execute_all(&mut self, comparisons: Comparisons) -> Result<(), Interrupted> {
        for comparison in comparisons {
            self.execute(comparison)?;
        }
        Ok(())
    }
}

/// Compares two trees, reporting every comparison to a listener.
///
/// The engine holds no per-comparison state, so one instance can compare
/// any number of pairs, also after an interrupted run.
pub struct DifferenceEngine {
    matcher: Box<dyn NodeMatcher + Send + Sync>,
    evaluator: Box<dyn DifferenceEvaluator + Send + Sync>,
    config: DiffConfig,
}

impl fmt::Debug for DifferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifferenceEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for DifferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferenceEngine {
    /// Engine matching elements by name and using the default evaluator.
    pub fn new() -> Self {
        Self {
            matcher: Box::new(DefaultNodeMatcher::<ElementSelectors>::default()),
            evaluator: Box::new(DifferenceEvaluators::Default),
            config: DiffConfig::default(),
        }
    }

    /// Use `matcher` to pair children.
    pub fn with_node_matcher(mut self, matcher: impl NodeMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Pair children with a [`DefaultNodeMatcher`] using `selector`.
    pub fn with_element_selector(
        self,
        selector: impl ElementSelector + Send + Sync + 'static,
    ) -> Self {
        self.with_node_matcher(DefaultNodeMatcher::new(selector))
    }

    /// Use `evaluator` to decide outcomes.
    pub fn with_evaluator(
        mut self,
        evaluator: impl DifferenceEvaluator + Send + Sync + 'static,
    ) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare two documents from their document nodes.
    pub fn compare_documents(
        &self,
        control: &Document,
        test: &Document,
        listener: &mut dyn ComparisonListener,
    ) -> Result<(), Interrupted> {
        self.compare(control.root_node(), test.root_node(), listener)
    }

    /// Compare `control` with `test`, node kinds permitting, and everything
    /// below them. Comparing a node with itself produces no comparisons.
    pub fn compare(
        &self,
        control: Node<'_>,
        test: Node<'_>,
        listener: &mut dyn ComparisonListener,
    ) -> Result<(), Interrupted> {
        if control.is_same_node(&test) {
            debug!("comparing a node with itself");
            return Ok(());
        }
        debug!(
            control = %control.node_type(),
            test = %test.node_type(),
            "compare start"
        );

        let mut control_context = self.config.context_for(control);
        let mut test_context = self.config.context_for(test);
        let mut walker = Walker {
            matcher: &*self.matcher,
            options: self.config.strategy_options(),
            executor: Executor::new(&*self.evaluator, listener),
        };
        let result = walker.compare_nodes(
            &mut NodeAndXPath::new(control, &mut control_context),
            &mut NodeAndXPath::new(test, &mut test_context),
        );
        if result.is_ok() {
            debug!("compare done");
        } else {
            debug!("compare interrupted");
        }
        result
    }
}

/// State of one traversal.
struct Walker<'e, 'l> {
    matcher: &'e dyn NodeMatcher,
    options: StrategyOptions,
    executor: Executor<'e, 'l>,
}

impl Walker<'_, '_> {
    fn compare_nodes(
        &mut self,
        control: &mut NodeAndXPath<'_, '_>,
        test: &mut NodeAndXPath<'_, '_>,
    ) -> Result<(), Interrupted> {
        let comparisons = strategies::node_comparisons(control, test, self.options);
        self.executor.execute_all(comparisons)?;
        if control.node.node_type() == NodeType::Attribute {
            return Ok(());
        }
        self.compare_children(control, test)
    }

    fn compare_children(
        &mut self,
        control: &mut NodeAndXPath<'_, '_>,
        test: &mut NodeAndXPath<'_, '_>,
    ) -> Result<(), Interrupted> {
        let control_children = strategies::filtered_children(control.node);
        let test_children = strategies::filtered_children(test.node);
        if control_children.is_empty() && test_children.is_empty() {
            return Ok(());
        }
        control.context.set_children(&control_children);
        test.context.set_children(&test_children);

        let matching = self.matcher.match_nodes(&control_children, &test_children);

        // A node takes part in at most one pair.
        let mut control_paired = vec![false; control_children.len()];
        let mut test_paired = vec![false; test_children.len()];

        for (control_idx, test_idx) in matching.pairs() {
            let (Some(&control_child), Some(&test_child)) =
                (control_children.get(control_idx), test_children.get(test_idx))
            else {
                debug!(control_idx, test_idx, "skipping pair outside the child lists");
                continue;
            };
            if control_paired[control_idx] || test_paired[test_idx] {
                debug!(control_idx, test_idx, "skipping pair of an already paired node");
                continue;
            }
            control_paired[control_idx] = true;
            test_paired[test_idx] = true;
            control.context.navigate_to_child(control_idx);
            test.context.navigate_to_child(test_idx);
            trace!(
                control = %control.context.xpath(),
                test = %test.context.xpath(),
                "matched"
            );

            self.executor.execute(Comparison::new(
                ComparisonType::ChildNodelistSequence,
                control.detail_of(control_child, control_idx),
                test.detail_of(test_child, test_idx),
            ))?;
            self.compare_nodes(
                &mut control.with_node(control_child),
                &mut test.with_node(test_child),
            )?;

            control.context.navigate_to_parent();
            test.context.navigate_to_parent();
        }

        for control_idx in (0..control_children.len()).filter(|&i| !control_paired[i]) {
            let child = control_children[control_idx];
            control.context.navigate_to_child(control_idx);
            let comparison = Comparison::new(
                ComparisonType::ChildLookup,
                control.detail_of(child, &*child.node_name()),
                absent(test),
            );
            control.context.navigate_to_parent();
            self.executor.execute(comparison)?;
        }

        for test_idx in (0..test_children.len()).filter(|&i| !test_paired[i]) {
            let child = test_children[test_idx];
            test.context.navigate_to_child(test_idx);
            let comparison = Comparison::new(
                ComparisonType::ChildLookup,
                absent(control),
                test.detail_of(child, &*child.node_name()),
            );
            test.context.navigate_to_parent();
            self.executor.execute(comparison)?;
        }
        Ok(())
    }
}

/// The side of a child lookup where the child is missing: no node, no
/// value, addressed by the parent's path.
fn absent(parent: &NodeAndXPath<'_, '_>) -> Detail {
    Detail::new(None, Some(parent.context.xpath()), ComparisonValue::Null)
}
