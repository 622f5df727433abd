//! One-call comparison of two documents, collecting the differences.

use std::borrow::Cow;
use std::fmt;

use crate::comparison::{Comparison, ComparisonResult};
use crate::dom::Document;
use crate::engine::{DiffConfig, DifferenceEngine};
use crate::evaluators::DifferenceEvaluator;
use crate::matcher::NodeMatcher;
use crate::report::{DifferenceEntry, DifferenceReport};
use crate::selectors::ElementSelector;

/// A comparison whose outcome was not [`ComparisonResult::Equal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// The comparison
    pub comparison: Comparison,
    /// Its final outcome
    pub result: ComparisonResult,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.comparison, self.result)
    }
}

/// The differences found between two documents.
#[derive(Debug, Clone, Default)]
pub struct Diff {
    differences: Vec<Difference>,
    interrupted: bool,
}

impl Diff {
    /// Differences in the order they were found.
    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Whether any difference was collected.
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// No differences at all.
    pub fn identical(&self) -> bool {
        !self.has_differences()
    }

    /// Only similar differences.
    pub fn similar(&self) -> bool {
        self.differences
            .iter()
            .all(|d| d.result == ComparisonResult::Similar)
    }

    /// Whether a critical difference stopped the comparison early.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// A serializable summary.
    pub fn report(&self) -> DifferenceReport {
        DifferenceReport {
            identical: self.identical(),
            similar: self.similar(),
            interrupted: self.interrupted,
            differences: self.differences.iter().map(DifferenceEntry::from).collect(),
        }
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.identical() {
            return f.write_str("[identical]");
        }
        for (i, difference) in self.differences.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{difference}")?;
        }
        Ok(())
    }
}

/// Which outcomes end up in a [`Diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckFor {
    /// Everything that is not equal
    #[default]
    Identical,
    /// Only different and critical outcomes
    Similar,
}

impl CheckFor {
    fn collects(self, outcome: ComparisonResult) -> bool {
        match self {
            CheckFor::Identical => outcome != ComparisonResult::Equal,
            CheckFor::Similar => outcome > ComparisonResult::Similar,
        }
    }
}

/// Builds a [`Diff`] of two documents.
///
/// ```
/// use xmlsieve::{DiffBuilder, Document};
///
/// let control = Document::parse("<a><b>1</b></a>").unwrap();
/// let test = Document::parse("<a>\n  <b>1</b>\n</a>").unwrap();
///
/// assert!(DiffBuilder::new(&control, &test).build().has_differences());
/// assert!(DiffBuilder::new(&control, &test).ignore_whitespace().build().identical());
/// ```
#[derive(Debug)]
pub struct DiffBuilder<'a> {
    control: Cow<'a, Document>,
    test: Cow<'a, Document>,
    ignore_comments: bool,
    ignore_whitespace: bool,
    normalize_whitespace: bool,
    check_for: CheckFor,
    engine: DifferenceEngine,
    config: DiffConfig,
}

impl<'a> DiffBuilder<'a> {
    /// Compare `control` with `test`.
    pub fn new(control: &'a Document, test: &'a Document) -> Self {
        Self::from_documents(Cow::Borrowed(control), Cow::Borrowed(test))
    }

    fn from_documents(control: Cow<'a, Document>, test: Cow<'a, Document>) -> Self {
        Self {
            control,
            test,
            ignore_comments: false,
            ignore_whitespace: false,
            normalize_whitespace: false,
            check_for: CheckFor::default(),
            engine: DifferenceEngine::new(),
            config: DiffConfig::default(),
        }
    }

    /// Compare copies of both documents without comments.
    pub fn ignore_comments(mut self) -> Self {
        self.ignore_comments = true;
        self
    }

    /// Compare copies of both documents with text trimmed and
    /// whitespace-only text removed.
    pub fn ignore_whitespace(mut self) -> Self {
        self.ignore_whitespace = true;
        self
    }

    /// Like [`DiffBuilder::ignore_whitespace`], also collapsing runs of
    /// whitespace inside text to a single space.
    pub fn normalize_whitespace(mut self) -> Self {
        self.normalize_whitespace = true;
        self
    }

    /// Collect every outcome that is not equal. This is the default.
    pub fn check_for_identical(mut self) -> Self {
        self.check_for = CheckFor::Identical;
        self
    }

    /// Collect only different and critical outcomes.
    pub fn check_for_similar(mut self) -> Self {
        self.check_for = CheckFor::Similar;
        self
    }

    /// Pair elements with `selector`.
    pub fn with_element_selector(
        mut self,
        selector: impl ElementSelector + Send + Sync + 'static,
    ) -> Self {
        self.engine = self.engine.with_element_selector(selector);
        self
    }

    /// Pair children with `matcher`.
    pub fn with_node_matcher(mut self, matcher: impl NodeMatcher + Send + Sync + 'static) -> Self {
        self.engine = self.engine.with_node_matcher(matcher);
        self
    }

    /// Decide outcomes with `evaluator`.
    pub fn with_evaluator(
        mut self,
        evaluator: impl DifferenceEvaluator + Send + Sync + 'static,
    ) -> Self {
        self.engine = self.engine.with_evaluator(evaluator);
        self
    }

    /// Report attributes in a different order as sequence differences.
    pub fn check_attribute_order(mut self) -> Self {
        self.config.ignore_attribute_order = false;
        self
    }

    /// Render names in these namespaces with these prefixes, keyed by
    /// namespace URI.
    pub fn with_namespace_context<K, V>(mut self, prefixes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.config.namespace_context = prefixes
            .into_iter()
            .map(|(uri, prefix)| (uri.into(), prefix.into()))
            .collect();
        self
    }

    fn prepare<'d>(&self, doc: &'d Document) -> Cow<'d, Document> {
        let mut doc = Cow::Borrowed(doc);
        if self.ignore_comments {
            doc = Cow::Owned(doc.without_comments());
        }
        if self.normalize_whitespace {
            doc = Cow::Owned(doc.whitespace_normalized());
        } else if self.ignore_whitespace {
            doc = Cow::Owned(doc.whitespace_stripped());
        }
        doc
    }

    /// Run the comparison.
    pub fn build(self) -> Diff {
        let control = self.prepare(&self.control);
        let test = self.prepare(&self.test);
        let check_for = self.check_for;
        let engine = self.engine.with_config(self.config);

        let mut differences = Vec::new();
        let result = engine.compare_documents(
            &control,
            &test,
            &mut |comparison: &Comparison, outcome: ComparisonResult| {
                if check_for.collects(outcome) {
                    differences.push(Difference {
                        comparison: comparison.clone(),
                        result: outcome,
                    });
                }
            },
        );
        Diff {
            differences,
            interrupted: result.is_err(),
        }
    }
}

#[cfg(feature = "roxmltree")]
impl DiffBuilder<'static> {
    /// Parse both documents and compare them.
    pub fn parse(control: &str, test: &str) -> Result<Self, roxmltree::Error> {
        Ok(Self::from_documents(
            Cow::Owned(Document::parse(control)?),
            Cow::Owned(Document::parse(test)?),
        ))
    }
}
