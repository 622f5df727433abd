//! Greedy first-fit sibling matching.
//!
//! Pairs two ordered node lists: each control node, in order, is paired with
//! the first test node that is still unmatched and accepted by a predicate.
//! Once paired, neither node is eligible again.

use crate::{debug, trace};

/// A bidirectional mapping between positions in a control list and a test
/// list. Uses Vec for O(1) lookups indexed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// Map from control position to test position
    control_to_test: Vec<Option<usize>>,
    /// Map from test position to control position
    test_to_control: Vec<Option<usize>>,
    /// All matched pairs, in insertion order
    pairs: Vec<(usize, usize)>,
}

impl Matching {
    /// Create a new empty matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty matching between a control list of `control_len`
    /// nodes and a test list of `test_len` nodes.
    ///
    /// The lengths bound what [`Matching::unmatched_control`] and
    /// [`Matching::unmatched_test`] report.
    pub fn with_capacity(control_len: usize, test_len: usize) -> Self {
        Self {
            control_to_test: vec![None; control_len],
            test_to_control: vec![None; test_len],
            pairs: Vec::new(),
        }
    }

    /// Add a match between two positions.
    #[inline]
    pub fn add(&mut self, control: usize, test: usize) {
        if control >= self.control_to_test.len() {
            self.control_to_test.resize(control + 1, None);
        }
        if test >= self.test_to_control.len() {
            self.test_to_control.resize(test + 1, None);
        }

        self.control_to_test[control] = Some(test);
        self.test_to_control[test] = Some(control);
        self.pairs.push((control, test));
    }

    /// Check if a control position is matched.
    #[inline(always)]
    pub fn contains_control(&self, control: usize) -> bool {
        self.test_for(control).is_some()
    }

    /// Check if a test position is matched.
    #[inline(always)]
    pub fn contains_test(&self, test: usize) -> bool {
        self.control_for(test).is_some()
    }

    /// Get the test partner of a control position.
    #[inline(always)]
    pub fn test_for(&self, control: usize) -> Option<usize> {
        self.control_to_test.get(control).copied().flatten()
    }

    /// Get the control partner of a test position.
    #[inline(always)]
    pub fn control_for(&self, test: usize) -> Option<usize> {
        self.test_to_control.get(test).copied().flatten()
    }

    /// Get all matched pairs as `(control, test)`, in the order they were added.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    /// Control positions without a partner, ascending.
    pub fn unmatched_control(&self) -> impl Iterator<Item = usize> + '_ {
        self.control_to_test
            .iter()
            .enumerate()
            .filter(|(_, partner)| partner.is_none())
            .map(|(idx, _)| idx)
    }

    /// Test positions without a partner, ascending.
    pub fn unmatched_test(&self) -> impl Iterator<Item = usize> + '_ {
        self.test_to_control
            .iter()
            .enumerate()
            .filter(|(_, partner)| partner.is_none())
            .map(|(idx, _)| idx)
    }

    /// Length of the control list this matching covers.
    pub fn control_len(&self) -> usize {
        self.control_to_test.len()
    }

    /// Length of the test list this matching covers.
    pub fn test_len(&self) -> usize {
        self.test_to_control.len()
    }

    /// Get the number of matched pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no matches.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pair `control` with `test` greedily.
///
/// For every control node in order, the remaining test nodes are scanned in
/// order and the first one `accept` agrees to becomes its partner. The scan
/// never backtracks, so an early control node may take a test node that a
/// later control node would have fit better.
pub fn greedy_match<C, T, F>(control: &[C], test: &[T], mut accept: F) -> Matching
where
    F: FnMut(&C, &T) -> bool,
{
    debug!(
        control = control.len(),
        test = test.len(),
        "greedy_match start"
    );
    let mut matching = Matching::with_capacity(control.len(), test.len());

    for (c_idx, c) in control.iter().enumerate() {
        let found = test
            .iter()
            .enumerate()
            .find(|(t_idx, t)| !matching.contains_test(*t_idx) && accept(c, t));
        if let Some((t_idx, _)) = found {
            trace!(control = c_idx, test = t_idx, "paired");
            matching.add(c_idx, t_idx);
        }
    }

    debug!(matched = matching.len(), "greedy_match done");
    matching
}
