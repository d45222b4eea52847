// Survivor selection: which labels reproduce every training output exactly.
//
// The label universe comes from the first training input's pool. Each label
// is then checked pair by pair against single-operator pools built for each
// training input. A label whose grid is missing from a pool (inapplicable or
// deduplicated away) scores the shape-mismatch sentinel for that pair, so
// composed labels never verify.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::candidates::{generate_candidates, Label};
use super::dsl::{hamming, Grid, MISMATCH};
use crate::core::Deadline;

/// Labels kept when nothing verifies exactly.
pub const FALLBACK_LABELS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Survivors {
    labels: Vec<Label>,
    exact: bool,
}

impl Survivors {
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when every label verified with zero mismatches on all pairs.
    pub fn is_exact(&self) -> bool {
        self.exact
    }
}

/// Lazily built `label -> grid` index per training input.
struct Verifier<'a> {
    examples: &'a [(Grid, Grid)],
    rows: usize,
    cols: usize,
    pools: Vec<Option<FxHashMap<Label, Grid>>>,
}

impl<'a> Verifier<'a> {
    fn new(examples: &'a [(Grid, Grid)], rows: usize, cols: usize) -> Self {
        Self { examples, rows, cols, pools: vec![None; examples.len()] }
    }

    /// Mismatch between `label`'s candidate for pair `i` and its true output.
    fn distance(&mut self, i: usize, label: &Label) -> u64 {
        let examples = self.examples;
        let (rows, cols) = (self.rows, self.cols);
        let (input, expected) = &examples[i];
        let pool = self.pools[i].get_or_insert_with(|| {
            generate_candidates(input, rows, cols, examples, false)
                .into_iter()
                .map(|c| (c.label, c.grid))
                .collect()
        });
        pool.get(label).map_or(MISMATCH, |grid| hamming(grid, expected))
    }

    fn total_distance(&mut self, label: &Label) -> u64 {
        (0..self.examples.len()).map(|i| self.distance(i, label)).sum()
    }
}

/// Labels verified on every training pair within `budget`, or the
/// [`FALLBACK_LABELS`] lowest-total-error labels when none verify.
///
/// Labels not reached before the budget runs out are left out rather than
/// rejected; the fallback ranking itself runs to completion.
pub fn select_survivors(
    examples: &[(Grid, Grid)],
    rows: usize,
    cols: usize,
    use_compositions: bool,
    budget: Duration,
) -> Survivors {
    let deadline = Deadline::after(budget);
    let Some((first, _)) = examples.first() else {
        return Survivors::default();
    };
    let labels: Vec<Label> = generate_candidates(first, rows, cols, examples, use_compositions)
        .into_iter()
        .map(|c| c.label)
        .collect();

    let mut verifier = Verifier::new(examples, rows, cols);
    let mut verified = Vec::new();
    let mut checked = 0usize;

    'labels: for label in &labels {
        if deadline.expired() {
            break;
        }
        for i in 0..examples.len() {
            if deadline.expired() {
                break 'labels;
            }
            if verifier.distance(i, label) != 0 {
                checked += 1;
                continue 'labels;
            }
        }
        checked += 1;
        verified.push(*label);
    }

    if !verified.is_empty() {
        debug!(survivors = verified.len(), checked, universe = labels.len(), "exact survivors");
        return Survivors { labels: verified, exact: true };
    }

    let mut totals: Vec<(Label, u64)> = labels
        .iter()
        .map(|label| (*label, verifier.total_distance(label)))
        .collect();
    totals.sort_by_key(|&(_, total)| total);
    let fallback: Vec<Label> = totals.into_iter().take(FALLBACK_LABELS).map(|(l, _)| l).collect();
    debug!(checked, universe = labels.len(), fallback = fallback.len(), "no exact survivor, using lowest-error labels");
    Survivors { labels: fallback, exact: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::dsl::{mirror_v, rotate};
    use crate::synthesis::ops::Op;

    const BUDGET: Duration = Duration::from_secs(30);

    fn rotation_examples() -> Vec<(Grid, Grid)> {
        let a = vec![vec![1, 2, 0], vec![0, 3, 0], vec![0, 0, 4]];
        let b = vec![vec![5, 0, 0], vec![6, 6, 0], vec![0, 7, 0]];
        vec![(a.clone(), rotate(&a, 1)), (b.clone(), rotate(&b, 1))]
    }

    #[test]
    fn rotation_task_keeps_rotate90() {
        let examples = rotation_examples();
        let survivors = select_survivors(&examples, 3, 3, true, BUDGET);
        assert!(survivors.is_exact());
        assert!(survivors.contains(&Label::Single(Op::Rotate90)));
        assert!(!survivors.contains(&Label::Single(Op::Identity)));
    }

    #[test]
    fn survivors_reproduce_every_pair() {
        let examples = rotation_examples();
        let survivors = select_survivors(&examples, 3, 3, true, BUDGET);
        for label in survivors.labels() {
            for (input, output) in &examples {
                let pool = generate_candidates(input, 3, 3, &examples, false);
                let cand = pool.iter().find(|c| c.label == *label).unwrap();
                assert_eq!(hamming(&cand.grid, output), 0, "{}", label);
            }
        }
    }

    #[test]
    fn composed_labels_never_verify() {
        let examples = rotation_examples();
        let survivors = select_survivors(&examples, 3, 3, true, BUDGET);
        assert!(survivors.labels().iter().all(|l| !l.is_composed()));
    }

    #[test]
    fn inconsistent_outputs_fall_back_to_three() {
        let a = vec![vec![1, 2, 0], vec![0, 3, 0], vec![0, 0, 4]];
        let examples = vec![(a.clone(), rotate(&a, 1)), (a.clone(), mirror_v(&a))];
        let survivors = select_survivors(&examples, 3, 3, false, BUDGET);
        assert!(!survivors.is_exact());
        assert_eq!(survivors.len(), FALLBACK_LABELS);
    }

    #[test]
    fn exhausted_budget_verifies_nothing_but_still_ranks() {
        let examples = rotation_examples();
        let survivors = select_survivors(&examples, 3, 3, false, Duration::ZERO);
        assert!(!survivors.is_exact());
        // the fallback ignores the cutoff, so the exact label ranks first
        assert_eq!(survivors.labels()[0], Label::Single(Op::Rotate90));
    }

    #[test]
    fn no_examples_no_survivors() {
        assert!(select_survivors(&[], 1, 1, true, BUDGET).is_empty());
    }
}
