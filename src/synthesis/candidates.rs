use std::fmt;

use rustc_hash::FxHashSet;

use super::dsl::{grid_dimensions, has_shape, Grid};
use super::ops::Op;
use crate::core::{Deadline, Inapplicable, OpResult};

/// Names the operator(s) that produced a candidate. Stable across inputs, so
/// the same label can be checked against every training pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Single(Op),
    /// `inner` runs first, `outer` on its result.
    Composed { outer: Op, inner: Op },
}

impl Label {
    pub fn is_composed(&self) -> bool {
        matches!(self, Label::Composed { .. })
    }

    /// Length of the textual form, used as a simplicity bias when ranking.
    pub fn text_len(&self) -> usize {
        match self {
            Label::Single(op) => "op:".len() + op.name().len(),
            Label::Composed { outer, inner } => "op2:".len() + outer.name().len() + 1 + inner.name().len(),
        }
    }

    pub fn apply(&self, grid: &Grid, rows: usize, cols: usize, examples: &[(Grid, Grid)]) -> OpResult<Grid> {
        match self {
            Label::Single(op) => shaped(op.apply(grid, rows, cols, examples)?, rows, cols),
            Label::Composed { outer, inner } => {
                let mid = shaped(inner.apply(grid, rows, cols, examples)?, rows, cols)?;
                shaped(outer.apply(&mid, rows, cols, examples)?, rows, cols)
            }
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Single(op) => write!(f, "op:{}", op),
            Label::Composed { outer, inner } => write!(f, "op2:{}+{}", outer, inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: Label,
    pub grid: Grid,
}

fn shaped(grid: Grid, rows: usize, cols: usize) -> OpResult<Grid> {
    if has_shape(&grid, rows, cols) {
        Ok(grid)
    } else {
        Err(Inapplicable::ShapeMismatch { expected: (rows, cols), got: grid_dimensions(&grid) })
    }
}

/// Every catalog operator, then (optionally) every ordered pair, applied to
/// `input`. Inapplicable results are dropped and identical grids collapse to
/// the first label that produced them.
pub fn generate_candidates(
    input: &Grid,
    rows: usize,
    cols: usize,
    examples: &[(Grid, Grid)],
    use_compositions: bool,
) -> Vec<Candidate> {
    generate_candidates_until(input, rows, cols, examples, use_compositions, None)
}

/// As [`generate_candidates`], but composition enumeration stops once
/// `deadline` has passed. Single-operator candidates are always produced.
pub fn generate_candidates_until(
    input: &Grid,
    rows: usize,
    cols: usize,
    examples: &[(Grid, Grid)],
    use_compositions: bool,
    deadline: Option<&Deadline>,
) -> Vec<Candidate> {
    let singles: Vec<(Op, OpResult<Grid>)> = Op::ALL
        .iter()
        .map(|&op| (op, Label::Single(op).apply(input, rows, cols, examples)))
        .collect();

    let mut pool = Pool::default();
    for (op, result) in &singles {
        if let Ok(grid) = result {
            pool.push(Label::Single(*op), grid.clone());
        }
    }

    if use_compositions {
        'outer: for outer in Op::ALL {
            for (inner, mid) in &singles {
                if deadline.is_some_and(|d| d.expired()) {
                    break 'outer;
                }
                let Ok(mid) = mid else { continue };
                let composed = outer
                    .apply(mid, rows, cols, examples)
                    .and_then(|g| shaped(g, rows, cols));
                if let Ok(grid) = composed {
                    pool.push(Label::Composed { outer, inner: *inner }, grid);
                }
            }
        }
    }
    pool.candidates
}

#[derive(Default)]
struct Pool {
    seen: FxHashSet<Grid>,
    candidates: Vec<Candidate>,
}

impl Pool {
    fn push(&mut self, label: Label, grid: Grid) {
        if self.seen.insert(grid.clone()) {
            self.candidates.push(Candidate { label, grid });
        }
    }
}
