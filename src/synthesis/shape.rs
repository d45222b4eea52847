use super::dsl::{grid_dimensions, Grid};

/// Majority output height and majority output width, voted independently.
/// Ties go to the value seen first. `None` without training pairs.
pub fn infer_target_shape(examples: &[(Grid, Grid)]) -> Option<(usize, usize)> {
    let dims: Vec<(usize, usize)> = examples.iter().map(|(_, out)| grid_dimensions(out)).collect();
    let rows = most_common(dims.iter().map(|d| d.0))?;
    let cols = most_common(dims.iter().map(|d| d.1))?;
    Some((rows, cols))
}

fn most_common(values: impl Iterator<Item = usize>) -> Option<usize> {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for v in values {
        match tally.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => tally.push((v, 1)),
        }
    }
    tally.into_iter().reduce(|best, t| if t.1 > best.1 { t } else { best }).map(|(v, _)| v)
}
