use super::candidates::Candidate;
use super::dsl::{bg_color, count_foreground};
use super::survivors::Survivors;

const UNVERIFIED_PENALTY: f64 = 100.0;
const LABEL_LEN_WEIGHT: f64 = 0.01;
const FOREGROUND_WEIGHT: f64 = 0.0001;

/// Lower is better. Survivor labels first, then shorter labels, then
/// sparser grids. An empty survivor set applies no penalty.
pub fn score(candidate: &Candidate, survivors: &Survivors) -> f64 {
    let mut s = 0.0;
    if !survivors.is_empty() && !survivors.contains(&candidate.label) {
        s += UNVERIFIED_PENALTY;
    }
    s += candidate.label.text_len() as f64 * LABEL_LEN_WEIGHT;
    s += count_foreground(&candidate.grid, bg_color(&candidate.grid)) as f64 * FOREGROUND_WEIGHT;
    s
}

/// Lowest-scoring candidate; the earliest one wins ties.
pub fn rank_candidates<'a>(pool: &'a [Candidate], survivors: &Survivors) -> Option<&'a Candidate> {
    let mut best: Option<(&Candidate, f64)> = None;
    for cand in pool {
        let s = score(cand, survivors);
        if best.map_or(true, |(_, b)| s < b) {
            best = Some((cand, s));
        }
    }
    best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::candidates::{generate_candidates, Label};
    use crate::synthesis::dsl::rotate;
    use crate::synthesis::ops::Op;
    use crate::synthesis::survivors::select_survivors;
    use std::time::Duration;

    fn cand(label: Label, grid: Vec<Vec<u8>>) -> Candidate {
        Candidate { label, grid }
    }

    #[test]
    fn empty_pool_ranks_nothing() {
        assert!(rank_candidates(&[], &Survivors::default()).is_none());
    }

    #[test]
    fn shorter_label_wins_without_survivors() {
        let pool = vec![
            cand(Label::Composed { outer: Op::Identity, inner: Op::Identity }, vec![vec![1]]),
            cand(Label::Single(Op::OutlineCc), vec![vec![2]]),
        ];
        let best = rank_candidates(&pool, &Survivors::default()).unwrap();
        assert_eq!(best.label, Label::Single(Op::OutlineCc));
    }

    #[test]
    fn sparser_grid_breaks_label_length_ties() {
        let pool = vec![
            cand(Label::Single(Op::MirrorH), vec![vec![0, 1, 2], vec![0, 3, 4]]),
            cand(Label::Single(Op::MirrorV), vec![vec![0, 0, 0], vec![0, 0, 1]]),
        ];
        let best = rank_candidates(&pool, &Survivors::default()).unwrap();
        assert_eq!(best.label, Label::Single(Op::MirrorV));
    }

    #[test]
    fn first_wins_exact_ties() {
        let pool = vec![
            cand(Label::Single(Op::MirrorH), vec![vec![3]]),
            cand(Label::Single(Op::MirrorV), vec![vec![4]]),
        ];
        let best = rank_candidates(&pool, &Survivors::default()).unwrap();
        assert_eq!(best.label, Label::Single(Op::MirrorH));
    }

    #[test]
    fn survivor_beats_simpler_label() {
        let a = vec![vec![1, 2, 0], vec![0, 3, 0], vec![0, 0, 4]];
        let examples = vec![(a.clone(), rotate(&a, 1))];
        let survivors = select_survivors(&examples, 3, 3, false, Duration::from_secs(30));
        let test = vec![vec![5, 0, 0], vec![0, 6, 7], vec![0, 0, 0]];
        let pool = generate_candidates(&test, 3, 3, &examples, true);
        let best = rank_candidates(&pool, &survivors).unwrap();
        assert!(survivors.contains(&best.label));
        assert!(score(best, &survivors) < UNVERIFIED_PENALTY);
    }
}
