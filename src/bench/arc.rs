use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{Deadline, Result, SieveError, SolverConfig};
use crate::perception::grid::{Prediction, Task};
use crate::synthesis::candidates::generate_candidates_until;
use crate::synthesis::dsl::{bg_color, pad_to, Align, Grid};
use crate::synthesis::ranker::rank_candidates;
use crate::synthesis::shape::infer_target_shape;
use crate::synthesis::survivors::{select_survivors, Survivors};

const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone)]
pub struct TaskSolution {
    pub shape: (usize, usize),
    pub survivors: Survivors,
    /// One grid per test input, each exactly `shape`.
    pub predictions: Vec<Grid>,
    /// How many predictions are the padded-input default.
    pub fallbacks: usize,
}

/// The input copied top-left into a background-filled canvas of the target shape.
pub fn fallback_grid(input: &Grid, rows: usize, cols: usize) -> Grid {
    pad_to(input, rows, cols, bg_color(input), Align::TopLeft)
}

pub fn solve_task(task: &Task, config: &SolverConfig) -> Result<Vec<Grid>> {
    solve_task_detailed(task, config).map(|s| s.predictions)
}

pub fn solve_task_detailed(task: &Task, config: &SolverConfig) -> Result<TaskSolution> {
    task.validate()?;
    let deadline = Deadline::after(config.time_budget);
    let examples = task.examples();
    let (rows, cols) = infer_target_shape(&examples).ok_or(SieveError::EmptyTraining)?;

    let survivors = select_survivors(&examples, rows, cols, config.use_compositions, config.survivor_budget());
    debug!(rows, cols, survivors = survivors.len(), exact = survivors.is_exact(), "task prepared");

    let mut predictions = Vec::with_capacity(task.test.len());
    let mut fallbacks = 0usize;
    for (i, test) in task.test.iter().enumerate() {
        if deadline.expired() {
            warn!(test = i, elapsed_ms = deadline.elapsed().as_millis() as u64, "budget exhausted, padding input");
            predictions.push(fallback_grid(&test.input, rows, cols));
            fallbacks += 1;
            continue;
        }
        let pool = generate_candidates_until(
            &test.input, rows, cols, &examples, config.use_compositions, Some(&deadline),
        );
        match rank_candidates(&pool, &survivors) {
            Some(best) => {
                debug!(test = i, label = %best.label, pool = pool.len(), "picked candidate");
                predictions.push(best.grid.clone());
            }
            None => {
                predictions.push(fallback_grid(&test.input, rows, cols));
                fallbacks += 1;
            }
        }
    }

    Ok(TaskSolution { shape: (rows, cols), survivors, predictions, fallbacks })
}

fn to_predictions(grids: Vec<Grid>) -> Vec<Prediction> {
    grids.into_iter().map(|output| Prediction { output }).collect()
}

/// Solve every task in order. Output is parallel to `tasks`.
pub fn solve_many(tasks: &[Task], config: &SolverConfig) -> Result<Vec<Vec<Prediction>>> {
    let mut outputs = Vec::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if i % PROGRESS_EVERY == 0 {
            info!("solving task {}/{}", i, tasks.len());
        }
        let preds = solve_task(task, config)
            .map_err(|e| SieveError::MalformedTask { index: i, reason: e.to_string() })?;
        outputs.push(to_predictions(preds));
    }
    Ok(outputs)
}

/// Like [`solve_many`], one task per rayon worker. Each solve is independent.
pub fn solve_many_parallel(tasks: &[Task], config: &SolverConfig) -> Result<Vec<Vec<Prediction>>> {
    info!(tasks = tasks.len(), threads = rayon::current_num_threads(), "solving in parallel");
    tasks
        .par_iter()
        .enumerate()
        .map(|(i, task)| {
            solve_task(task, config)
                .map(to_predictions)
                .map_err(|e| SieveError::MalformedTask { index: i, reason: e.to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::grid::{TestInput, TrainPair};
    use crate::synthesis::dsl::{has_shape, rotate};

    fn pair(input: Grid, output: Grid) -> TrainPair {
        TrainPair { input, output }
    }

    fn fast() -> SolverConfig {
        SolverConfig::new(5.0, false).unwrap()
    }

    #[test]
    fn fallback_is_top_left() {
        let g = vec![vec![1, 0], vec![0, 0]];
        assert_eq!(fallback_grid(&g, 3, 3), vec![vec![1, 0, 0], vec![0, 0, 0], vec![0, 0, 0]]);
    }

    #[test]
    fn solves_mirror_task() {
        let a = vec![vec![1, 2, 0], vec![0, 3, 0]];
        let b = vec![vec![4, 0, 0], vec![5, 5, 0]];
        let task = Task {
            train: vec![
                pair(a.clone(), crate::synthesis::dsl::mirror_h(&a)),
                pair(b.clone(), crate::synthesis::dsl::mirror_h(&b)),
            ],
            test: vec![TestInput { input: vec![vec![7, 0, 8], vec![0, 0, 9]] }],
        };
        let solution = solve_task_detailed(&task, &fast()).unwrap();
        assert_eq!(solution.shape, (2, 3));
        assert_eq!(solution.predictions, vec![vec![vec![8, 0, 7], vec![9, 0, 0]]]);
        assert_eq!(solution.fallbacks, 0);
    }

    #[test]
    fn empty_test_input_falls_back() {
        let a = vec![vec![1, 2], vec![3, 4]];
        let task = Task {
            train: vec![pair(a.clone(), rotate(&a, 1))],
            test: vec![TestInput { input: vec![] }],
        };
        let solution = solve_task_detailed(&task, &fast()).unwrap();
        assert_eq!(solution.fallbacks, 1);
        assert!(has_shape(&solution.predictions[0], 2, 2));
    }

    #[test]
    fn empty_training_is_fatal() {
        let task = Task { train: vec![], test: vec![TestInput { input: vec![vec![1]] }] };
        assert!(matches!(solve_task(&task, &fast()), Err(SieveError::EmptyTraining)));
    }

    #[test]
    fn parallel_matches_sequential() {
        let a = vec![vec![1, 2, 0], vec![0, 3, 0], vec![0, 0, 4]];
        let task = Task {
            train: vec![pair(a.clone(), rotate(&a, 2))],
            test: vec![TestInput { input: vec![vec![5, 0, 0], vec![0, 6, 0], vec![0, 0, 0]] }],
        };
        let tasks = vec![task.clone(), task];
        let seq = solve_many(&tasks, &fast()).unwrap();
        let par = solve_many_parallel(&tasks, &fast()).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.len(), 2);
    }
}
