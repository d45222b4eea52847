// Training-set evaluation: replay the solver with each task's training
// inputs as held-out test inputs and score exact reproduction.

use std::time::Instant;

use tracing::info;

use super::arc::solve_task;
use crate::core::{Result, SieveError, SolverConfig};
use crate::perception::grid::{Task, TestInput};
use crate::synthesis::dsl::hamming;

#[derive(Debug, Clone)]
pub struct EvalReport {
    pub total: usize,
    pub solved: usize,
    pub score: f64,
    pub elapsed_ms: u64,
    pub per_task: Vec<TaskOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub index: usize,
    pub solved: bool,
    /// Training examples reproduced exactly.
    pub matched: usize,
    pub examples: usize,
    pub elapsed_ms: u64,
}

/// Treat training inputs as test inputs and compare with the known outputs.
/// A task counts only when every one of its examples is reproduced exactly.
pub fn evaluate_on_training(tasks: &[Task], config: &SolverConfig) -> Result<EvalReport> {
    let total_start = Instant::now();
    let mut per_task = Vec::with_capacity(tasks.len());

    for (index, task) in tasks.iter().enumerate() {
        let held_out = Task {
            train: task.train.clone(),
            test: task.train.iter().map(|p| TestInput { input: p.input.clone() }).collect(),
        };
        let start = Instant::now();
        let preds = solve_task(&held_out, config)
            .map_err(|e| SieveError::MalformedTask { index, reason: e.to_string() })?;
        let matched = preds.iter()
            .zip(task.train.iter())
            .filter(|(pred, pair)| hamming(pred, &pair.output) == 0)
            .count();

        per_task.push(TaskOutcome {
            index,
            solved: matched == task.train.len(),
            matched,
            examples: task.train.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        });
    }

    let solved = per_task.iter().filter(|t| t.solved).count();
    let report = EvalReport {
        total: per_task.len(),
        solved,
        score: if per_task.is_empty() { 0.0 } else { solved as f64 / per_task.len() as f64 },
        elapsed_ms: total_start.elapsed().as_millis() as u64,
        per_task,
    };
    info!(total = report.total, solved = report.solved, score = report.score, "evaluation finished");
    Ok(report)
}

impl EvalReport {
    pub fn solved_flags(&self) -> Vec<bool> {
        self.per_task.iter().map(|t| t.solved).collect()
    }

    pub fn print_summary(&self) {
        println!("Proxy accuracy: {:.4}  ({}/{} solved)", self.score, self.solved, self.total);
        println!("Time: {}ms", self.elapsed_ms);
    }

    pub fn print_detail(&self) {
        self.print_summary();
        println!("\nPer-task detail:");
        for t in &self.per_task {
            let status = if t.solved { "OK" } else { "--" };
            println!("  [{}] task {} | matched={}/{} time={}ms",
                status, t.index, t.matched, t.examples, t.elapsed_ms);
        }
    }
}
