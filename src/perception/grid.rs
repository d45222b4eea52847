use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{Result, SieveError};
use crate::synthesis::dsl::Grid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub train: Vec<TrainPair>,
    pub test: Vec<TestInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainPair {
    pub input: Grid,
    pub output: Grid,
}

/// A test record. Any `output` present in the file is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInput {
    pub input: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub output: Grid,
}

impl Task {
    pub fn examples(&self) -> Vec<(Grid, Grid)> {
        self.train.iter().map(|p| (p.input.clone(), p.output.clone())).collect()
    }

    /// Structural checks the solver relies on.
    pub fn validate(&self) -> Result<()> {
        if self.train.is_empty() {
            return Err(SieveError::EmptyTraining);
        }
        if self.test.is_empty() {
            return Err(SieveError::EmptyTest);
        }
        let grids = self.train.iter()
            .flat_map(|p| [&p.input, &p.output])
            .chain(self.test.iter().map(|t| &t.input));
        for grid in grids {
            check_rectangular(grid)?;
        }
        Ok(())
    }
}

fn check_rectangular(grid: &Grid) -> Result<()> {
    let expected = grid.first().map_or(0, |r| r.len());
    match grid.iter().enumerate().find(|(_, row)| row.len() != expected) {
        Some((row, cells)) => Err(SieveError::RaggedGrid { row, expected, got: cells.len() }),
        None => Ok(()),
    }
}

/// Parse a task collection: one JSON array, or one task record per non-blank line.
pub fn parse_tasks(text: &str) -> Result<Vec<Task>> {
    let trimmed = text.trim();
    let records: Vec<serde_json::Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        trimmed.lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<serde_json::Value>)
            .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?
    };

    records.into_iter().enumerate().map(|(index, raw)| -> Result<Task> {
        let task: Task = serde_json::from_value(raw)
            .map_err(|e| SieveError::MalformedTask { index, reason: e.to_string() })?;
        task.validate()
            .map_err(|e| SieveError::MalformedTask { index, reason: e.to_string() })?;
        Ok(task)
    }).collect()
}

pub fn load_tasks(path: impl AsRef<Path>) -> anyhow::Result<Vec<Task>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let tasks = parse_tasks(&content)
        .with_context(|| format!("cannot parse tasks from {}", path.display()))?;
    Ok(tasks)
}

/// Write one array per task, each parallel to that task's test inputs.
pub fn write_predictions(path: impl AsRef<Path>, predictions: &[Vec<Prediction>]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), predictions)
        .with_context(|| format!("cannot write predictions to {}", path.display()))?;
    Ok(())
}
