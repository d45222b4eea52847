pub mod core;
pub mod synthesis;
pub mod perception;
pub mod bench;
pub mod cli;

pub use crate::bench::arc::{solve_many, solve_task, solve_task_detailed, TaskSolution};
pub use crate::bench::runner::{evaluate_on_training, EvalReport};
pub use crate::core::{SieveError, SolverConfig};
pub use crate::perception::grid::{Prediction, Task, TestInput, TrainPair};
pub use crate::synthesis::dsl::Grid;
