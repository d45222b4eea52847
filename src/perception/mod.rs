pub mod grid;

pub use grid::{load_tasks, parse_tasks, write_predictions, Prediction, Task, TestInput, TrainPair};
