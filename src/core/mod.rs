pub mod error;
pub mod config;

pub use error::{Inapplicable, OpResult, Result, SieveError};
pub use config::{Deadline, SolverConfig, DEFAULT_TIME_BUDGET_SECS};
