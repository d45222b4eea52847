use std::time::{Duration, Instant};

use super::error::{Result, SieveError};

pub const DEFAULT_TIME_BUDGET_SECS: f64 = 2.0;
const MIN_SURVIVOR_BUDGET: Duration = Duration::from_millis(500);

/// Per-solve settings. Passed explicitly into every solve call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub time_budget: Duration,
    pub use_compositions: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs_f64(DEFAULT_TIME_BUDGET_SECS),
            use_compositions: true,
        }
    }
}

impl SolverConfig {
    pub fn new(time_budget_secs: f64, use_compositions: bool) -> Result<Self> {
        Ok(Self {
            time_budget: budget_from_secs(time_budget_secs)?,
            use_compositions,
        })
    }

    pub fn with_time_budget(self, secs: f64) -> Result<Self> {
        Ok(Self { time_budget: budget_from_secs(secs)?, ..self })
    }

    pub fn with_compositions(self, use_compositions: bool) -> Self {
        Self { use_compositions, ..self }
    }

    /// Half the task budget, never below half a second.
    pub fn survivor_budget(&self) -> Duration {
        (self.time_budget / 2).max(MIN_SURVIVOR_BUDGET)
    }
}

fn budget_from_secs(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(SieveError::InvalidBudget(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| SieveError::InvalidBudget(secs))
}

/// Cooperative wall-clock check. Nothing is preempted; loops poll `expired`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}
